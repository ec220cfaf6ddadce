// Handle passed between producers and the drainer.

/// Index of a slot inside one recorder's allocator.
pub type SlotIndex = u32;

const MAX_RECORDERS: usize = 4;

/// Identifies one of the recorders sharing a handle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecorderIdentifier(pub usize);

impl RecorderIdentifier {
    #[inline]
    fn is_valid(self) -> bool {
        self.0 < SlotHandle::MAX_RECORDERS
    }
}

/// Slot indices of up to [`SlotHandle::MAX_RECORDERS`] recorders for one log
/// message, plus the recorder that is currently being served.
///
/// Out-of-range recorder ids are ignored by setters and read as zero/false by
/// getters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    slots: [SlotIndex; MAX_RECORDERS],
    /// Bit `n` set means recorder `n` holds a slot.
    available: u8,
    selected_recorder: RecorderIdentifier,
}

impl SlotHandle {
    pub const MAX_RECORDERS: usize = MAX_RECORDERS;

    /// Handle for a single recorder (id 0) holding `slot`.
    pub fn new(slot: SlotIndex) -> Self {
        let mut handle = Self::default();
        handle.set_slot(slot, RecorderIdentifier(0));
        handle
    }

    pub fn get_slot(&self, recorder: RecorderIdentifier) -> SlotIndex {
        if !recorder.is_valid() {
            return SlotIndex::default();
        }
        self.slots[recorder.0]
    }

    pub fn set_slot(&mut self, slot: SlotIndex, recorder: RecorderIdentifier) {
        if !recorder.is_valid() {
            return;
        }
        self.slots[recorder.0] = slot;
        self.available |= 1 << recorder.0;
    }

    pub fn is_recorder_active(&self, recorder: RecorderIdentifier) -> bool {
        recorder.is_valid() && (self.available & (1 << recorder.0)) != 0
    }

    pub fn get_selected_recorder(&self) -> RecorderIdentifier {
        self.selected_recorder
    }

    pub fn set_selected_recorder(&mut self, recorder: RecorderIdentifier) {
        if recorder.is_valid() {
            self.selected_recorder = recorder;
        }
    }

    pub fn get_slot_of_selected_recorder(&self) -> SlotIndex {
        self.get_slot(self.selected_recorder)
    }
}

impl From<SlotIndex> for SlotHandle {
    fn from(slot: SlotIndex) -> Self {
        Self::new(slot)
    }
}
