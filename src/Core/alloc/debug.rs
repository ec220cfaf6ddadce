use super::*;
use std::fmt;

// Debug proxy implementations that call the standalone debug functions
impl<T> fmt::Debug for CircularAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_circular_allocator(self, f)
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_slot(self, f)
    }
}
