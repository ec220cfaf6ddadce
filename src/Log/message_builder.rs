// Turns a LogRecord into the byte spans the drainer writes.

use crate::Log::Structs::{LogRecord, LoggingIdentifier};
use std::fmt::Write as _;
use std::io::Write as _;

/// Phased producer of byte spans for one record at a time.
///
/// Protocol:
/// - [`MessageBuilder::set_next_message`] primes the builder and restarts it at
///   the first span.
/// - [`MessageBuilder::get_next_span`] yields the spans in order, then `None`.
///   Once depleted it keeps returning `None` until primed again. An unprimed
///   builder returns `None`.
pub trait MessageBuilder: Send {
    fn set_next_message(&mut self, record: &LogRecord);
    fn get_next_span(&mut self) -> Option<&[u8]>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ParsingPhase {
    Header,
    Payload,
    Reinitialize,
}

const HEADER_CAPACITY: usize = 128;

/// Human readable line format:
///
/// ```text
/// <secs>.<micros> <mcnt> <ecu> <app> <ctx> log <level> verbose <nargs> <payload>\n
/// ```
///
/// The header and the payload are rendered when the builder is primed, so the
/// spans stay valid while the writer works through them.
#[derive(Debug)]
pub struct TextMessageBuilder {
    ecu_id: LoggingIdentifier,
    header: Vec<u8>,
    payload: Vec<u8>,
    phase: ParsingPhase,
    primed: bool,
    message_count: u8,
}

impl TextMessageBuilder {
    pub fn new(ecu_id: &str, max_payload_size: usize) -> Self {
        Self {
            ecu_id: LoggingIdentifier::new(ecu_id),
            header: Vec::with_capacity(HEADER_CAPACITY),
            // one extra byte for the line terminator
            payload: Vec::with_capacity(max_payload_size + 1),
            phase: ParsingPhase::Header,
            primed: false,
            message_count: 0,
        }
    }

    fn render_header(&mut self, record: &LogRecord) {
        let entry = record.get_log_entry();
        let secs = entry.timestamp_ns / 1_000_000_000;
        let micros = (entry.timestamp_ns % 1_000_000_000) / 1_000;

        self.header.clear();
        // Writing into a Vec cannot fail.
        let _ = write!(
            self.header,
            "{}.{:06} {:03} {} {} {} log {} verbose {} ",
            secs,
            micros,
            self.message_count,
            IdField(&self.ecu_id),
            IdField(&entry.app_id),
            IdField(&entry.ctx_id),
            entry.log_level.as_str(),
            entry.num_of_args
        );
        self.message_count = self.message_count.wrapping_add(1);
    }
}

/// Renders an identifier as exactly four columns, NUL bytes become spaces.
struct IdField<'a>(&'a LoggingIdentifier);

impl std::fmt::Display for IdField<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &b in self.0.as_bytes() {
            f.write_char(if b == 0 { ' ' } else { b as char })?;
        }
        Ok(())
    }
}

impl MessageBuilder for TextMessageBuilder {
    fn set_next_message(&mut self, record: &LogRecord) {
        self.render_header(record);

        self.payload.clear();
        self.payload.extend_from_slice(&record.get_log_entry().payload);
        self.payload.push(b'\n');

        self.phase = ParsingPhase::Header;
        self.primed = true;
    }

    fn get_next_span(&mut self) -> Option<&[u8]> {
        if !self.primed {
            return None;
        }

        match self.phase {
            ParsingPhase::Header => {
                self.phase = ParsingPhase::Payload;
                Some(self.header.as_slice())
            }
            ParsingPhase::Payload => {
                self.phase = ParsingPhase::Reinitialize;
                Some(self.payload.as_slice())
            }
            ParsingPhase::Reinitialize => {
                self.phase = ParsingPhase::Header;
                self.header.clear();
                self.payload.clear();
                self.primed = false;
                None
            }
        }
    }
}
