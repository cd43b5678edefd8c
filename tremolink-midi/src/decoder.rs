use log::trace;

use crate::{CcEvent, CC_STATUS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    ExpectStatus,
    ExpectController { channel: u8 },
    ExpectValue { channel: u8, controller: u8 },
}

/// Incremental Control Change decoder.
///
/// Feed it one byte at a time as bytes become available; partial messages are
/// retained across calls, so the polling loop never has to wait for the rest
/// of a message. Any status byte resynchronizes the decoder from whatever
/// state it is in; non-CC status bytes put it back to idle so foreign traffic
/// is skipped without ever producing an event.
#[derive(Debug, Clone, Copy)]
pub struct CcDecoder {
    state: DecodeState,
}

impl CcDecoder {
    pub const fn new() -> Self {
        Self {
            state: DecodeState::ExpectStatus,
        }
    }

    /// Consumes one wire byte, returning a complete event if this byte
    /// finished one.
    pub fn feed(&mut self, byte: u8) -> Option<CcEvent> {
        if byte & 0x80 != 0 {
            // Status bytes resynchronize unconditionally.
            self.state = if byte & 0xF0 == CC_STATUS {
                DecodeState::ExpectController {
                    channel: byte & 0x0F,
                }
            } else {
                trace!("skipping non-CC status byte {byte:#04x}");
                DecodeState::ExpectStatus
            };
            return None;
        }

        match self.state {
            DecodeState::ExpectStatus => {
                trace!("ignoring data byte {byte:#04x} outside a message");
                None
            }
            DecodeState::ExpectController { channel } => {
                self.state = DecodeState::ExpectValue {
                    channel,
                    controller: byte,
                };
                None
            }
            DecodeState::ExpectValue {
                channel,
                controller,
            } => {
                // No running status: the next event needs a fresh status byte.
                self.state = DecodeState::ExpectStatus;
                Some(CcEvent {
                    channel,
                    controller,
                    value: byte,
                })
            }
        }
    }
}

impl Default for CcDecoder {
    fn default() -> Self {
        Self::new()
    }
}
