/// Console Control Codes
/// Byte values understood on the console line, and an encoder for the
/// escape sequences so host tools speak the same language as the firmware.

use heapless::Vec;

use crate::pitch::Pitch;

pub const NUL: u8 = 0x00;
pub const BEL: u8 = 0x07;
pub const BS: u8 = 0x08;
pub const HT: u8 = 0x09;
pub const LF: u8 = 0x0A;
pub const VT: u8 = 0x0B;
pub const CR: u8 = 0x0D;
pub const SP: u8 = 0x20;
pub const ESC: u8 = 0x1B;
/// Control-Z, second byte of every diagnostic sequence.
pub const DIAGNOSTIC: u8 = 0x1A;
/// Control-P, flips keyboard pass-through. Never reaches the interpreter.
pub const TOGGLE: u8 = 0x10;

pub const MAX_SEQUENCE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Bold,
    CancelBold,
    Underline,
    BrokenUnderline,
    CancelUnderline,
    CancelAll,
    HalfLineUp,
    HalfLineDown,
    ReverseLinefeed,
    MicroBackspace,
    MicroUp,
    MicroDown,
    Pitch(Pitch),
    QueryColumn,
    QueryPassThrough,
    QueryUptime,
    QueryResets,
    QueryPort(u8),
    Indicator(bool),
    Reset,
    TogglePassThrough,
}

impl Command {
    pub fn encode(self) -> Vec<u8, MAX_SEQUENCE> {
        let bytes: &[u8] = match self {
            Command::Bold => &[ESC, b'O'],
            Command::CancelBold => &[ESC, b'&'],
            Command::Underline => &[ESC, b'E'],
            Command::BrokenUnderline => &[ESC, b'b'],
            Command::CancelUnderline => &[ESC, b'R'],
            Command::CancelAll => &[ESC, b'X'],
            Command::HalfLineUp => &[ESC, b'U'],
            Command::HalfLineDown => &[ESC, b'D'],
            Command::ReverseLinefeed => &[ESC, LF],
            Command::MicroBackspace => &[ESC, BS],
            Command::MicroUp => &[ESC, b'u'],
            Command::MicroDown => &[ESC, b'd'],
            Command::Pitch(Pitch::Ten) => &[ESC, b'p'],
            Command::Pitch(Pitch::Twelve) => &[ESC, b'e'],
            Command::Pitch(Pitch::Fifteen) => &[ESC, b'm'],
            Command::QueryColumn => &[ESC, DIAGNOSTIC, b'c'],
            Command::QueryPassThrough => &[ESC, DIAGNOSTIC, b'k'],
            Command::QueryUptime => &[ESC, DIAGNOSTIC, b'u'],
            Command::QueryResets => &[ESC, DIAGNOSTIC, b'w'],
            Command::QueryPort(port) => &[ESC, DIAGNOSTIC, b'p', b'0' + (port & 0x03)],
            Command::Indicator(true) => &[ESC, DIAGNOSTIC, b'e', b'1'],
            Command::Indicator(false) => &[ESC, DIAGNOSTIC, b'e', b'0'],
            Command::Reset => &[ESC, DIAGNOSTIC, b'r'],
            Command::TogglePassThrough => &[TOGGLE],
        };
        // Every sequence above fits MAX_SEQUENCE
        Vec::from_slice(bytes).unwrap_or_default()
    }

    /// True when the firmware answers on the console.
    pub fn has_reply(self) -> bool {
        matches!(
            self,
            Command::QueryColumn
                | Command::QueryPassThrough
                | Command::QueryUptime
                | Command::QueryResets
                | Command::QueryPort(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_two_byte_commands() {
        assert_eq!(Command::Bold.encode().as_slice(), b"\x1bO");
        assert_eq!(Command::ReverseLinefeed.encode().as_slice(), &[ESC, LF]);
        assert_eq!(Command::Pitch(Pitch::Fifteen).encode().as_slice(), b"\x1bm");
    }

    #[test]
    fn test_encode_diagnostics() {
        assert_eq!(Command::QueryUptime.encode().as_slice(), b"\x1b\x1au");
        assert_eq!(Command::QueryPort(2).encode().as_slice(), b"\x1b\x1ap2");
        assert_eq!(Command::Indicator(true).encode().as_slice(), b"\x1b\x1ae1");
        assert_eq!(Command::TogglePassThrough.encode().as_slice(), &[0x10]);
    }

    #[test]
    fn test_port_number_is_masked() {
        assert_eq!(Command::QueryPort(7).encode().as_slice(), b"\x1b\x1ap3");
    }
}
