/// Dip Switch Configuration
///
/// switch 1  off: line feed only on LF; on: line feed after every CR
/// switch 2-4 not used
///
/// Switches read low when on.

use crate::clock::TICKS_PER_SECOND;

/// Handshake wait. Long enough for the carrier to return from the right
/// margin after power-on.
pub const STARTUP_TIMEOUT_TICKS: u16 = 7 * TICKS_PER_SECOND as u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub auto_linefeed: bool,
}

impl Config {
    /// Build from the raw switch bank, switch 1 in bit 0.
    pub fn from_switches(bank: u8) -> Self {
        Config {
            auto_linefeed: bank & 0x01 == 0,
        }
    }
}
