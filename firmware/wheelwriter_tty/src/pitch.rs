/// Print Wheel Pitch
/// Character density of the installed print wheel, and the codes the
/// printer board answers with after a reset command.

use num_enum::FromPrimitive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pitch {
    /// Pica, 10 characters per inch
    Ten,
    /// Elite, 12 characters per inch
    Twelve,
    /// Micro Elite, 15 characters per inch
    Fifteen,
}

impl Pitch {
    /// Tab stops every half inch.
    pub const fn tab_stop(self) -> u8 {
        match self {
            Pitch::Ten => 5,
            Pitch::Twelve => 6,
            Pitch::Fifteen => 7,
        }
    }

    /// Carrier micro spaces (1/120 inch) per character cell.
    pub const fn micro_spaces(self) -> u8 {
        match self {
            Pitch::Ten => 12,
            Pitch::Twelve => 10,
            Pitch::Fifteen => 8,
        }
    }
}

/// Printer board reply to the reset command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u16)]
pub enum Printwheel {
    Undetected = 0x000,
    Ps = 0x008,
    Fifteen = 0x010,
    Twelve = 0x020,
    Absent = 0x021,
    Ten = 0x040,
    #[num_enum(catch_all)]
    Unknown(u16),
}

impl Printwheel {
    /// Pitch to run with. Anything that is not a known 10P or 15P wheel
    /// falls back to 12 cpi.
    pub fn pitch(self) -> Pitch {
        match self {
            Printwheel::Ten => Pitch::Ten,
            Printwheel::Fifteen => Pitch::Fifteen,
            _ => Pitch::Twelve,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Printwheel::Undetected => "Unable to determine printwheel. Defaulting to 12P.",
            Printwheel::Ps => "PS printwheel",
            Printwheel::Fifteen => "15P printwheel",
            Printwheel::Twelve => "12P printwheel",
            Printwheel::Ten => "10P printwheel",
            Printwheel::Absent | Printwheel::Unknown(_) => "No printwheel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_stops() {
        assert_eq!(Pitch::Ten.tab_stop(), 5);
        assert_eq!(Pitch::Twelve.tab_stop(), 6);
        assert_eq!(Pitch::Fifteen.tab_stop(), 7);
    }

    #[test]
    fn test_printwheel_codes() {
        assert_eq!(Printwheel::from(0x000u16), Printwheel::Undetected);
        assert_eq!(Printwheel::from(0x008u16), Printwheel::Ps);
        assert_eq!(Printwheel::from(0x010u16), Printwheel::Fifteen);
        assert_eq!(Printwheel::from(0x020u16), Printwheel::Twelve);
        assert_eq!(Printwheel::from(0x021u16), Printwheel::Absent);
        assert_eq!(Printwheel::from(0x040u16), Printwheel::Ten);
        assert_eq!(Printwheel::from(0x055u16), Printwheel::Unknown(0x055));
    }

    #[test]
    fn test_printwheel_pitch() {
        assert_eq!(Printwheel::Fifteen.pitch(), Pitch::Fifteen);
        assert_eq!(Printwheel::Ten.pitch(), Pitch::Ten);
        assert_eq!(Printwheel::Ps.pitch(), Pitch::Twelve);
        assert_eq!(Printwheel::Undetected.pitch(), Pitch::Twelve);
        assert_eq!(Printwheel::Unknown(0x7F).pitch(), Pitch::Twelve);
    }

    #[test]
    fn test_unrecognized_code_reports_no_printwheel() {
        assert_eq!(Printwheel::Unknown(0x7F).message(), "No printwheel");
        assert_eq!(Printwheel::Absent.message(), "No printwheel");
        assert_eq!(
            Printwheel::Undetected.message(),
            "Unable to determine printwheel. Defaulting to 12P."
        );
    }
}
