/// Board Link Words
/// The function board and printer board talk in 9-bit words, so a byte is
/// not wide enough to carry them.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Word(u16);

impl Word {
    /// Only the low nine bits travel on the wire.
    pub const MASK: u16 = 0x1FF;

    /// First word of the function board's reset command.
    pub const RESET_COMMAND: Word = Word(0x121);
    /// Second word of the reset command.
    pub const CONFIRM: Word = Word(0x001);
    /// Acknowledgment sent back to the function board for each intercepted word.
    pub const ACK: Word = Word(0x000);

    pub const fn new(raw: u16) -> Self {
        Word(raw & Self::MASK)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// Longest printer board command: address word plus three.
pub const MAX_FRAME: usize = 4;

/// One printer board command. Its words must reach the board back to back.
pub type Frame = heapless::Vec<Word, MAX_FRAME>;

impl From<u16> for Word {
    fn from(raw: u16) -> Self {
        Word::new(raw)
    }
}

impl From<Word> for u16 {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_is_nine_bits() {
        assert_eq!(Word::new(0x121).raw(), 0x121);
        assert_eq!(Word::new(0xFFFF).raw(), 0x1FF);
        assert_eq!(Word::from(0x200u16), Word::new(0));
    }

    #[test]
    fn test_word_display() {
        assert_eq!(Word::RESET_COMMAND.to_string(), "0x121");
        assert_eq!(Word::new(0x10).to_string(), "0x010");
    }
}
