/// Typewriter Mechanism
/// The physical actions the printer board can carry out, and a recorder
/// that keeps them in order for inspection.

use heapless::Vec;

use crate::pitch::Pitch;
use crate::word::Word;

/// Print attributes. Bold and the two underline styles are independent bits;
/// both underline bits may be set at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attributes(u8);

impl Attributes {
    pub const NONE: Attributes = Attributes(0x00);
    pub const BOLD: Attributes = Attributes(0x01);
    /// Spaces between words are underlined
    pub const CONTINUOUS_UNDERLINE: Attributes = Attributes(0x02);
    /// Spaces between words are not underlined
    pub const BROKEN_UNDERLINE: Attributes = Attributes(0x04);
    pub const UNDERLINE: Attributes = Attributes(0x06);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Attributes) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Attributes) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Attributes) {
        self.0 &= !other.0;
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

pub trait Typewriter {
    fn print_letter(&mut self, letter: u8, attributes: Attributes);
    /// Spin the print wheel without printing.
    fn spin(&mut self);
    fn backspace(&mut self);
    /// Move the carrier left 1/120 inch.
    fn micro_backspace(&mut self);
    fn horizontal_tab(&mut self, spaces: u8);
    fn carriage_return(&mut self);
    fn linefeed(&mut self);
    fn reverse_linefeed(&mut self);
    /// Half line up.
    fn paper_up(&mut self);
    /// Half line down.
    fn paper_down(&mut self);
    /// 1/48 inch up.
    fn micro_up(&mut self);
    /// 1/48 inch down.
    fn micro_down(&mut self);
    fn set_pitch(&mut self, pitch: Pitch);
    /// Translate a function board key word into ASCII. Keys with no
    /// character (shift, code, ...) give `None`.
    fn decode_key(&mut self, word: Word) -> Option<u8>;

    /// Forget a partly decoded key. Called whenever pass-through flips.
    fn reset_decoder(&mut self) {}
}

/// Printer board address, first word of every command.
pub const ADDRESS: u16 = 0x121;
/// Print opcode, followed by the letter and its spacing.
pub const PRINT: u16 = 0x003;

/// Picks the letter out of function board print commands: address, print,
/// letter, spacing.
#[derive(Debug, Clone, Default)]
pub struct KeyDecoder {
    step: u8,
}

impl KeyDecoder {
    pub const fn new() -> Self {
        KeyDecoder { step: 0 }
    }

    pub fn feed(&mut self, word: Word) -> Option<u8> {
        let step = self.step;
        self.step = match (step, word.raw()) {
            (0, ADDRESS) => 1,
            (1, PRINT) => 2,
            (2, _) => 3,
            _ => 0,
        };
        if step == 2 {
            Some(word.raw() as u8)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.step = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Print(u8, Attributes),
    Spin,
    Backspace,
    MicroBackspace,
    Tab(u8),
    CarriageReturn,
    Linefeed,
    ReverseLinefeed,
    PaperUp,
    PaperDown,
    MicroUp,
    MicroDown,
    SetPitch(Pitch),
}

/// Typewriter that records every action. Actions past capacity are counted
/// and dropped.
pub struct Recorder<const N: usize> {
    actions: Vec<Action, N>,
    dropped: usize,
    decoder_resets: usize,
}

impl<const N: usize> Recorder<N> {
    pub fn new() -> Self {
        Recorder {
            actions: Vec::new(),
            dropped: 0,
            decoder_resets: 0,
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn decoder_resets(&self) -> usize {
        self.decoder_resets
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.dropped = 0;
    }

    fn record(&mut self, action: Action) {
        if self.actions.push(action).is_err() {
            self.dropped += 1;
        }
    }
}

impl<const N: usize> Default for Recorder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Typewriter for Recorder<N> {
    fn print_letter(&mut self, letter: u8, attributes: Attributes) {
        self.record(Action::Print(letter, attributes));
    }

    fn spin(&mut self) {
        self.record(Action::Spin);
    }

    fn backspace(&mut self) {
        self.record(Action::Backspace);
    }

    fn micro_backspace(&mut self) {
        self.record(Action::MicroBackspace);
    }

    fn horizontal_tab(&mut self, spaces: u8) {
        self.record(Action::Tab(spaces));
    }

    fn carriage_return(&mut self) {
        self.record(Action::CarriageReturn);
    }

    fn linefeed(&mut self) {
        self.record(Action::Linefeed);
    }

    fn reverse_linefeed(&mut self) {
        self.record(Action::ReverseLinefeed);
    }

    fn paper_up(&mut self) {
        self.record(Action::PaperUp);
    }

    fn paper_down(&mut self) {
        self.record(Action::PaperDown);
    }

    fn micro_up(&mut self) {
        self.record(Action::MicroUp);
    }

    fn micro_down(&mut self) {
        self.record(Action::MicroDown);
    }

    fn set_pitch(&mut self, pitch: Pitch) {
        self.record(Action::SetPitch(pitch));
    }

    fn decode_key(&mut self, word: Word) -> Option<u8> {
        // Recorder treats the low seven bits as ASCII
        match (word.raw() & 0x7F) as u8 {
            0 => None,
            ascii => Some(ascii),
        }
    }

    fn reset_decoder(&mut self) {
        self.decoder_resets += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_are_independent() {
        let mut attributes = Attributes::NONE;
        attributes.insert(Attributes::BOLD);
        attributes.insert(Attributes::BROKEN_UNDERLINE);
        attributes.insert(Attributes::CONTINUOUS_UNDERLINE);
        assert_eq!(attributes.bits(), 0x07);

        attributes.remove(Attributes::UNDERLINE);
        assert_eq!(attributes, Attributes::BOLD);

        attributes.clear();
        assert!(attributes.is_empty());
    }

    #[test]
    fn test_recorder_keeps_order() {
        let mut recorder: Recorder<4> = Recorder::new();
        recorder.carriage_return();
        recorder.linefeed();
        recorder.print_letter(b'A', Attributes::BOLD);
        assert_eq!(
            recorder.actions(),
            &[
                Action::CarriageReturn,
                Action::Linefeed,
                Action::Print(b'A', Attributes::BOLD)
            ]
        );
    }

    fn key(decoder: &mut KeyDecoder, raw: &[u16]) -> Option<u8> {
        raw.iter().fold(None, |found, &r| found.or(decoder.feed(Word::new(r))))
    }

    #[test]
    fn test_key_decoder_takes_third_word() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(key(&mut decoder, &[0x121, 0x003, 0x041, 0x00A]), Some(0x41));
        assert_eq!(key(&mut decoder, &[0x121, 0x006, 0x080, 0x00A]), None);
        assert_eq!(key(&mut decoder, &[0x121, 0x003, 0x042, 0x00A]), Some(0x42));
    }

    #[test]
    fn test_key_decoder_reset_drops_partial_key() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(key(&mut decoder, &[0x121, 0x003]), None);
        decoder.reset();
        assert_eq!(key(&mut decoder, &[0x121, 0x003, 0x042, 0x00A]), Some(0x42));

        // Without the reset the next address word is taken for the letter
        let mut stale = KeyDecoder::new();
        assert_eq!(key(&mut stale, &[0x121, 0x003]), None);
        assert_eq!(stale.feed(Word::new(0x121)), Some(0x21));
    }

    #[test]
    fn test_recorder_overflow_is_counted() {
        let mut recorder: Recorder<2> = Recorder::new();
        recorder.spin();
        recorder.spin();
        recorder.spin();
        assert_eq!(recorder.actions().len(), 2);
        assert_eq!(recorder.dropped(), 1);
    }
}
