/// Printer Board Commands
/// Typewriter actions encoded as printer board command words. Each command
/// is the board address word followed by an opcode and its arguments.
/// Carrier motion is in 1/120 inch micro spaces, paper motion in 1/48 inch
/// micro lines.

use wheelwriter_tty::channel::{Channel, Endpoint};
use wheelwriter_tty::pitch::Pitch;
use wheelwriter_tty::typewriter::{Attributes, KeyDecoder, Typewriter, ADDRESS, PRINT};
use wheelwriter_tty::word::{Frame, Word};

use crate::uart::FRAME_QUEUE;

const PAPER: u16 = 0x005;
const CARRIER: u16 = 0x006;
const SPIN: u16 = 0x007;

const LEFT: u16 = 0x000;
const RIGHT: u16 = 0x080;
const DOWN: u16 = 0x000;
const UP: u16 = 0x080;

const LINE: u16 = 8;
const HALF_LINE: u16 = 4;
const MICRO_LINE: u16 = 1;

pub struct Wheelwriter<'a> {
    commands: Endpoint<'a, Frame, FRAME_QUEUE>,
    pitch: Pitch,
    /// Carrier distance from the left margin, in micro spaces.
    carrier: u16,
    keys: KeyDecoder,
}

impl<'a> Wheelwriter<'a> {
    pub fn new(commands: Endpoint<'a, Frame, FRAME_QUEUE>) -> Self {
        Wheelwriter {
            commands,
            pitch: Pitch::Twelve,
            carrier: 0,
            keys: KeyDecoder::new(),
        }
    }

    /// Queue one command as a single frame so its words go out together.
    fn send(&mut self, words: &[u16]) {
        let mut frame = Frame::new();
        for &word in core::iter::once(&ADDRESS).chain(words) {
            let _ = frame.push(Word::new(word));
        }
        let _ = self.commands.write(frame);
    }

    fn strike(&mut self, letter: u8, advance: u16) {
        self.send(&[PRINT, u16::from(letter), advance]);
        self.carrier = self.carrier.saturating_add(advance);
    }

    fn move_carrier(&mut self, right: bool, micro_spaces: u16) {
        let direction = if right { RIGHT } else { LEFT };
        self.send(&[CARRIER, direction | (micro_spaces >> 8), micro_spaces & 0xFF]);
        self.carrier = if right {
            self.carrier.saturating_add(micro_spaces)
        } else {
            self.carrier.saturating_sub(micro_spaces)
        };
    }

    fn feed(&mut self, up: bool, micro_lines: u16) {
        let direction = if up { UP } else { DOWN };
        self.send(&[PAPER, direction | micro_lines]);
    }
}

impl<'a> Typewriter for Wheelwriter<'a> {
    fn print_letter(&mut self, letter: u8, attributes: Attributes) {
        let advance = u16::from(self.pitch.micro_spaces());
        let underline = attributes.contains(Attributes::CONTINUOUS_UNDERLINE)
            || (attributes.contains(Attributes::BROKEN_UNDERLINE) && letter != b' ');

        if underline {
            self.strike(b'_', 0);
        }
        if attributes.contains(Attributes::BOLD) {
            // Second strike one micro space to the right
            self.strike(letter, 1);
            self.strike(letter, advance - 1);
        } else {
            self.strike(letter, advance);
        }
    }

    fn spin(&mut self) {
        self.send(&[SPIN]);
    }

    fn backspace(&mut self) {
        let advance = u16::from(self.pitch.micro_spaces());
        self.move_carrier(false, advance);
    }

    fn micro_backspace(&mut self) {
        self.move_carrier(false, 1);
    }

    fn horizontal_tab(&mut self, spaces: u8) {
        let advance = u16::from(self.pitch.micro_spaces());
        self.move_carrier(true, u16::from(spaces) * advance);
    }

    fn carriage_return(&mut self) {
        let distance = self.carrier;
        self.move_carrier(false, distance);
    }

    fn linefeed(&mut self) {
        self.feed(true, LINE);
    }

    fn reverse_linefeed(&mut self) {
        self.feed(false, LINE);
    }

    fn paper_up(&mut self) {
        self.feed(true, HALF_LINE);
    }

    fn paper_down(&mut self) {
        self.feed(false, HALF_LINE);
    }

    fn micro_up(&mut self) {
        self.feed(true, MICRO_LINE);
    }

    fn micro_down(&mut self) {
        self.feed(false, MICRO_LINE);
    }

    fn set_pitch(&mut self, pitch: Pitch) {
        self.pitch = pitch;
    }

    fn decode_key(&mut self, word: Word) -> Option<u8> {
        self.keys.feed(word)
    }

    fn reset_decoder(&mut self) {
        self.keys.reset();
    }
}
