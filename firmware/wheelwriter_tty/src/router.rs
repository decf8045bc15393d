/// Protocol Router
/// Steady-state loop body. Printer board traffic always goes back to the
/// function board. Function board traffic goes to the printer board while
/// pass-through is on; otherwise each key is acknowledged and sent to the
/// console as ASCII. Console bytes drive the interpreter, except ^P which
/// flips pass-through.

use crate::channel::Channel;
use crate::clock::Clock;
use crate::codes::TOGGLE;
use crate::interpreter::{Context, Interpreter, Outcome};
use crate::system::System;
use crate::typewriter::Typewriter;
use crate::word::Word;

/// The three serial links.
pub struct Links<C, F, P> {
    pub console: C,
    pub function_board: F,
    pub printer_board: P,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Idle,
    /// Loop counter wrapped, toggle the heartbeat LED.
    Heartbeat,
    /// Reset requested from the console.
    Reset,
}

pub struct Router<'a, C, F, P, W, S> {
    links: Links<C, F, P>,
    typewriter: W,
    system: S,
    clock: &'a Clock,
    interpreter: Interpreter,
    pass_through: bool,
    loops: u16,
}

impl<'a, C, F, P, W, S> Router<'a, C, F, P, W, S>
where
    C: Channel<u8>,
    F: Channel<Word>,
    P: Channel<Word>,
    W: Typewriter,
    S: System,
{
    pub fn new(
        links: Links<C, F, P>,
        typewriter: W,
        system: S,
        clock: &'a Clock,
        interpreter: Interpreter,
    ) -> Self {
        Router {
            links,
            typewriter,
            system,
            clock,
            interpreter,
            pass_through: true,
            loops: 0,
        }
    }

    pub fn pass_through(&self) -> bool {
        self.pass_through
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn typewriter(&self) -> &W {
        &self.typewriter
    }

    pub fn typewriter_mut(&mut self) -> &mut W {
        &mut self.typewriter
    }

    pub fn links_mut(&mut self) -> &mut Links<C, F, P> {
        &mut self.links
    }

    /// One pass of the main loop. Never waits for input.
    pub fn poll(&mut self) -> Event {
        let links = &mut self.links;

        while let Some(word) = links.function_board.read() {
            if self.pass_through {
                let _ = links.printer_board.write(word);
            } else {
                let _ = links.function_board.write(Word::ACK);
                if let Some(key) = self.typewriter.decode_key(word) {
                    let _ = links.console.write(key);
                }
            }
        }

        while let Some(word) = links.printer_board.read() {
            let _ = links.function_board.write(word);
        }

        if links.console.available() {
            if let Some(byte) = links.console.read() {
                if byte == TOGGLE {
                    self.pass_through = !self.pass_through;
                    self.typewriter.reset_decoder();
                } else {
                    let mut ctx = Context {
                        console: &mut links.console,
                        typewriter: &mut self.typewriter,
                        system: &self.system,
                        clock: self.clock,
                        pass_through: self.pass_through,
                    };
                    if self.interpreter.consume(byte, &mut ctx) == Outcome::Reset {
                        return Event::Reset;
                    }
                }
            }
        }

        self.loops = self.loops.wrapping_add(1);
        if self.loops == 0 {
            Event::Heartbeat
        } else {
            Event::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Endpoint, Line, Wire};
    use crate::config::Config;
    use crate::typewriter::{Action, Attributes, Recorder};

    struct Ports;

    impl System for Ports {
        fn port(&self, _index: u8) -> u8 {
            0
        }
    }

    type TestRouter<'a> = Router<
        'a,
        Endpoint<'a, u8, 64>,
        Endpoint<'a, Word, 64>,
        Endpoint<'a, Word, 64>,
        Recorder<64>,
        Ports,
    >;

    struct Wires<'a> {
        console: Wire<'a, u8, 64>,
        function_board: Wire<'a, Word, 64>,
        printer_board: Wire<'a, Word, 64>,
    }

    struct Lines {
        console: Line<u8, 64>,
        function_board: Line<Word, 64>,
        printer_board: Line<Word, 64>,
    }

    impl Lines {
        fn new() -> Self {
            Lines {
                console: Line::new(),
                function_board: Line::new(),
                printer_board: Line::new(),
            }
        }

        fn router<'a>(&'a mut self, clock: &'a Clock) -> (TestRouter<'a>, Wires<'a>) {
            let (console, console_wire) = self.console.split();
            let (function_board, fb_wire) = self.function_board.split();
            let (printer_board, pb_wire) = self.printer_board.split();
            let links = Links {
                console,
                function_board,
                printer_board,
            };
            let router = Router::new(
                links,
                Recorder::new(),
                Ports,
                clock,
                Interpreter::new(Config::default()),
            );
            let wires = Wires {
                console: console_wire,
                function_board: fb_wire,
                printer_board: pb_wire,
            };
            (router, wires)
        }
    }

    fn drain<T, const N: usize>(wire: &mut Wire<'_, T, N>) -> std::vec::Vec<T> {
        let mut out = std::vec::Vec::new();
        while let Some(value) = wire.take() {
            out.push(value);
        }
        out
    }

    fn words(raw: &[u16]) -> std::vec::Vec<Word> {
        raw.iter().map(|&r| Word::new(r)).collect()
    }

    #[test]
    fn test_pass_through_forwards_verbatim() {
        let clock = Clock::new();
        let mut lines = Lines::new();
        let (mut router, mut wires) = lines.router(&clock);
        assert!(router.pass_through());

        let sent = words(&[0x121, 0x001, 0x082, 0x1FF]);
        for &word in &sent {
            wires.function_board.deliver(word).unwrap();
        }
        router.poll();

        assert_eq!(drain(&mut wires.printer_board), sent);
        assert!(drain(&mut wires.function_board).is_empty());
        assert!(drain(&mut wires.console).is_empty());
    }

    #[test]
    fn test_interception_acknowledges_each_word() {
        let clock = Clock::new();
        let mut lines = Lines::new();
        let (mut router, mut wires) = lines.router(&clock);

        wires.console.deliver(TOGGLE).unwrap();
        router.poll();
        assert!(!router.pass_through());

        for word in words(&[0x048, 0x069, 0x080]) {
            wires.function_board.deliver(word).unwrap();
        }
        router.poll();

        assert_eq!(
            drain(&mut wires.function_board),
            std::vec![Word::ACK, Word::ACK, Word::ACK]
        );
        assert!(drain(&mut wires.printer_board).is_empty());
        // 0x080 has no character
        assert_eq!(drain(&mut wires.console), b"Hi");
    }

    #[test]
    fn test_printer_board_always_relayed() {
        let clock = Clock::new();
        let mut lines = Lines::new();
        let (mut router, mut wires) = lines.router(&clock);

        wires.printer_board.deliver(Word::new(0x020)).unwrap();
        router.poll();
        assert_eq!(drain(&mut wires.function_board), words(&[0x020]));

        wires.console.deliver(TOGGLE).unwrap();
        router.poll();
        wires.printer_board.deliver(Word::new(0x040)).unwrap();
        router.poll();
        assert_eq!(drain(&mut wires.function_board), words(&[0x040]));
    }

    #[test]
    fn test_toggle_flips_once_and_is_not_interpreted() {
        let clock = Clock::new();
        let mut lines = Lines::new();
        let (mut router, mut wires) = lines.router(&clock);

        wires.console.deliver(TOGGLE).unwrap();
        wires.console.deliver(TOGGLE).unwrap();
        router.poll();
        assert!(!router.pass_through());
        router.poll();
        assert!(router.pass_through());

        assert!(router.typewriter().actions().is_empty());
        assert!(drain(&mut wires.console).is_empty());
        assert_eq!(router.interpreter().state().column, 1);
    }

    #[test]
    fn test_toggle_resets_key_decoder() {
        let clock = Clock::new();
        let mut lines = Lines::new();
        let (mut router, mut wires) = lines.router(&clock);
        assert_eq!(router.typewriter().decoder_resets(), 0);

        wires.console.deliver(TOGGLE).unwrap();
        router.poll();
        assert_eq!(router.typewriter().decoder_resets(), 1);

        wires.console.deliver(TOGGLE).unwrap();
        router.poll();
        assert_eq!(router.typewriter().decoder_resets(), 2);
    }

    #[test]
    fn test_one_console_byte_per_pass() {
        let clock = Clock::new();
        let mut lines = Lines::new();
        let (mut router, mut wires) = lines.router(&clock);

        for &byte in b"ab" {
            wires.console.deliver(byte).unwrap();
        }
        router.poll();
        assert_eq!(
            router.typewriter().actions(),
            &[Action::Print(b'a', Attributes::NONE)]
        );
        router.poll();
        assert_eq!(router.typewriter().actions().len(), 2);
        assert_eq!(drain(&mut wires.console), b"ab");
    }

    #[test]
    fn test_pass_through_report_follows_toggle() {
        let clock = Clock::new();
        let mut lines = Lines::new();
        let (mut router, mut wires) = lines.router(&clock);

        wires.console.deliver(TOGGLE).unwrap();
        for &byte in b"\x1b\x1ak" {
            wires.console.deliver(byte).unwrap();
        }
        for _ in 0..4 {
            router.poll();
        }
        assert_eq!(
            drain(&mut wires.console),
            b"Wheelwriter key strokes go to serial console.\n"
        );
    }

    #[test]
    fn test_reset_event() {
        let clock = Clock::new();
        let mut lines = Lines::new();
        let (mut router, mut wires) = lines.router(&clock);

        for &byte in b"\x1b\x1ar" {
            wires.console.deliver(byte).unwrap();
        }
        assert_eq!(router.poll(), Event::Idle);
        assert_eq!(router.poll(), Event::Idle);
        assert_eq!(router.poll(), Event::Reset);
    }

    #[test]
    fn test_heartbeat_every_65536_passes() {
        let clock = Clock::new();
        let mut lines = Lines::new();
        let (mut router, _wires) = lines.router(&clock);

        let beats = (0..(2 * 65536))
            .map(|_| router.poll())
            .filter(|&event| event == Event::Heartbeat)
            .count();
        assert_eq!(beats, 2);
    }
}
