/// Control Code Interpreter
/// Turns console bytes into typewriter actions. Understands the printable
/// ASCII set, BEL BS HT LF VT CR, a subset of the Diablo 630 escape
/// commands and a few diagnostics:
///
/// <ESC><O>  bold on              <ESC><&>  bold off
/// <ESC><E>  continuous underline <ESC><b>  broken underline
/// <ESC><R>  underline off        <ESC><X>  bold and underline off
/// <ESC><U>  half line up         <ESC><D>  half line down
/// <ESC><LF> reverse line feed    <ESC><BS> backspace 1/120 inch
/// <ESC><u>  paper up 1/48 inch   <ESC><d>  paper down 1/48 inch
/// <ESC><p>  10 cpi  <ESC><e>  12 cpi  <ESC><m>  15 cpi
///
/// <ESC><^Z><c>    report column
/// <ESC><^Z><k>    report keyboard pass-through
/// <ESC><^Z><u>    report uptime
/// <ESC><^Z><w>    report reset count
/// <ESC><^Z><r>    reset the controller
/// <ESC><^Z><p><n> report status port n (0-3)
/// <ESC><^Z><e><n> error LED blinking on (odd n) or off (even n)
///
/// A byte that matches nothing at the current depth abandons the sequence.

use crate::channel::{console_write, Channel};
use crate::clock::Clock;
use crate::codes::{BEL, BS, CR, DIAGNOSTIC, ESC, HT, LF, NUL, SP, VT};
use crate::config::Config;
use crate::pitch::Pitch;
use crate::system::System;
use crate::typewriter::{Attributes, Typewriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterState {
    pub attributes: Attributes,
    /// 1 is the left margin
    pub column: u16,
    pub tab_stop: u8,
    pub pitch: Pitch,
}

impl Default for PrinterState {
    fn default() -> Self {
        PrinterState {
            attributes: Attributes::NONE,
            column: 1,
            tab_stop: Pitch::Ten.tab_stop(),
            pitch: Pitch::Ten,
        }
    }
}

/// How far into an escape sequence we are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Idle,
    /// After ESC
    Escape,
    /// After ESC ^Z
    Diagnostic,
    /// After ESC ^Z p
    Port,
    /// After ESC ^Z e
    Indicator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// The controller must be reset.
    Reset,
}

/// Everything a byte may touch outside the interpreter.
pub struct Context<'a, C, W, S> {
    pub console: &'a mut C,
    pub typewriter: &'a mut W,
    pub system: &'a S,
    pub clock: &'a Clock,
    pub pass_through: bool,
}

pub struct Interpreter {
    state: PrinterState,
    depth: Depth,
    config: Config,
}

impl Interpreter {
    pub fn new(config: Config) -> Self {
        Interpreter {
            state: PrinterState::default(),
            depth: Depth::Idle,
            config,
        }
    }

    pub fn state(&self) -> &PrinterState {
        &self.state
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Change pitch and tab stop together.
    pub fn select_pitch<W: Typewriter>(&mut self, pitch: Pitch, typewriter: &mut W) {
        typewriter.set_pitch(pitch);
        self.state.pitch = pitch;
        self.state.tab_stop = pitch.tab_stop();
    }

    pub fn consume<C, W, S>(&mut self, byte: u8, ctx: &mut Context<'_, C, W, S>) -> Outcome
    where
        C: Channel<u8>,
        W: Typewriter,
        S: System,
    {
        let (next, outcome) = match self.depth {
            Depth::Idle => (self.idle(byte, ctx), Outcome::Continue),
            Depth::Escape => (self.escape(byte, ctx), Outcome::Continue),
            Depth::Diagnostic => self.diagnostic(byte, ctx),
            Depth::Port => (self.port(byte, ctx), Outcome::Continue),
            Depth::Indicator => (self.indicator(byte, ctx), Outcome::Continue),
        };
        self.depth = next;
        outcome
    }

    fn idle<C, W, S>(&mut self, byte: u8, ctx: &mut Context<'_, C, W, S>) -> Depth
    where
        C: Channel<u8>,
        W: Typewriter,
    {
        match byte {
            NUL => {}
            BEL => {
                ctx.typewriter.spin();
                let _ = ctx.console.write(BEL);
            }
            BS => {
                if self.state.column > 1 {
                    ctx.typewriter.backspace();
                    self.state.column -= 1;
                    let _ = ctx.console.write(BS);
                }
            }
            HT => {
                let tab_stop = u16::from(self.state.tab_stop);
                let spaces = (tab_stop - self.state.column % tab_stop) as u8;
                ctx.typewriter.horizontal_tab(spaces);
                for _ in 0..spaces {
                    self.state.column = self.state.column.saturating_add(1);
                    let _ = ctx.console.write(SP);
                }
            }
            LF => {
                ctx.typewriter.linefeed();
                let _ = ctx.console.write(LF);
            }
            VT => ctx.typewriter.linefeed(),
            CR => {
                ctx.typewriter.carriage_return();
                self.state.column = 1;
                self.state.attributes.clear();
                if self.config.auto_linefeed {
                    ctx.typewriter.linefeed();
                }
                let _ = ctx.console.write(CR);
            }
            ESC => return Depth::Escape,
            letter => {
                ctx.typewriter.print_letter(letter, self.state.attributes);
                let _ = ctx.console.write(letter);
                self.state.column = self.state.column.saturating_add(1);
            }
        }
        Depth::Idle
    }

    fn escape<C, W, S>(&mut self, byte: u8, ctx: &mut Context<'_, C, W, S>) -> Depth
    where
        W: Typewriter,
    {
        match byte {
            b'O' => self.state.attributes.insert(Attributes::BOLD),
            b'&' => self.state.attributes.remove(Attributes::BOLD),
            b'E' => self.state.attributes.insert(Attributes::CONTINUOUS_UNDERLINE),
            b'b' => self.state.attributes.insert(Attributes::BROKEN_UNDERLINE),
            b'R' => self.state.attributes.remove(Attributes::UNDERLINE),
            b'X' => self.state.attributes.clear(),
            b'U' => ctx.typewriter.paper_up(),
            b'D' => ctx.typewriter.paper_down(),
            LF => ctx.typewriter.reverse_linefeed(),
            BS => ctx.typewriter.micro_backspace(),
            b'u' => ctx.typewriter.micro_up(),
            b'd' => ctx.typewriter.micro_down(),
            b'p' => self.select_pitch(Pitch::Ten, &mut *ctx.typewriter),
            b'e' => self.select_pitch(Pitch::Twelve, &mut *ctx.typewriter),
            b'm' => self.select_pitch(Pitch::Fifteen, &mut *ctx.typewriter),
            DIAGNOSTIC => return Depth::Diagnostic,
            _ => {}
        }
        Depth::Idle
    }

    fn diagnostic<C, W, S>(&mut self, byte: u8, ctx: &mut Context<'_, C, W, S>) -> (Depth, Outcome)
    where
        C: Channel<u8>,
        S: System,
    {
        match byte {
            b'c' => console_write!(ctx.console, "Column: {}\n", self.state.column),
            b'k' => {
                let destination = if ctx.pass_through {
                    "Wheelwriter"
                } else {
                    "serial console"
                };
                console_write!(ctx.console, "Wheelwriter key strokes go to {}.\n", destination);
            }
            b'u' => console_write!(ctx.console, "Uptime: {}\n", ctx.clock.uptime()),
            b'w' => {
                if let Some(count) = ctx.system.reset_count() {
                    console_write!(ctx.console, "Resets: {}\n", count);
                }
            }
            b'r' => return (Depth::Idle, Outcome::Reset),
            b'p' => return (Depth::Port, Outcome::Continue),
            b'e' => return (Depth::Indicator, Outcome::Continue),
            _ => {}
        }
        (Depth::Idle, Outcome::Continue)
    }

    fn port<C, W, S>(&mut self, byte: u8, ctx: &mut Context<'_, C, W, S>) -> Depth
    where
        C: Channel<u8>,
        S: System,
    {
        if let b'0'..=b'3' = byte {
            let index = byte - b'0';
            console_write!(ctx.console, "P{}: 0x{:02X}\n", index, ctx.system.port(index));
        }
        Depth::Idle
    }

    fn indicator<C, W, S>(&mut self, byte: u8, ctx: &mut Context<'_, C, W, S>) -> Depth {
        if byte & 0x01 != 0 {
            ctx.clock.indicator.enable();
        } else {
            ctx.clock.indicator.disable();
        }
        Depth::Idle
    }
}
