/// Startup Sequence
/// The banner goes out first, while the boards are still held in reset.
/// `start` then runs print wheel discovery and hands over to the router.

use crate::channel::{console_write, send_all, Channel};
use crate::clock::Clock;
use crate::config::Config;
use crate::handshake::Handshake;
use crate::interpreter::Interpreter;
use crate::pitch::Printwheel;
use crate::router::{Links, Router};
use crate::system::System;
use crate::typewriter::Typewriter;
use crate::word::Word;

pub const TITLE: &str = concat!("Wheelwriter Teletype Version ", env!("CARGO_PKG_VERSION"));
pub const COPYRIGHT: &str = "Copyright 2019 Jim Loos";

pub struct Banner<'s> {
    pub title: &'s str,
    pub controller: &'s str,
    pub compiled: &'s str,
    pub copyright: &'s str,
}

impl<'s> Banner<'s> {
    pub fn write_to<C: Channel<u8>>(&self, console: &mut C) {
        let _ = console.write(b'\n');
        for line in [self.title, self.controller, self.compiled, self.copyright] {
            let _ = send_all(console, line.as_bytes());
            let _ = console.write(b'\n');
        }
        let _ = console.write(b'\n');
    }
}

/// Run the handshake and build the router. `idle` runs after every
/// handshake pass.
pub fn start<'a, C, F, P, W, S>(
    mut links: Links<C, F, P>,
    mut typewriter: W,
    system: S,
    clock: &'a Clock,
    config: Config,
    idle: impl FnMut(),
) -> Router<'a, C, F, P, W, S>
where
    C: Channel<u8>,
    F: Channel<Word>,
    P: Channel<Word>,
    W: Typewriter,
    S: System,
{
    console_write!(&mut links.console, "Initializing...\n");

    let printwheel = match clock.countdown() {
        Some(countdown) => Handshake::start(countdown).run(
            &mut links.function_board,
            &mut links.printer_board,
            idle,
        ),
        None => Printwheel::Undetected,
    };

    let mut interpreter = Interpreter::new(config);
    interpreter.select_pitch(printwheel.pitch(), &mut typewriter);
    console_write!(&mut links.console, "{}\n", printwheel.message());
    console_write!(&mut links.console, "Ready\n");

    Router::new(links, typewriter, system, clock, interpreter)
}
