/// Power-On Handshake
/// At power-on the function board resets the printer board, and the printer
/// board answers with the code of the installed print wheel. Both directions
/// are relayed untouched while we listen in.

use crate::channel::Channel;
use crate::clock::Countdown;
use crate::config::STARTUP_TIMEOUT_TICKS;
use crate::pitch::Printwheel;
use crate::word::Word;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    WaitingForReset,
    WaitingForConfirm,
    /// Reset command seen, next printer board word is the answer.
    Captured,
    Done(Word),
}

pub struct Detector {
    state: HandshakeState,
}

impl Detector {
    pub fn new() -> Self {
        Detector {
            state: HandshakeState::WaitingForReset,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Look at a function board word.
    pub fn observe_command(&mut self, word: Word) {
        self.state = match self.state {
            HandshakeState::WaitingForReset if word == Word::RESET_COMMAND => {
                HandshakeState::WaitingForConfirm
            }
            HandshakeState::WaitingForConfirm if word == Word::CONFIRM => HandshakeState::Captured,
            HandshakeState::WaitingForConfirm => HandshakeState::WaitingForReset,
            other => other,
        };
    }

    /// Look at a printer board word. Returns it when it is the answer to the
    /// reset command.
    pub fn observe_reply(&mut self, word: Word) -> Option<Word> {
        if self.state == HandshakeState::Captured {
            self.state = HandshakeState::Done(word);
            Some(word)
        } else {
            None
        }
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

/// Startup wait, bounded by the countdown.
pub struct Handshake<'c> {
    detector: Detector,
    countdown: Countdown<'c>,
    answer: Option<Word>,
}

impl<'c> Handshake<'c> {
    pub fn start(mut countdown: Countdown<'c>) -> Self {
        countdown.start(STARTUP_TIMEOUT_TICKS);
        Handshake {
            detector: Detector::new(),
            countdown,
            answer: None,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.detector.state()
    }

    /// Relay everything waiting on both board links.
    pub fn poll<F, P>(&mut self, function_board: &mut F, printer_board: &mut P)
    where
        F: Channel<Word>,
        P: Channel<Word>,
    {
        while let Some(word) = function_board.read() {
            let _ = printer_board.write(word);
            self.detector.observe_command(word);
        }

        while let Some(word) = printer_board.read() {
            let _ = function_board.write(word);
            if let Some(answer) = self.detector.observe_reply(word) {
                self.answer = Some(answer);
                // Got what we came for, finish on the next tick
                self.countdown.start(1);
            }
        }
    }

    pub fn finished(&self) -> bool {
        self.countdown.expired()
    }

    pub fn printwheel(&self) -> Printwheel {
        match self.answer {
            Some(word) => Printwheel::from(word.raw()),
            None => Printwheel::Undetected,
        }
    }

    /// Poll until the countdown runs out. `idle` runs after every pass.
    pub fn run<F, P>(
        mut self,
        function_board: &mut F,
        printer_board: &mut P,
        mut idle: impl FnMut(),
    ) -> Printwheel
    where
        F: Channel<Word>,
        P: Channel<Word>,
    {
        while !self.finished() {
            self.poll(function_board, printer_board);
            idle();
        }
        self.printwheel()
    }
}
