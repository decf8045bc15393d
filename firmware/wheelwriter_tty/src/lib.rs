#![cfg_attr(not(test), no_std)]

// Public modules for testing
pub mod channel;
pub mod clock;
pub mod codes;
pub mod config;
pub mod handshake;
pub mod indicator;
pub mod interpreter;
pub mod pitch;
pub mod router;
pub mod system;
pub mod terminal;
pub mod typewriter;
pub mod word;
