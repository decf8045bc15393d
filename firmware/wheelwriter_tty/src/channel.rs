/// Serial Channels
/// Byte (console) and word (board) links backed by queues the UARTs feed.
///
/// A [`Line`] owns two single-producer/single-consumer queues. Splitting it
/// gives the main loop an [`Endpoint`] and the UART driver a [`Wire`]; each
/// queue end has exactly one owner so neither side needs a lock.

use embedded_hal::serial;
use heapless::spsc::{Consumer, Producer, Queue};
use heapless::Vec;

/// Transmit queue had no room; the value was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow;

/// Non-blocking duplex channel as seen by the main loop.
pub trait Channel<T> {
    /// True when `read` would return a value.
    fn available(&self) -> bool;

    fn read(&mut self) -> Option<T>;

    fn write(&mut self, value: T) -> Result<(), Overflow>;
}

/// Queue storage for one serial link. `N` is the queue size; each direction
/// holds up to `N - 1` values.
pub struct Line<T, const N: usize> {
    inbound: Queue<T, N>,
    outbound: Queue<T, N>,
}

impl<T, const N: usize> Line<T, N> {
    pub const fn new() -> Self {
        Line {
            inbound: Queue::new(),
            outbound: Queue::new(),
        }
    }

    pub fn split(&mut self) -> (Endpoint<'_, T, N>, Wire<'_, T, N>) {
        let (in_producer, in_consumer) = self.inbound.split();
        let (out_producer, out_consumer) = self.outbound.split();
        (
            Endpoint {
                rx: in_consumer,
                tx: out_producer,
            },
            Wire {
                rx: in_producer,
                tx: out_consumer,
            },
        )
    }
}

impl<T, const N: usize> Default for Line<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Main-loop end of a line.
pub struct Endpoint<'a, T, const N: usize> {
    rx: Consumer<'a, T, N>,
    tx: Producer<'a, T, N>,
}

impl<'a, T, const N: usize> Channel<T> for Endpoint<'a, T, N> {
    fn available(&self) -> bool {
        self.rx.ready()
    }

    fn read(&mut self) -> Option<T> {
        self.rx.dequeue()
    }

    fn write(&mut self, value: T) -> Result<(), Overflow> {
        self.tx.enqueue(value).map_err(|_| Overflow)
    }
}

/// UART end of a line: received values go in, values to transmit come out.
pub struct Wire<'a, T, const N: usize> {
    rx: Producer<'a, T, N>,
    tx: Consumer<'a, T, N>,
}

impl<'a, T, const N: usize> Wire<'a, T, N> {
    /// Queue a value that arrived on the line.
    pub fn deliver(&mut self, value: T) -> Result<(), Overflow> {
        self.rx.enqueue(value).map_err(|_| Overflow)
    }

    /// Next value waiting to go out on the line.
    pub fn take(&mut self) -> Option<T> {
        self.tx.dequeue()
    }

    pub fn pending(&self) -> bool {
        self.tx.ready()
    }

    /// Move everything the UART has received into the line. Values that do
    /// not fit are dropped.
    pub fn receive_from<U, R>(&mut self, uart: &mut U)
    where
        U: serial::Read<R>,
        T: From<R>,
    {
        while let Ok(raw) = uart.read() {
            let _ = self.deliver(T::from(raw));
        }
    }

    /// Hand queued values to the UART until it stops accepting them.
    pub fn transmit_to<U, R>(&mut self, uart: &mut U)
    where
        U: serial::Write<R>,
        T: Copy,
        R: From<T>,
    {
        while let Some(&value) = self.tx.peek() {
            if uart.write(R::from(value)).is_err() {
                break;
            }
            self.tx.dequeue();
        }
    }

    pub fn pump<U, R>(&mut self, uart: &mut U)
    where
        U: serial::Read<R> + serial::Write<R>,
        T: Copy + From<R>,
        R: From<T>,
    {
        self.receive_from(uart);
        self.transmit_to(uart);
    }
}

/// Merges relayed values and whole frames onto one transmitter. Relayed
/// values go first, but a frame that has started always finishes before
/// anything else is sent.
pub struct Interleave<T, const F: usize> {
    frame: Vec<T, F>,
    sent: usize,
}

impl<T: Copy, const F: usize> Interleave<T, F> {
    pub const fn new() -> Self {
        Interleave {
            frame: Vec::new(),
            sent: 0,
        }
    }

    /// True while a frame is part way out.
    pub fn in_frame(&self) -> bool {
        self.sent < self.frame.len()
    }

    pub fn transmit_to<U, R, const N: usize, const M: usize>(
        &mut self,
        relay: &mut Wire<'_, T, N>,
        frames: &mut Wire<'_, Vec<T, F>, M>,
        uart: &mut U,
    ) where
        U: serial::Write<R>,
        R: From<T>,
    {
        loop {
            let next = if self.in_frame() {
                self.frame[self.sent]
            } else if let Some(&value) = relay.tx.peek() {
                value
            } else if let Some(frame) = frames.take() {
                self.frame = frame;
                self.sent = 0;
                continue;
            } else {
                return;
            };

            if uart.write(R::from(next)).is_err() {
                return;
            }
            if self.in_frame() {
                self.sent += 1;
            } else {
                relay.tx.dequeue();
            }
        }
    }
}

impl<T: Copy, const F: usize> Default for Interleave<T, F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write bytes until the channel refuses one.
pub fn send_all<C: Channel<u8>>(console: &mut C, bytes: &[u8]) -> Result<(), Overflow> {
    for &byte in bytes {
        console.write(byte)?;
    }
    Ok(())
}

/// Formatted console output. Text that does not fit the buffer or the
/// transmit queue is dropped.
macro_rules! console_write {
    ($console:expr, $($arg:tt)*) => {{
        use core::fmt::Write as _;
        let mut buffer = heapless::String::<64>::new();
        let _ = write!(&mut buffer, $($arg)*);
        let _ = $crate::channel::send_all($console, buffer.as_bytes());
    }};
}

pub(crate) use console_write;
