/// UART Interface Module
/// SERCOM0 is the console with RTS/CTS handshaking, SERCOM2 the function
/// board, SERCOM3 the printer board. The board links use 9-bit characters.

use atsamd_hal as hal;
use hal::clock::GenericClockController;
use hal::fugit::RateExtU32;
use hal::gpio::{PA04, PA05, PA06, PA07, PA12, PA13, PA22, PA23, Pin, Reset};
use hal::pac::{MCLK, SERCOM0, SERCOM2, SERCOM3};
use hal::sercom::uart::{self, BaudMode, EightBit, NineBit, Oversampling};
use hal::sercom::{IoSet1, IoSet2, Sercom0, Sercom2, Sercom3};

use wheelwriter_tty::channel::{Interleave, Wire};
use wheelwriter_tty::word::{Frame, Word, MAX_FRAME};

pub const CONSOLE_BAUD: u32 = 9600;
pub const BOARD_BAUD: u32 = 187_500;

pub const CONSOLE_QUEUE: usize = 256;
pub const BOARD_QUEUE: usize = 64;
pub const FRAME_QUEUE: usize = 32;

type ConsolePads = uart::PadsFromIds<Sercom0, IoSet2, PA05, PA04, PA06, PA07>;
type FunctionPads = uart::PadsFromIds<Sercom2, IoSet1, PA13, PA12>;
type PrinterPads = uart::PadsFromIds<Sercom3, IoSet1, PA23, PA22>;

pub type ConsoleUart = uart::Uart<uart::Config<ConsolePads, EightBit>, uart::Duplex>;
pub type FunctionUart = uart::Uart<uart::Config<FunctionPads, NineBit>, uart::Duplex>;
pub type PrinterUart = uart::Uart<uart::Config<PrinterPads, NineBit>, uart::Duplex>;

pub struct UartInterface {
    console: ConsoleUart,
    function_board: FunctionUart,
    printer_board: PrinterUart,
    /// Keeps typewriter commands whole on the printer board link.
    printer_tx: Interleave<Word, MAX_FRAME>,
}

impl UartInterface {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clocks: &mut GenericClockController,
        mclk: &mut MCLK,
        sercom0: SERCOM0,
        sercom2: SERCOM2,
        sercom3: SERCOM3,
        console_pins: (Pin<PA04, Reset>, Pin<PA05, Reset>, Pin<PA06, Reset>, Pin<PA07, Reset>),
        function_pins: (Pin<PA12, Reset>, Pin<PA13, Reset>),
        printer_pins: (Pin<PA22, Reset>, Pin<PA23, Reset>),
    ) -> Self {
        let gclk0 = clocks.gclk0();
        let baud_mode = BaudMode::Fractional(Oversampling::Bits16);

        let console_freq = clocks.sercom0_core(&gclk0).unwrap().freq();
        let pads = uart::Pads::default()
            .rx(console_pins.1)
            .tx(console_pins.0)
            .rts(console_pins.2)
            .cts(console_pins.3);
        let console = uart::Config::new(mclk, sercom0, pads, console_freq)
            .baud(CONSOLE_BAUD.Hz(), baud_mode)
            .enable();

        let function_freq = clocks.sercom2_core(&gclk0).unwrap().freq();
        let pads = uart::Pads::default().rx(function_pins.1).tx(function_pins.0);
        let function_board = uart::Config::new(mclk, sercom2, pads, function_freq)
            .baud(BOARD_BAUD.Hz(), baud_mode)
            .char_size::<NineBit>()
            .enable();

        let printer_freq = clocks.sercom3_core(&gclk0).unwrap().freq();
        let pads = uart::Pads::default().rx(printer_pins.1).tx(printer_pins.0);
        let printer_board = uart::Config::new(mclk, sercom3, pads, printer_freq)
            .baud(BOARD_BAUD.Hz(), baud_mode)
            .char_size::<NineBit>()
            .enable();

        UartInterface {
            console,
            function_board,
            printer_board,
            printer_tx: Interleave::new(),
        }
    }
}

/// Queue ends the UARTs feed and drain.
pub struct Wires<'a> {
    pub console: Wire<'a, u8, CONSOLE_QUEUE>,
    pub function_board: Wire<'a, Word, BOARD_QUEUE>,
    pub printer_board: Wire<'a, Word, BOARD_QUEUE>,
    /// Typewriter commands, one frame per command.
    pub commands: Wire<'a, Frame, FRAME_QUEUE>,
}

impl UartInterface {
    /// Move data between the UARTs and the queues.
    pub fn service(&mut self, wires: &mut Wires<'_>) {
        wires.console.pump(&mut self.console);
        wires.function_board.pump(&mut self.function_board);
        wires.printer_board.receive_from(&mut self.printer_board);
        self.printer_tx.transmit_to(
            &mut wires.printer_board,
            &mut wires.commands,
            &mut self.printer_board,
        );
    }
}
