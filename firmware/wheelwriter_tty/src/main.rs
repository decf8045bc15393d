#![no_std]
#![no_main]

use panic_halt as _;

use core::cell::RefCell;

use cortex_m::interrupt::{self as critical, Mutex};
use cortex_m::peripheral::{NVIC, SCB};
use cortex_m_rt::entry;

use atsamd_hal as hal;
use hal::clock::GenericClockController;
use hal::fugit::ExtU32;
use hal::gpio::{Pin, Pins, PushPullOutput, PA20};
use hal::pac::{interrupt, CorePeripherals, Peripherals};
use hal::prelude::*;
use hal::timer::TimerCounter3;

use wheelwriter_tty::channel::Line;
use wheelwriter_tty::clock::{Clock, TICK_MS};
use wheelwriter_tty::config::Config;
use wheelwriter_tty::router::{Event, Links};
use wheelwriter_tty::system::System;
use wheelwriter_tty::terminal::{self, Banner, COPYRIGHT, TITLE};
use wheelwriter_tty::word::{Frame, Word};

mod uart;
mod wheelwriter;

use uart::{UartInterface, Wires, BOARD_QUEUE, CONSOLE_QUEUE, FRAME_QUEUE};
use wheelwriter::Wheelwriter;

type RedLed = Pin<PA20, PushPullOutput>;

static CLOCK: Clock = Clock::new();

/// Tick timer and the LED it blinks, shared with the TC3 interrupt.
static TICK: Mutex<RefCell<Option<(TimerCounter3, RedLed)>>> = Mutex::new(RefCell::new(None));

const CONTROLLER: &str = "Microchip ATSAMD51J MCU";
const COMPILED: &str = concat!("Compiled on ", env!("BUILD_TIMESTAMP"));

/// Port groups as seen by the `ESC ^Z p n` diagnostic.
struct Controller;

impl System for Controller {
    fn port(&self, index: u8) -> u8 {
        // SAFETY: read-only access to the PORT input register
        let port = unsafe { &*hal::pac::PORT::ptr() };
        let bits = port.group0.in_.read().bits();
        (bits >> (8 * u32::from(index & 0x03))) as u8
    }
}

#[entry]
fn main() -> ! {
    // Get peripheral instances
    let mut peripherals = Peripherals::take().unwrap();
    let mut core = CorePeripherals::take().unwrap();

    // Configure clocks
    let mut clocks = GenericClockController::with_internal_32kosc(
        peripherals.GCLK,
        &mut peripherals.MCLK,
        &mut peripherals.OSC32KCTRL,
        &mut peripherals.OSCCTRL,
        &mut peripherals.NVMCTRL,
    );

    let pins = Pins::new(peripherals.PORT);

    // =======================================================================
    // Status LEDs, power-on-reset line and dip switches
    // =======================================================================

    // LEDs are active low
    let mut red: RedLed = pins.pa20.into_push_pull_output();
    let mut amber = pins.pa21.into_push_pull_output();
    let mut green = pins.pa15.into_push_pull_output();
    red.set_high().ok();
    amber.set_high().ok();
    green.set_high().ok();

    let mut por = pins.pa14.into_push_pull_output();
    por.set_high().ok();

    let switch1 = pins.pa16.into_pull_up_input();
    let switch2 = pins.pa17.into_pull_up_input();
    let switch3 = pins.pa18.into_pull_up_input();
    let switch4 = pins.pa19.into_pull_up_input();
    // Switch 1 in bit 0, a switch that is on reads as 0
    let levels = [switch1.is_high(), switch2.is_high(), switch3.is_high(), switch4.is_high()];
    let bank = levels
        .iter()
        .enumerate()
        .filter(|(_, level)| !matches!(level, Ok(false)))
        .fold(0u8, |bank, (bit, _)| bank | 1 << bit);
    let config = Config::from_switches(bank);

    // =======================================================================
    // 50 ms tick
    // =======================================================================

    let gclk0 = clocks.gclk0();
    let tc23 = clocks.tc2_tc3(&gclk0).unwrap();
    let mut timer = TimerCounter3::tc3_(&tc23, peripherals.TC3, &mut peripherals.MCLK);
    timer.start(TICK_MS.millis());
    timer.enable_interrupt();
    critical::free(|cs| TICK.borrow(cs).replace(Some((timer, red))));
    unsafe {
        core.NVIC.set_priority(interrupt::TC3, 0x40);
        NVIC::unmask(interrupt::TC3);
    }

    // =======================================================================
    // Serial links
    // =======================================================================

    let mut uarts = UartInterface::new(
        &mut clocks,
        &mut peripherals.MCLK,
        peripherals.SERCOM0,
        peripherals.SERCOM2,
        peripherals.SERCOM3,
        (pins.pa04, pins.pa05, pins.pa06, pins.pa07),
        (pins.pa12, pins.pa13),
        (pins.pa22, pins.pa23),
    );

    let console_line = cortex_m::singleton!(: Line<u8, CONSOLE_QUEUE> = Line::new()).unwrap();
    let function_line = cortex_m::singleton!(: Line<Word, BOARD_QUEUE> = Line::new()).unwrap();
    let printer_line = cortex_m::singleton!(: Line<Word, BOARD_QUEUE> = Line::new()).unwrap();
    let command_line = cortex_m::singleton!(: Line<Frame, FRAME_QUEUE> = Line::new()).unwrap();

    let (console, console_wire) = console_line.split();
    let (function_board, function_wire) = function_line.split();
    let (printer_board, printer_wire) = printer_line.split();
    let (commands, command_wire) = command_line.split();

    let mut wires = Wires {
        console: console_wire,
        function_board: function_wire,
        printer_board: printer_wire,
        commands: command_wire,
    };

    let mut links = Links {
        console,
        function_board,
        printer_board,
    };

    // =======================================================================
    // Startup
    // =======================================================================

    let banner = Banner {
        title: TITLE,
        controller: CONTROLLER,
        compiled: COMPILED,
        copyright: COPYRIGHT,
    };
    banner.write_to(&mut links.console);
    while wires.console.pending() {
        uarts.service(&mut wires);
    }

    // Release the boards only once the banner is out
    por.set_low().ok();

    let mut router = terminal::start(
        links,
        Wheelwriter::new(commands),
        Controller,
        &CLOCK,
        config,
        || uarts.service(&mut wires),
    );

    // =======================================================================
    // Main Loop
    // =======================================================================

    loop {
        uarts.service(&mut wires);
        match router.poll() {
            Event::Idle => {}
            Event::Heartbeat => {
                green.toggle().ok();
            }
            Event::Reset => {
                // Let the console drain before going down
                while wires.console.pending() {
                    uarts.service(&mut wires);
                }
                SCB::sys_reset();
            }
        }
    }
}

#[interrupt]
fn TC3() {
    critical::free(|cs| {
        if let Some((timer, red)) = TICK.borrow(cs).borrow_mut().as_mut() {
            // Clears the overflow flag
            let _ = timer.wait();
            CLOCK.tick();
            let _ = CLOCK.indicator.drive(red);
        }
    });
}
