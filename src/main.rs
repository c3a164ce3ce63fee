//! Clock and alarm firmware for the ATMEGA328P microprocessor (Arduino Uno)
// Compiler commands appropriate for bare-metal development
#![no_std]
#![no_main]

/*
References:
ATMEGA238p: https://www.e-lab.de/downloads/DOCs/mega328P.pdf
Arduino: https://content.arduino.cc/assets/A000066-full-pinout.pdf
DS3231: https://www.analog.com/media/en/technical-documentation/data-sheets/DS3231.pdf
SSD1306: https://cdn-shop.adafruit.com/datasheets/SSD1306.pdf

          +---O---+
      PC6 |1    28| PC5  I2C.SCL - a5
  RXD PD0 |2    27| PC4  I2C.SDA - a4
  TXD PD1 |3    26| PC3
 set  PD2 |4    25| PC2
 up   PD3 |5    24| PC1
 down PD4 |6    23| PC0  knob - a0
      VCC |7    22| GND
      GND |8    21| AREF
      PB6 |9    20| AVCC
      PB7 |10   19| PB5
 mode PD5 |11   18| PB4
      PD6 |12   17| PB3
      PD7 |13   16| PB2  OC1B buzzer - d10
 led  PB0 |14   15| PB1  alarm led - d9
          +-------+
*/

use arduino_hal::{
    hal::wdt,
    port::{mode, Pin},
};
use core::{
    panic::PanicInfo,
    sync::atomic::{self, Ordering},
};
use embedded_hal::serial;
use oled_alarm_clock::{
    clocks::{build_datetime, timer, Clock, ClockSource},
    inputs::{AnalogSource, ButtonPins, Inputs},
    outputs::{buzzer::Timer1Tone, Buzzer, Light, Outputs},
    serial_log::SerialLog,
    state::MainState,
    Fault, CYCLE_PERIOD_MS,
};
use ssd1306::{prelude::*, I2CDisplayInterface, Ssd1306};

// Pinout of the peripherals, either as ATMETA32P port or arduino labels
type KnobInput = arduino_hal::hal::port::PC0; // a0

/// Mapping between the electric levels (+3.3V or +5V) and the logical level
/// of the buttons, wired to the ground with the internal pull-ups
const BUTTON_LOGICAL_LEVEL_HIGH: bool = false;
/// Mapping between the electric levels (+3.3V or +5V) and the logical level of the leds
const LED_LOGICAL_LEVEL_HIGH: bool = true;
/// Frequency of the I2C bus shared by the RTC and the display
const I2C_FREQUENCY_HZ: u32 = 400_000;
/// Baud rate of the serial log
const SERIAL_BAUD_RATE: u32 = 115_200;
/// Size, in bytes, of the buffer for serial output
const LOG_BUFFER_SIZE: usize = 128;
/// Reset the board when the loop stalls for this long
const WATCHDOG_TIMEOUT: wdt::Timeout = wdt::Timeout::Ms2000;

/// Potentiometer on the analog to digital converter
struct Knob {
    adc: arduino_hal::Adc,
    pin: Pin<mode::Analog, KnobInput>,
}

impl AnalogSource for Knob {
    fn read(&mut self) -> u16 {
        self.pin.analog_read(&mut self.adc)
    }
}

/// Report a fatal fault on the serial line and stop there.
fn halt<S: serial::Write<u8>>(
    log: &mut SerialLog<LOG_BUFFER_SIZE>,
    serial: &mut S,
    fault: Fault,
) -> ! {
    ufmt::uwriteln!(&mut *log, "{}", fault).ok();
    log.flush(serial).ok();
    loop {
        atomic::compiler_fence(Ordering::SeqCst);
    }
}

/// Entry point: initialization of the devices and endless loop
#[arduino_hal::entry]
fn main() -> ! {
    // Acquire hardware objects
    let dp = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(dp);
    let mut serial = arduino_hal::default_serial!(dp, pins, SERIAL_BAUD_RATE);
    let mut log = SerialLog::<LOG_BUFFER_SIZE>::default();
    timer::init(dp.TC0);

    ufmt::uwriteln!(log, "Start").ok();
    log.flush(&mut serial).ok();

    // The RTC and the display share the same bus
    let i2c = arduino_hal::I2c::new(
        dp.TWI,
        pins.a4.into_pull_up_input(),
        pins.a5.into_pull_up_input(),
        I2C_FREQUENCY_HZ,
    );
    let bus = shared_bus::BusManagerSimple::new(i2c);

    let mut clock = match Clock::init(bus.acquire_i2c(), build_datetime()) {
        Ok(clock) => clock,
        Err(_) => halt(&mut log, &mut serial, Fault::ClockSource),
    };
    if let Some(seeded) = clock.seeded {
        ufmt::uwriteln!(log, "RTC seeded {}", seeded).ok();
    }
    let now = match clock.read() {
        Ok(now) => now,
        Err(_) => halt(&mut log, &mut serial, Fault::ClockSource),
    };

    let mut display = Ssd1306::new(
        I2CDisplayInterface::new(bus.acquire_i2c()),
        DisplaySize128x64,
        DisplayRotation::Rotate0,
    )
    .into_buffered_graphics_mode();
    if display.init().is_err() {
        halt(&mut log, &mut serial, Fault::Renderer);
    }

    let mut adc = arduino_hal::Adc::new(dp.ADC, Default::default());
    let knob = Knob {
        pin: pins.a0.into_analog_input(&mut adc),
        adc,
    };
    let mut inputs = Inputs::init(
        ButtonPins {
            set: pins.d2.into_pull_up_input().downgrade(),
            up: pins.d3.into_pull_up_input().downgrade(),
            down: pins.d4.into_pull_up_input().downgrade(),
            mode: pins.d5.into_pull_up_input().downgrade(),
        },
        BUTTON_LOGICAL_LEVEL_HIGH,
        knob,
    );
    let mut outputs = Outputs::init(
        Buzzer::init(Timer1Tone::init(dp.TC1, pins.d10)),
        Light::init(pins.d9.into_output().downgrade(), LED_LOGICAL_LEVEL_HIGH),
        Light::init(pins.d8.into_output().downgrade(), LED_LOGICAL_LEVEL_HIGH),
    );

    let mut main = MainState::new(now);

    // Setup the hardware watchdog, in case something goes wrong.
    let mut watchdog = wdt::Wdt::new(dp.WDT, &dp.CPU.mcusr);
    watchdog.start(WATCHDOG_TIMEOUT).unwrap();
    unsafe { avr_device::interrupt::enable() };

    loop {
        main.run(
            &mut clock,
            &mut inputs,
            &mut outputs,
            &mut display,
            &mut log,
            timer::millis(),
        );
        log.flush(&mut serial).ok();
        watchdog.feed();
        arduino_hal::delay_ms(CYCLE_PERIOD_MS.into());
    }
}

/// Panic handler: do nothing, the watchdog resets the board
#[inline(never)]
#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    loop {
        atomic::compiler_fence(Ordering::SeqCst);
    }
}
