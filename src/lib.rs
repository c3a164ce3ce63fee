//! Clock and alarm appliance: DS3231 real-time clock, SSD1306 display,
//! four buttons, a potentiometer, two LEDs and a buzzer.
//!
//! The library holds everything that does not depend on the board: the
//! data model, the UI and alarm state machines, the per-cycle glue and the
//! peripheral drivers written against `embedded-hal` traits. The modules
//! touching AVR registers are only compiled with the `arduino-uno` feature.
#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "arduino-uno", feature(abi_avr_interrupt))]

pub mod alarm;
pub mod clocks;
pub mod inputs;
pub mod outputs;
pub mod serial_log;
pub mod state;
pub mod ui;

use alarm::AlarmSetting;

/// Alarm threshold at power-up: 05:00, enabled.
pub const DEFAULT_ALARM: AlarmSetting = AlarmSetting {
    hour: 5,
    minute: 0,
    enabled: true,
};
/// Fixed pause between two iterations of the main loop
pub const CYCLE_PERIOD_MS: u16 = 50;
/// Highest raw value of the knob (10 bits ADC)
pub const KNOB_MAX: u16 = 1023;
/// Inclusive upper bound of an hour
pub const HOUR_MAX: u8 = 23;
/// Inclusive upper bound of a minute
pub const MINUTE_MAX: u8 = 59;
/// Period of the status LED heartbeat
pub const HEARTBEAT_PERIOD_MS: u32 = 1000;
/// Duration the status LED stays on at the beginning of each period
pub const HEARTBEAT_ON_MS: u32 = 100;
/// Frequency of the alarm tone
pub const TONE_FREQUENCY_HZ: u16 = 2000;

/// Fatal failures of the peripheral bring-up. There is no degraded mode:
/// the firmware reports the fault and halts before the main loop starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The RTC did not answer on the bus
    ClockSource,
    /// The display did not answer on the bus
    Renderer,
}

impl ufmt::uDisplay for Fault {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        match self {
            Fault::ClockSource => f.write_str("RTC Error"),
            Fault::Renderer => f.write_str("OLED Error"),
        }
    }
}
