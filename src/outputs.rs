//! Outputs of the clock setup, for humans
use embedded_hal::digital::v2::OutputPin;

pub use buzzer::{Buzzer, ToneOutput};
pub use display::{Frame, Renderer, View};

pub mod buzzer;
pub mod display;

/// Sound and light actuators driven by the main loop.
pub trait Actuators {
    /// Audible alarm
    fn set_tone_active(&mut self, active: bool);
    /// Alarm indicator light
    fn set_alarm_light(&mut self, on: bool);
    /// Heartbeat light
    fn set_status_light(&mut self, on: bool);
}

pub struct Outputs<T: ToneOutput, P: OutputPin> {
    /// Buzzer alarm
    pub buzzer: Buzzer<T>,
    /// Led lit while the alarm is triggered
    pub alarm_light: Light<P>,
    /// Led blinking as long as the main loop runs
    pub status_light: Light<P>,
}

impl<T: ToneOutput, P: OutputPin> Outputs<T, P> {
    pub fn init(buzzer: Buzzer<T>, alarm_light: Light<P>, status_light: Light<P>) -> Self {
        Self {
            buzzer,
            alarm_light,
            status_light,
        }
    }
}

impl<T: ToneOutput, P: OutputPin> Actuators for Outputs<T, P> {
    fn set_tone_active(&mut self, active: bool) {
        self.buzzer.set_active(active);
    }

    fn set_alarm_light(&mut self, on: bool) {
        self.alarm_light.set(on);
    }

    fn set_status_light(&mut self, on: bool) {
        self.status_light.set(on);
    }
}

/// Single led, on a digital output.
pub struct Light<P: OutputPin> {
    /// Pin connected to the led
    pin: P,
    /// Mapping between the logical level (on) and the electric level of the pin
    logical_level_high: bool,
}

impl<P: OutputPin> Light<P> {
    /// Initialize the structure, the led being off.
    pub fn init(pin: P, logical_level_high: bool) -> Self {
        let mut out = Self {
            pin,
            logical_level_high,
        };
        out.set(false);
        out
    }

    /// Drive the pin. Writing the same level again is harmless, and
    /// a failed write is retried implicitly at the next cycle.
    pub fn set(&mut self, on: bool) {
        if on == self.logical_level_high {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
    }
}
