//! Control the buzzer.
use crate::TONE_FREQUENCY_HZ;

/// Square wave generator driving a passive buzzer.
pub trait ToneOutput {
    fn start(&mut self, frequency_hz: u16);
    fn stop(&mut self);
}

/// Buzzer structure. The tone generator is only reconfigured when the
/// requested state changes, so re-asserting it every cycle keeps the
/// wave continuous.
pub struct Buzzer<T: ToneOutput> {
    /// Tone generator
    tone: T,
    /// Status of the buzzer
    active: bool,
}

impl<T: ToneOutput> Buzzer<T> {
    /// Initialize the object, silent.
    pub fn init(tone: T) -> Self {
        let mut out = Self {
            tone,
            active: false,
        };
        out.tone.stop();
        out
    }

    /// Get the status of the buzzer.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sound or silence the buzzer.
    pub fn set_active(&mut self, active: bool) {
        match (self.active, active) {
            (false, true) => self.tone.start(TONE_FREQUENCY_HZ),
            (true, false) => self.tone.stop(),
            _ => {}
        }
        self.active = active;
    }
}

/// Hardware tone on d10 (OC1B): timer 1 in CTC mode toggles the pin at
/// each compare match, giving a square wave with no CPU involvement.
#[cfg(feature = "arduino-uno")]
pub struct Timer1Tone {
    tc1: arduino_hal::pac::TC1,
    /// Kept as an output: low while silent
    _pin: arduino_hal::port::Pin<arduino_hal::port::mode::Output, arduino_hal::hal::port::PB2>,
}

#[cfg(feature = "arduino-uno")]
impl Timer1Tone {
    /// Frequency of the CPU clock, feeding timer 1
    const CPU_FREQUENCY_HZ: u32 = 16_000_000;
    /// Prescaler of timer 1
    const PRESCALER: u32 = 8;

    pub fn init(
        tc1: arduino_hal::pac::TC1,
        pin: arduino_hal::port::Pin<impl arduino_hal::port::mode::Io, arduino_hal::hal::port::PB2>,
    ) -> Self {
        Self {
            tc1,
            _pin: pin.into_output(),
        }
    }
}

#[cfg(feature = "arduino-uno")]
impl ToneOutput for Timer1Tone {
    fn start(&mut self, frequency_hz: u16) {
        // The pin toggles twice per period
        let top = (Self::CPU_FREQUENCY_HZ / (2 * Self::PRESCALER * frequency_hz.max(1) as u32))
            .saturating_sub(1)
            .min(u16::MAX as u32) as u16;
        self.tc1.ocr1a.write(|w| w.bits(top));
        self.tc1.ocr1b.write(|w| w.bits(0));
        self.tc1.tcnt1.write(|w| w.bits(0));
        self.tc1
            .tccr1a
            .write(|w| w.com1b().match_toggle().wgm1().bits(0b00));
        self.tc1
            .tccr1b
            .write(|w| w.wgm1().bits(0b01).cs1().prescale_8());
    }

    fn stop(&mut self) {
        self.tc1.tccr1b.write(|w| w.cs1().no_clock());
        self.tc1.tccr1a.write(|w| w.com1b().disconnected());
    }
}
