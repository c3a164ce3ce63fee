//! Inputs of the user: four buttons and a knob
use crate::KNOB_MAX;
use embedded_hal::digital::v2::InputPin;

/// Logical buttons of the front panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Cycle through the modes
    Mode,
    /// Commit the time, dismiss the alarm
    Set,
    /// Commit the alarm hour
    Up,
    /// Commit the alarm minute
    Down,
}

/// Per-cycle snapshot of the user inputs.
pub trait InputEdges {
    /// Sample the inputs, must be called once per cycle before any query.
    fn poll(&mut self);

    /// True if the button went from released to pressed during the last poll.
    fn fell(&self, button: Button) -> bool;

    /// Raw position of the knob, 0 to 1023.
    fn analog_read(&mut self) -> u16;
}

/// Raw analog channel.
pub trait AnalogSource {
    fn read(&mut self) -> u16;
}

/// Linear mapping of a raw knob value to `0..=max`, truncating.
/// A knob at `KNOB_MAX` maps exactly to `max`.
pub fn map_knob(value: u16, max: u8) -> u8 {
    let value = value.min(KNOB_MAX) as u32;
    (value * max as u32 / KNOB_MAX as u32) as u8
}

/// The four pins of the front panel buttons
pub struct ButtonPins<P> {
    pub mode: P,
    pub set: P,
    pub up: P,
    pub down: P,
}

/// Front panel: buttons and knob.
pub struct Inputs<P: InputPin, K: AnalogSource> {
    pub mode: ButtonInput<P>,
    pub set: ButtonInput<P>,
    pub up: ButtonInput<P>,
    pub down: ButtonInput<P>,
    /// Potentiometer
    knob: K,
}

impl<P: InputPin, K: AnalogSource> Inputs<P, K> {
    /// Initialize all the inputs, in particular with the pinout
    /// and the electrical to logical mapping.
    pub fn init(pins: ButtonPins<P>, button_logical_level_high: bool, knob: K) -> Self {
        Self {
            mode: ButtonInput::init(pins.mode, button_logical_level_high),
            set: ButtonInput::init(pins.set, button_logical_level_high),
            up: ButtonInput::init(pins.up, button_logical_level_high),
            down: ButtonInput::init(pins.down, button_logical_level_high),
            knob,
        }
    }
}

impl<P: InputPin, K: AnalogSource> InputEdges for Inputs<P, K> {
    /// Update the values of the inputs by reading the electric state of the pins.
    fn poll(&mut self) {
        self.mode.update();
        self.set.update();
        self.up.update();
        self.down.update();
    }

    fn fell(&self, button: Button) -> bool {
        match button {
            Button::Mode => self.mode.fell,
            Button::Set => self.set.fell,
            Button::Up => self.up.fell,
            Button::Down => self.down.fell,
        }
    }

    fn analog_read(&mut self) -> u16 {
        self.knob.read().min(KNOB_MAX)
    }
}

/// Push button, sampled once per cycle.
pub struct ButtonInput<P: InputPin> {
    /// Pin to read the state from.
    pin: P,
    /// Mapping between the electric level of the pin (+3.3V or +5V)
    /// and the logical level of the input.
    logical_level_high: bool,
    /// True while the button is held down.
    pub pressed: bool,
    /// True if the button was pressed between the two last samples.
    pub fell: bool,
}

impl<P: InputPin> ButtonInput<P> {
    /// Initialize the structure. A button already held at start-up
    /// does not count as a press.
    pub fn init(pin: P, logical_level_high: bool) -> Self {
        let mut out = Self {
            pin,
            logical_level_high,
            pressed: false,
            fell: false,
        };
        out.pressed = out.read();
        out
    }

    /// Update the value by reading the electric state of the pin.
    pub fn update(&mut self) {
        let pressed = self.read();
        self.fell = pressed && !self.pressed;
        self.pressed = pressed;
    }

    /// A pin which cannot be read counts as released.
    fn read(&self) -> bool {
        self.pin
            .is_high()
            .map(|high| high == self.logical_level_high)
            .unwrap_or(false)
    }
}
