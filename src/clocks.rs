//! Clocks, date and time management
use self::rtc::Rtc;
pub use datetime::{month_abbreviation, Date, Datetime, DayOfWeek, Time};
use embedded_hal::blocking::i2c;

pub mod datetime;
pub mod rtc;
#[cfg(feature = "arduino-uno")]
pub mod timer;

/// Source of wall-clock time, read once per cycle by the main loop.
pub trait ClockSource {
    type Error;

    /// Current date and time.
    fn read(&mut self) -> Result<Datetime, Self::Error>;

    /// Set the hardware clock.
    fn adjust(&mut self, datetime: &Datetime) -> Result<(), Self::Error>;
}

/// Datetime of the build, used to seed a clock which lost track of time.
pub fn build_datetime() -> Option<Datetime> {
    option_env!("BUILD_DATETIME").and_then(Datetime::parse_build_stamp)
}

/// Battery-backed clock, on top of the DS3231.
pub struct Clock<I2C>
where
    I2C: i2c::Write + i2c::WriteRead,
{
    /// Some when the RTC had stopped and was set at start-up
    pub seeded: Option<Datetime>,
    /// Interface with the RTC
    rtc: Rtc<I2C>,
}

impl<I2C, CommE> Clock<I2C>
where
    I2C: i2c::Write<Error = CommE> + i2c::WriteRead<Error = CommE>,
{
    /// Bring up the RTC. Fails when the chip does not answer on the bus.
    /// If its oscillator stopped (power loss), it is set to `fallback` once.
    pub fn init(i2c: I2C, fallback: Option<Datetime>) -> Result<Self, rtc::Error<CommE>> {
        let mut rtc = Rtc::init(i2c);
        let mut seeded = None;
        if rtc.has_lost_power()? {
            if let Some(datetime) = fallback {
                rtc.set_datetime(&datetime)?;
                rtc.clear_lost_power()?;
                seeded = Some(datetime);
            }
        }
        Ok(Self { seeded, rtc })
    }
}

impl<I2C, CommE> ClockSource for Clock<I2C>
where
    I2C: i2c::Write<Error = CommE> + i2c::WriteRead<Error = CommE>,
{
    type Error = rtc::Error<CommE>;

    fn read(&mut self) -> Result<Datetime, Self::Error> {
        self.rtc.datetime()
    }

    fn adjust(&mut self, datetime: &Datetime) -> Result<(), Self::Error> {
        self.rtc.set_datetime(datetime)
    }
}
