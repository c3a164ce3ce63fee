//! DS3231 RTC Interface
// https://www.analog.com/media/en/technical-documentation/data-sheets/ds3231.pdf

use super::{Date, Datetime, Time};
use embedded_hal::blocking::i2c;

/// Variants of enums
#[derive(Debug)]
pub enum Error<CommE> {
    /// I²C bus error
    Comm(CommE),
    /// Invalid input data provided
    InvalidInputData,
}

/// Hours in either 12-hour (AM/PM) or 24-hour format
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hours {
    /// AM [1-12]
    AM(u8),
    /// PM [1-12]
    PM(u8),
    /// 24H format [0-23]
    H24(u8),
}

struct Register;

impl Register {
    const SECONDS: u8 = 0x00;
    const MINUTES: u8 = 0x01;
    const HOURS: u8 = 0x02;
    const DOM: u8 = 0x04;
    const MONTH: u8 = 0x05;
    const YEAR: u8 = 0x06;
    const STATUS: u8 = 0x0F;
}

struct BitFlags;

impl BitFlags {
    const H24_H12: u8 = 0b0100_0000;
    const AM_PM: u8 = 0b0010_0000;
    const CENTURY: u8 = 0b1000_0000;
    /// Oscillator stop flag: set when the oscillator stopped,
    /// typically after the loss of both main and backup power.
    const OSF: u8 = 0b1000_0000;
}

pub const DEVICE_ADDRESS: u8 = 0b110_1000;

#[derive(Debug, Default)]
pub struct Rtc<I2C>
where
    I2C: i2c::Write + i2c::WriteRead,
{
    i2c: I2C,
}

impl<I2C, CommE> Rtc<I2C>
where
    I2C: i2c::Write<Error = CommE> + i2c::WriteRead<Error = CommE>,
{
    /// Create a new instance of the DS3231 device.
    pub fn init(i2c: I2C) -> Self {
        Rtc { i2c }
    }

    /// Read the current date and time. The day of the week register
    /// is ignored, the weekday is derived from the date.
    pub fn datetime(&mut self) -> Result<Datetime, Error<CommE>> {
        let mut data = [0; 8];
        data[0] = Register::SECONDS;
        self.read_data(&mut data)?;

        let year = packed_bcd_to_decimal(data[Register::YEAR as usize + 1]);
        let month = packed_bcd_to_decimal(data[Register::MONTH as usize + 1] & !BitFlags::CENTURY);
        let day = packed_bcd_to_decimal(data[Register::DOM as usize + 1]);
        let hour = hours_from_register(data[Register::HOURS as usize + 1]);
        let minute = packed_bcd_to_decimal(data[Register::MINUTES as usize + 1]);
        let second = packed_bcd_to_decimal(data[Register::SECONDS as usize + 1]);

        let date = Date::new(year, month, day).ok_or(Error::InvalidInputData)?;
        let time = Time {
            hour: get_h24(hour),
            minute,
            second,
        };
        if time.hour > 23 || time.minute > 59 || time.second > 59 {
            return Err(Error::InvalidInputData);
        }
        Ok(Datetime { date, time })
    }

    /// Set the date and time, always in 24-hour format.
    pub fn set_datetime(&mut self, datetime: &Datetime) -> Result<(), Error<CommE>> {
        if datetime.time.minute > 59 || datetime.time.second > 59 {
            return Err(Error::InvalidInputData);
        }
        let (month, year) = month_year_to_registers(datetime.date.month, datetime.date.year);
        let payload = [
            Register::SECONDS,
            decimal_to_packed_bcd(datetime.time.second),
            decimal_to_packed_bcd(datetime.time.minute),
            hours_to_register(datetime.time.hour)?,
            datetime.date.weekday as u8,
            decimal_to_packed_bcd(datetime.date.day),
            month,
            year,
        ];
        self.write_data(&payload)
    }

    /// True when the oscillator stopped since the flag was last cleared:
    /// the time kept by the chip is not meaningful.
    pub fn has_lost_power(&mut self) -> Result<bool, Error<CommE>> {
        Ok(self.status()? & BitFlags::OSF != 0)
    }

    /// Clear the oscillator stop flag, leaving the other status bits untouched.
    pub fn clear_lost_power(&mut self) -> Result<(), Error<CommE>> {
        let status = self.status()?;
        self.write_data(&[Register::STATUS, status & !BitFlags::OSF])
    }

    fn status(&mut self) -> Result<u8, Error<CommE>> {
        let mut data = [Register::STATUS, 0];
        self.read_data(&mut data)?;
        Ok(data[1])
    }

    /// Write to the RTC via the I2C interface.
    fn write_data(&mut self, payload: &[u8]) -> Result<(), Error<CommE>> {
        self.i2c.write(DEVICE_ADDRESS, payload).map_err(Error::Comm)
    }

    /// Read the RTC via the I2C interface: the first byte of the payload
    /// is the register to start from, the rest is filled with the answer.
    fn read_data(&mut self, payload: &mut [u8]) -> Result<(), Error<CommE>> {
        let (register, answer) = payload.split_at_mut(1);
        self.i2c
            .write_read(DEVICE_ADDRESS, register, answer)
            .map_err(Error::Comm)
    }
}

/// Transform a decimal number to packed BCD format
fn decimal_to_packed_bcd(dec: u8) -> u8 {
    ((dec / 10) << 4) | (dec % 10)
}

/// Transform a number in packed BCD format to decimal
fn packed_bcd_to_decimal(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0xF)
}

/// Hours are always written in 24-hour format
fn hours_to_register<CommE>(hour: u8) -> Result<u8, Error<CommE>> {
    if hour > 23 {
        Err(Error::InvalidInputData)
    } else {
        Ok(decimal_to_packed_bcd(hour))
    }
}

fn hours_from_register(data: u8) -> Hours {
    if is_24h_format(data) {
        Hours::H24(packed_bcd_to_decimal(data & !BitFlags::H24_H12))
    } else if is_am(data) {
        Hours::AM(packed_bcd_to_decimal(
            data & !(BitFlags::H24_H12 | BitFlags::AM_PM),
        ))
    } else {
        Hours::PM(packed_bcd_to_decimal(
            data & !(BitFlags::H24_H12 | BitFlags::AM_PM),
        ))
    }
}

fn month_year_to_registers(month: u8, year: u8) -> (u8, u8) {
    (decimal_to_packed_bcd(month), decimal_to_packed_bcd(year))
}

fn is_24h_format(hours_data: u8) -> bool {
    hours_data & BitFlags::H24_H12 == 0
}

fn is_am(hours_data: u8) -> bool {
    hours_data & BitFlags::AM_PM == 0
}

/// 12 AM is midnight, 12 PM is noon.
fn get_h24(hour: Hours) -> u8 {
    match hour {
        Hours::H24(h) => h,
        Hours::AM(12) => 0,
        Hours::AM(h) => h,
        Hours::PM(12) => 12,
        Hours::PM(h) => h + 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clocks::DayOfWeek;
    use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use std::vec;

    #[test]
    fn read_datetime() {
        let expectations = [I2cTransaction::write_read(
            DEVICE_ADDRESS,
            vec![Register::SECONDS],
            vec![0x42, 0x30, 0x07, 0x05, 0x01, 0x03, 0x24],
        )];
        let mut mock = I2cMock::new(&expectations);
        let mut rtc = Rtc::init(mock.clone());

        let datetime = rtc.datetime().unwrap();
        assert_eq!(datetime.date.year, 24);
        assert_eq!(datetime.date.month, 3);
        assert_eq!(datetime.date.day, 1);
        assert_eq!(datetime.date.weekday, DayOfWeek::Friday);
        assert_eq!(
            datetime.time,
            Time {
                hour: 7,
                minute: 30,
                second: 42
            }
        );
        mock.done();
    }

    #[test]
    fn read_datetime_in_12h_format() {
        // 12:15 AM and 03:15 PM
        let expectations = [
            I2cTransaction::write_read(
                DEVICE_ADDRESS,
                vec![Register::SECONDS],
                vec![0x00, 0x15, 0x52, 0x01, 0x01, 0x01, 0x00],
            ),
            I2cTransaction::write_read(
                DEVICE_ADDRESS,
                vec![Register::SECONDS],
                vec![0x00, 0x15, 0x63, 0x01, 0x01, 0x01, 0x00],
            ),
        ];
        let mut mock = I2cMock::new(&expectations);
        let mut rtc = Rtc::init(mock.clone());

        assert_eq!(rtc.datetime().unwrap().time.hour, 0);
        assert_eq!(rtc.datetime().unwrap().time.hour, 15);
        mock.done();
    }

    #[test]
    fn read_invalid_date() {
        let expectations = [I2cTransaction::write_read(
            DEVICE_ADDRESS,
            vec![Register::SECONDS],
            vec![0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00],
        )];
        let mut mock = I2cMock::new(&expectations);
        let mut rtc = Rtc::init(mock.clone());

        assert!(matches!(rtc.datetime(), Err(Error::InvalidInputData)));
        mock.done();
    }

    #[test]
    fn write_datetime() {
        let datetime = Datetime {
            date: Date::new(24, 3, 1).unwrap(),
            time: Time {
                hour: 23,
                minute: 59,
                second: 8,
            },
        };
        let expectations = [I2cTransaction::write(
            DEVICE_ADDRESS,
            vec![Register::SECONDS, 0x08, 0x59, 0x23, 0x05, 0x01, 0x03, 0x24],
        )];
        let mut mock = I2cMock::new(&expectations);
        let mut rtc = Rtc::init(mock.clone());

        rtc.set_datetime(&datetime).unwrap();
        mock.done();
    }

    #[test]
    fn write_rejects_invalid_hour() {
        let datetime = Datetime {
            date: Date::new(24, 3, 1).unwrap(),
            time: Time {
                hour: 24,
                minute: 0,
                second: 0,
            },
        };
        let mut mock = I2cMock::new(&[]);
        let mut rtc = Rtc::init(mock.clone());

        assert!(matches!(
            rtc.set_datetime(&datetime),
            Err(Error::InvalidInputData)
        ));
        mock.done();
    }

    #[test]
    fn lost_power_flag() {
        let expectations = [
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![Register::STATUS], vec![0x88]),
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![Register::STATUS], vec![0x88]),
            I2cTransaction::write(DEVICE_ADDRESS, vec![Register::STATUS, 0x08]),
        ];
        let mut mock = I2cMock::new(&expectations);
        let mut rtc = Rtc::init(mock.clone());

        assert!(rtc.has_lost_power().unwrap());
        rtc.clear_lost_power().unwrap();
        mock.done();
    }
}
