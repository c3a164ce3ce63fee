//! Datetime structure and methods

/// Wall-clock reading, as sampled from the RTC once per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datetime {
    pub date: Date,
    pub time: Time,
}

/// Dev-friendly representation of the day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOfWeek {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl TryFrom<u8> for DayOfWeek {
    type Error = ();

    /// Convert an u8 to a DayOfWeek
    fn try_from(weekday: u8) -> Result<Self, Self::Error> {
        match weekday {
            1 => Ok(DayOfWeek::Monday),
            2 => Ok(DayOfWeek::Tuesday),
            3 => Ok(DayOfWeek::Wednesday),
            4 => Ok(DayOfWeek::Thursday),
            5 => Ok(DayOfWeek::Friday),
            6 => Ok(DayOfWeek::Saturday),
            7 => Ok(DayOfWeek::Sunday),
            _ => Err(()),
        }
    }
}

impl DayOfWeek {
    /// Three-letter label shown on the date line.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "MON",
            DayOfWeek::Tuesday => "TUE",
            DayOfWeek::Wednesday => "WED",
            DayOfWeek::Thursday => "THU",
            DayOfWeek::Friday => "FRI",
            DayOfWeek::Saturday => "SAT",
            DayOfWeek::Sunday => "SUN",
        }
    }
}

/// Cumulative number of days before the first of each month, common years.
const DAYS_BEFORE_MONTH: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Three-letter label of a month in 1..=12.
pub fn month_abbreviation(month: u8) -> &'static str {
    match month {
        1 => "JAN",
        2 => "FEB",
        3 => "MAR",
        4 => "APR",
        5 => "MAY",
        6 => "JUN",
        7 => "JUL",
        8 => "AUG",
        9 => "SEP",
        10 => "OCT",
        11 => "NOV",
        12 => "DEC",
        _ => "---",
    }
}

/// Date structure, years counted from 2000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    pub day: u8,
    pub month: u8,
    pub year: u8,
    pub weekday: DayOfWeek,
}

impl Date {
    /// Build a date, deriving the day of the week from the calendar.
    /// Returns None for a month or a day out of range.
    pub fn new(year: u8, month: u8, day: u8) -> Option<Self> {
        if year > 99 || !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month)
        {
            return None;
        }
        let mut date = Self {
            day,
            month,
            year,
            weekday: DayOfWeek::Saturday,
        };
        date.weekday = date.compute_weekday();
        Some(date)
    }

    /// Number of days since 2000-01-01.
    fn days_since_2000(&self) -> u16 {
        let year = self.year as u16;
        let mut days = 365 * year + (year + 3) / 4;
        days += DAYS_BEFORE_MONTH[(self.month.clamp(1, 12) - 1) as usize];
        if self.month > 2 && is_leap_year(self.year) {
            days += 1;
        }
        days + self.day as u16 - 1
    }

    /// Day of the week of this date. 2000-01-01 was a Saturday.
    pub fn compute_weekday(&self) -> DayOfWeek {
        let monday_based = ((self.days_since_2000() + 5) % 7) as u8;
        DayOfWeek::try_from(monday_based + 1).unwrap_or(DayOfWeek::Monday)
    }
}

fn is_leap_year(year: u8) -> bool {
    // 2000 is a leap year, 2100 is out of range
    year % 4 == 0
}

fn days_in_month(year: u8, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Time structure
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Time {
    /// True when both readings fall within the same minute of the day.
    pub fn same_minute(&self, hour: u8, minute: u8) -> bool {
        self.hour == hour && self.minute == minute
    }
}

impl Datetime {
    /// Same date and minute, hour replaced, seconds reset to zero.
    pub fn with_hour(&self, hour: u8) -> Self {
        Self {
            date: self.date,
            time: Time {
                hour,
                minute: self.time.minute,
                second: 0,
            },
        }
    }

    /// Parse a `YYYY-MM-DDTHH:MM:SS` stamp, as exported by the build script.
    /// Only years 2000 to 2099 are representable by the RTC.
    pub fn parse_build_stamp(stamp: &str) -> Option<Self> {
        let bytes = stamp.as_bytes();
        if bytes.len() != 19
            || bytes[4] != b'-'
            || bytes[7] != b'-'
            || bytes[10] != b'T'
            || bytes[13] != b':'
            || bytes[16] != b':'
        {
            return None;
        }
        let century = decode_ascii_number(&bytes[0..2])?;
        if century != 20 {
            return None;
        }
        let date = Date::new(
            decode_ascii_number(&bytes[2..4])?,
            decode_ascii_number(&bytes[5..7])?,
            decode_ascii_number(&bytes[8..10])?,
        )?;
        let time = Time {
            hour: decode_ascii_number(&bytes[11..13])?,
            minute: decode_ascii_number(&bytes[14..16])?,
            second: decode_ascii_number(&bytes[17..19])?,
        };
        if time.hour > 23 || time.minute > 59 || time.second > 59 {
            return None;
        }
        Some(Self { date, time })
    }
}

/// Decode a two-digit ascii decimal number.
fn decode_ascii_number(digits: &[u8]) -> Option<u8> {
    digits.iter().try_fold(0u8, |acc, &digit| match digit {
        b'0'..=b'9' => Some(acc * 10 + (digit - b'0')),
        _ => None,
    })
}

/// Write a number below 100 on two digits.
pub(crate) fn write_two_digits<W>(f: &mut ufmt::Formatter<'_, W>, value: u8) -> Result<(), W::Error>
where
    W: ufmt::uWrite + ?Sized,
{
    if value < 10 {
        f.write_str("0")?;
    }
    ufmt::uDisplay::fmt(&value, f)
}

impl ufmt::uDisplay for Date {
    /// Format a date to display on the serial port,
    /// for instance 2023-12-07
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        f.write_str("20")?;
        write_two_digits(f, self.year)?;
        f.write_str("-")?;
        write_two_digits(f, self.month)?;
        f.write_str("-")?;
        write_two_digits(f, self.day)
    }
}

impl ufmt::uDisplay for Time {
    /// Format a time to display on the serial port.
    /// for instance 21:34:05
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        write_two_digits(f, self.hour)?;
        f.write_str(":")?;
        write_two_digits(f, self.minute)?;
        f.write_str(":")?;
        write_two_digits(f, self.second)
    }
}

impl ufmt::uDisplay for Datetime {
    /// Format a datetime to display on the serial port.
    /// for instance 2023-12-07T21:34:05
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        ufmt::uDisplay::fmt(&self.date, f)?;
        f.write_str("T")?;
        ufmt::uDisplay::fmt(&self.time, f)
    }
}
