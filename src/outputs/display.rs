//! Compose and draw the clock face on the 128x64 monochrome display.
use crate::{
    alarm::{AlarmSetting, AlarmStatus},
    clocks::{datetime::month_abbreviation, Datetime},
    inputs::map_knob,
    ui::UiMode,
    HOUR_MAX,
};
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_6X10, FONT_9X15_BOLD},
        MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use heapless::String;
use profont::PROFONT_18_POINT;
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, Ssd1306};

/// Something able to show a view of the state.
pub trait Renderer {
    type Error;

    fn draw(&mut self, view: &View) -> Result<(), Self::Error>;
}

/// Everything the screen depends on, sampled at the end of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    pub now: Datetime,
    pub alarm: AlarmSetting,
    pub status: AlarmStatus,
    pub mode: UiMode,
    /// Knob position, only sampled in the edit modes
    pub knob: Option<u16>,
}

const ALARM_BANNER: &str = "ALARM ACTIVE!";

/// Text content of the screen, independent of the pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Weekday, day and month, e.g. "THU 7 DEC"
    pub date: String<16>,
    /// "AL HH:MM", when the alarm is enabled
    pub alarm_indicator: Option<String<8>>,
    /// "HH:MM", the colon blinking with the seconds
    pub clock: String<5>,
    pub alarm_banner: bool,
    /// Bottom line of the edit modes
    pub edit_banner: Option<String<20>>,
}

impl Frame {
    pub fn compose(view: &View) -> Self {
        let mut date: String<16> = String::new();
        ufmt::uwrite!(
            date,
            "{} {} {}",
            view.now.date.weekday.abbreviation(),
            view.now.date.day,
            month_abbreviation(view.now.date.month)
        )
        .ok();

        let alarm_indicator = view.alarm.enabled.then(|| {
            let mut s: String<8> = String::new();
            ufmt::uwrite!(s, "AL {}", view.alarm).ok();
            s
        });

        let mut clock: String<5> = String::new();
        push_two_digits(&mut clock, view.now.time.hour);
        clock
            .push(if view.now.time.second % 2 == 0 { ':' } else { ' ' })
            .ok();
        push_two_digits(&mut clock, view.now.time.minute);

        let edit_banner = match view.mode {
            UiMode::Clock => None,
            UiMode::SetTime => {
                let mut s: String<20> = String::new();
                let hour = map_knob(view.knob.unwrap_or(0), HOUR_MAX);
                ufmt::uwrite!(s, "Set Time: {}", hour).ok();
                Some(s)
            }
            UiMode::SetAlarm => {
                let mut s: String<20> = String::new();
                ufmt::uwrite!(s, "Set Alarm: {}:{}", view.alarm.hour, view.alarm.minute).ok();
                Some(s)
            }
        };

        Self {
            date,
            alarm_indicator,
            clock,
            alarm_banner: view.status.is_triggered(),
            edit_banner,
        }
    }

    /// Draw the frame on a cleared target. The banners are drawn last, on
    /// top of the date and the clock.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let small_inverted = MonoTextStyle::new(&FONT_6X10, BinaryColor::Off);
        let top_left = TextStyleBuilder::new().baseline(Baseline::Top).build();
        let top_right = TextStyleBuilder::new()
            .alignment(Alignment::Right)
            .baseline(Baseline::Top)
            .build();
        let top_center = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Top)
            .build();

        Text::with_text_style(&self.date, Point::new(5, 5), small, top_left).draw(target)?;
        if let Some(indicator) = &self.alarm_indicator {
            Text::with_text_style(indicator, Point::new(127, 5), small, top_right).draw(target)?;
        }

        Text::with_text_style(
            &self.clock,
            Point::new(64, 25),
            MonoTextStyle::new(&PROFONT_18_POINT, BinaryColor::On),
            top_center,
        )
        .draw(target)?;

        if self.alarm_banner {
            Rectangle::new(Point::new(0, 20), Size::new(128, 24))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(target)?;
            Text::with_text_style(
                ALARM_BANNER,
                Point::new(64, 25),
                MonoTextStyle::new(&FONT_9X15_BOLD, BinaryColor::Off),
                top_center,
            )
            .draw(target)?;
        }

        if let Some(banner) = &self.edit_banner {
            Rectangle::new(Point::new(0, 50), Size::new(128, 14))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(target)?;
            Text::with_text_style(banner, Point::new(5, 52), small_inverted, top_left)
                .draw(target)?;
        }
        Ok(())
    }
}

fn push_two_digits<const N: usize>(s: &mut String<N>, value: u8) {
    s.push((b'0' + value / 10 % 10) as char).ok();
    s.push((b'0' + value % 10) as char).ok();
}

impl<DI, SIZE> Renderer for Ssd1306<DI, SIZE, BufferedGraphicsMode<SIZE>>
where
    DI: WriteOnlyDataCommand,
    SIZE: DisplaySize,
{
    type Error = <Self as DrawTarget>::Error;

    /// Redraw the whole buffer, then send it.
    fn draw(&mut self, view: &View) -> Result<(), Self::Error> {
        self.clear();
        Frame::compose(view).draw(self)?;
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    fn view(stamp: &str) -> View {
        View {
            now: Datetime::parse_build_stamp(stamp).unwrap(),
            alarm: AlarmSetting {
                hour: 7,
                minute: 5,
                enabled: true,
            },
            status: AlarmStatus::default(),
            mode: UiMode::Clock,
            knob: None,
        }
    }

    #[test]
    fn clock_face() {
        let frame = Frame::compose(&view("2023-12-07T09:04:10"));
        assert_eq!(frame.date.as_str(), "THU 7 DEC");
        assert_eq!(frame.alarm_indicator.as_deref(), Some("AL 07:05"));
        assert_eq!(frame.clock.as_str(), "09:04");
        assert!(!frame.alarm_banner);
        assert_eq!(frame.edit_banner, None);
    }

    #[test]
    fn colon_blinks_with_the_seconds() {
        assert_eq!(
            Frame::compose(&view("2024-02-29T23:59:59")).clock.as_str(),
            "23 59"
        );
        assert_eq!(
            Frame::compose(&view("2024-02-29T23:59:58")).clock.as_str(),
            "23:59"
        );
    }

    #[test]
    fn disabled_alarm_has_no_indicator() {
        let mut v = view("2024-01-01T00:00:00");
        v.alarm.enabled = false;
        let frame = Frame::compose(&v);
        assert_eq!(frame.alarm_indicator, None);
        assert_eq!(frame.date.as_str(), "MON 1 JAN");
    }

    #[test]
    fn banners() {
        let mut v = view("2023-12-07T09:04:10");
        v.status = AlarmStatus::Triggered;
        v.mode = UiMode::SetTime;
        v.knob = Some(1023);
        let frame = Frame::compose(&v);
        assert!(frame.alarm_banner);
        assert_eq!(frame.edit_banner.as_deref(), Some("Set Time: 23"));
        // The base rendering is still there
        assert_eq!(frame.clock.as_str(), "09:04");

        v.mode = UiMode::SetAlarm;
        let frame = Frame::compose(&v);
        assert_eq!(frame.edit_banner.as_deref(), Some("Set Alarm: 7:5"));
    }

    fn mock_display() -> MockDisplay<BinaryColor> {
        let mut display = MockDisplay::new();
        display.set_allow_out_of_bounds_drawing(true);
        display.set_allow_overdraw(true);
        display
    }

    #[test]
    fn draw_plain_face() {
        let mut display = mock_display();
        Frame::compose(&view("2023-12-07T09:04:10"))
            .draw(&mut display)
            .unwrap();
        // Left edge of the banner areas stays blank
        assert_eq!(display.get_pixel(Point::new(0, 20)), None);
        assert_eq!(display.get_pixel(Point::new(0, 63)), None);
    }

    #[test]
    fn draw_banners() {
        let mut v = view("2023-12-07T09:04:10");
        v.status = AlarmStatus::Triggered;
        v.mode = UiMode::SetAlarm;
        let mut display = mock_display();
        Frame::compose(&v).draw(&mut display).unwrap();
        assert_eq!(display.get_pixel(Point::new(0, 20)), Some(BinaryColor::On));
        assert_eq!(display.get_pixel(Point::new(0, 43)), Some(BinaryColor::On));
        assert_eq!(display.get_pixel(Point::new(0, 63)), Some(BinaryColor::On));
    }
}
