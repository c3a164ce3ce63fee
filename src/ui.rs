//! User interface modes and editing of the time and the alarm
use crate::{
    alarm::AlarmSetting,
    clocks::Datetime,
    inputs::{map_knob, Button, InputEdges},
    HOUR_MAX, MINUTE_MAX,
};

/// Mode of the user interface, cycled with the "mode" button.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Plain clock, nothing is edited
    #[default]
    Clock,
    /// The knob selects the hour, "set" commits it to the RTC
    SetTime,
    /// The knob selects a value, "up" commits the alarm hour, "down" the minute
    SetAlarm,
}

impl UiMode {
    /// Next mode in the cycle Clock -> SetTime -> SetAlarm -> Clock.
    pub fn next(self) -> Self {
        match self {
            UiMode::Clock => UiMode::SetTime,
            UiMode::SetTime => UiMode::SetAlarm,
            UiMode::SetAlarm => UiMode::Clock,
        }
    }

    /// Edit mode is derived: any mode but the plain clock.
    pub fn is_edit(self) -> bool {
        self != UiMode::Clock
    }
}

impl ufmt::uDisplay for UiMode {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        f.write_str(match self {
            UiMode::Clock => "Clock",
            UiMode::SetTime => "SetTime",
            UiMode::SetAlarm => "SetAlarm",
        })
    }
}

/// Field of the alarm committed during a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmEdit {
    Hour(u8),
    Minute(u8),
}

/// Outcome of one cycle of the user interface
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UiStep {
    /// New mode, if the "mode" button was pressed
    pub mode: Option<UiMode>,
    /// Time to write to the clock
    pub adjust_time: Option<Datetime>,
    /// Alarm field which was changed
    pub alarm_edit: Option<AlarmEdit>,
}

/// User interface state machine.
#[derive(Debug, Default)]
pub struct Ui {
    mode: UiMode,
    /// Knob value sampled during the last cycle, only in edit mode
    knob: Option<u16>,
}

impl Ui {
    pub fn mode(&self) -> UiMode {
        self.mode
    }

    pub fn is_edit_mode(&self) -> bool {
        self.mode.is_edit()
    }

    /// Knob value of the current cycle, None outside of the edit modes.
    pub fn knob(&self) -> Option<u16> {
        self.knob
    }

    /// Run one cycle on the polled inputs. The knob is only sampled in
    /// edit mode. At most one time adjustment is requested, and at most one
    /// alarm field changed, the hour taking precedence over the minute.
    pub fn step<I: InputEdges>(
        &mut self,
        inputs: &mut I,
        now: &Datetime,
        alarm: &mut AlarmSetting,
    ) -> UiStep {
        let mut step = UiStep::default();

        if inputs.fell(Button::Mode) {
            self.mode = self.mode.next();
            step.mode = Some(self.mode);
        }

        if !self.mode.is_edit() {
            self.knob = None;
            return step;
        }

        let knob = inputs.analog_read();
        self.knob = Some(knob);

        match self.mode {
            UiMode::SetTime => {
                if inputs.fell(Button::Set) {
                    step.adjust_time = Some(now.with_hour(map_knob(knob, HOUR_MAX)));
                }
            }
            UiMode::SetAlarm => {
                if inputs.fell(Button::Up) {
                    alarm.hour = map_knob(knob, HOUR_MAX);
                    step.alarm_edit = Some(AlarmEdit::Hour(alarm.hour));
                } else if inputs.fell(Button::Down) {
                    alarm.minute = map_knob(knob, MINUTE_MAX);
                    step.alarm_edit = Some(AlarmEdit::Minute(alarm.minute));
                }
            }
            UiMode::Clock => {}
        }
        step
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clocks::Time;

    /// Inputs replaying a scripted set of edges and a fixed knob.
    #[derive(Default)]
    pub(crate) struct FakeInputs {
        pub pressed: std::vec::Vec<Button>,
        pub knob: u16,
        pub knob_reads: usize,
    }

    impl FakeInputs {
        pub(crate) fn press(&mut self, buttons: &[Button]) {
            self.pressed = buttons.to_vec();
        }
    }

    impl InputEdges for FakeInputs {
        fn poll(&mut self) {}

        fn fell(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }

        fn analog_read(&mut self) -> u16 {
            self.knob_reads += 1;
            self.knob
        }
    }

    fn now() -> Datetime {
        Datetime::parse_build_stamp("2024-03-01T09:05:42").unwrap()
    }

    #[test]
    fn mode_cycles_with_period_three() {
        let mut ui = Ui::default();
        let mut inputs = FakeInputs::default();
        let mut alarm = AlarmSetting::default();
        assert_eq!(ui.mode(), UiMode::Clock);

        inputs.press(&[Button::Mode]);
        let expected = [UiMode::SetTime, UiMode::SetAlarm, UiMode::Clock];
        for _ in 0..3 {
            for mode in expected {
                let step = ui.step(&mut inputs, &now(), &mut alarm);
                assert_eq!(step.mode, Some(mode));
                assert_eq!(ui.mode(), mode);
                assert_eq!(ui.is_edit_mode(), mode != UiMode::Clock);
            }
        }
    }

    #[test]
    fn no_mode_change_without_press() {
        let mut ui = Ui::default();
        let mut inputs = FakeInputs::default();
        let mut alarm = AlarmSetting::default();
        inputs.press(&[Button::Set, Button::Up, Button::Down]);

        let step = ui.step(&mut inputs, &now(), &mut alarm);
        assert_eq!(step, UiStep::default());
        assert_eq!(ui.mode(), UiMode::Clock);
        assert_eq!(alarm, AlarmSetting::default());
        // The knob is not sampled outside of the edit modes
        assert_eq!(inputs.knob_reads, 0);
        assert_eq!(ui.knob(), None);
    }

    #[test]
    fn set_time_replaces_the_hour() {
        let mut ui = Ui::default();
        let mut inputs = FakeInputs {
            knob: 1023,
            ..Default::default()
        };
        let mut alarm = AlarmSetting::default();
        inputs.press(&[Button::Mode]);
        ui.step(&mut inputs, &now(), &mut alarm);

        inputs.press(&[Button::Set]);
        let step = ui.step(&mut inputs, &now(), &mut alarm);
        let adjusted = step.adjust_time.unwrap();
        assert_eq!(adjusted.date, now().date);
        assert_eq!(
            adjusted.time,
            Time {
                hour: 23,
                minute: 5,
                second: 0
            }
        );
        assert_eq!(ui.knob(), Some(1023));
        assert_eq!(alarm, AlarmSetting::default());
    }

    #[test]
    fn up_and_down_are_ignored_in_set_time() {
        let mut ui = Ui::default();
        let mut inputs = FakeInputs::default();
        let mut alarm = AlarmSetting::default();
        inputs.press(&[Button::Mode]);
        ui.step(&mut inputs, &now(), &mut alarm);

        inputs.press(&[Button::Up, Button::Down]);
        assert_eq!(ui.step(&mut inputs, &now(), &mut alarm), UiStep::default());
        assert_eq!(alarm, AlarmSetting::default());
    }

    #[test]
    fn set_alarm_commits_each_field() {
        let mut ui = Ui::default();
        let mut inputs = FakeInputs {
            knob: 512,
            ..Default::default()
        };
        let mut alarm = AlarmSetting::default();
        inputs.press(&[Button::Mode]);
        ui.step(&mut inputs, &now(), &mut alarm);
        ui.step(&mut inputs, &now(), &mut alarm);
        assert_eq!(ui.mode(), UiMode::SetAlarm);

        inputs.press(&[Button::Up]);
        let step = ui.step(&mut inputs, &now(), &mut alarm);
        assert_eq!(step.alarm_edit, Some(AlarmEdit::Hour(11)));
        assert_eq!(alarm.hour, 11);
        assert_eq!(alarm.minute, 0);

        inputs.knob = 1023;
        inputs.press(&[Button::Down]);
        let step = ui.step(&mut inputs, &now(), &mut alarm);
        assert_eq!(step.alarm_edit, Some(AlarmEdit::Minute(59)));
        assert_eq!(alarm.hour, 11);
        assert_eq!(alarm.minute, 59);
        assert!(alarm.enabled);
    }

    #[test]
    fn one_alarm_field_per_cycle() {
        let mut ui = Ui::default();
        let mut inputs = FakeInputs {
            knob: 0,
            ..Default::default()
        };
        let mut alarm = AlarmSetting {
            hour: 7,
            minute: 30,
            enabled: true,
        };
        inputs.press(&[Button::Mode]);
        ui.step(&mut inputs, &now(), &mut alarm);
        ui.step(&mut inputs, &now(), &mut alarm);

        inputs.press(&[Button::Up, Button::Down, Button::Set]);
        let step = ui.step(&mut inputs, &now(), &mut alarm);
        assert_eq!(step.alarm_edit, Some(AlarmEdit::Hour(0)));
        assert_eq!(step.adjust_time, None);
        assert_eq!(alarm.minute, 30);
    }

    #[test]
    fn mode_press_applies_before_editing() {
        // The edge that enters SetTime does not commit anything by itself,
        // but a "set" press in the same cycle does.
        let mut ui = Ui::default();
        let mut inputs = FakeInputs::default();
        let mut alarm = AlarmSetting::default();
        inputs.press(&[Button::Mode, Button::Set]);

        let step = ui.step(&mut inputs, &now(), &mut alarm);
        assert_eq!(step.mode, Some(UiMode::SetTime));
        assert_eq!(step.adjust_time.map(|dt| dt.time.hour), Some(0));
    }

    #[test]
    fn leaving_edit_mode_forgets_the_knob() {
        let mut ui = Ui::default();
        let mut inputs = FakeInputs::default();
        let mut alarm = AlarmSetting::default();
        inputs.press(&[Button::Mode]);
        ui.step(&mut inputs, &now(), &mut alarm);
        assert_eq!(ui.knob(), Some(0));
        ui.step(&mut inputs, &now(), &mut alarm);
        ui.step(&mut inputs, &now(), &mut alarm);
        assert_eq!(ui.mode(), UiMode::Clock);
        assert_eq!(ui.knob(), None);
    }
}
