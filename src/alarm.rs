//! Daily alarm: threshold set by the user and trigger state machine
use crate::clocks::Time;

/// Daily alarm threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmSetting {
    /// 0 to 23
    pub hour: u8,
    /// 0 to 59
    pub minute: u8,
    pub enabled: bool,
}

impl Default for AlarmSetting {
    fn default() -> Self {
        crate::DEFAULT_ALARM
    }
}

impl ufmt::uDisplay for AlarmSetting {
    /// Format the threshold, for instance 07:30
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        crate::clocks::datetime::write_two_digits(f, self.hour)?;
        f.write_str(":")?;
        crate::clocks::datetime::write_two_digits(f, self.minute)
    }
}

/// Trigger status of the alarm.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AlarmStatus {
    /// Waiting for the threshold
    #[default]
    Idle,
    /// Sounding and flashing, until dismissed
    Triggered,
}

/// What happened to the alarm during one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmEvent {
    Triggered,
    Dismissed,
}

impl AlarmStatus {
    pub fn is_triggered(&self) -> bool {
        matches!(self, AlarmStatus::Triggered)
    }

    /// Transition for one cycle, given the current time and whether the
    /// "set" button was pressed. The trigger check runs before the dismissal,
    /// so a press on the very cycle the alarm fires dismisses it. Once
    /// dismissed, the alarm fires again as soon as the minute still matches.
    pub fn next(self, setting: &AlarmSetting, now: &Time, dismiss: bool) -> Self {
        let status = match self {
            AlarmStatus::Idle
                if setting.enabled && now.same_minute(setting.hour, setting.minute) =>
            {
                AlarmStatus::Triggered
            }
            status => status,
        };
        match status {
            AlarmStatus::Triggered if dismiss => AlarmStatus::Idle,
            status => status,
        }
    }
}

/// Alarm state machine, owning the trigger status.
#[derive(Debug, Default)]
pub struct Alarm {
    status: AlarmStatus,
}

impl Alarm {
    pub fn status(&self) -> AlarmStatus {
        self.status
    }

    pub fn is_triggered(&self) -> bool {
        self.status.is_triggered()
    }

    /// Run one cycle, returning the transition if any. The actuators are to
    /// be driven from `is_triggered` afterwards.
    pub fn step(&mut self, setting: &AlarmSetting, now: &Time, dismiss: bool) -> Option<AlarmEvent> {
        let was_triggered = self.status.is_triggered();
        let armed = self.status.next(setting, now, false);
        self.status = armed.next(setting, now, dismiss);
        match (was_triggered, armed.is_triggered(), self.status.is_triggered()) {
            (false, true, true) => Some(AlarmEvent::Triggered),
            // Possibly fired and dismissed within the same cycle
            (_, true, false) => Some(AlarmEvent::Dismissed),
            _ => None,
        }
    }
}
