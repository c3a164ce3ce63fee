//! Per-cycle orchestration of the clock, the inputs, both state machines
//! and the outputs.
use crate::{
    alarm::{Alarm, AlarmEvent, AlarmSetting},
    clocks::{ClockSource, Datetime},
    inputs::{Button, InputEdges},
    outputs::{Actuators, Renderer, View},
    ui::Ui,
    HEARTBEAT_ON_MS, HEARTBEAT_PERIOD_MS,
};

/// The main state of the whole program, updated at every loop,
/// holding the memory.
#[derive(Debug)]
pub struct MainState {
    /// Last successful reading of the clock
    pub now: Datetime,
    pub alarm_setting: AlarmSetting,
    pub ui: Ui,
    pub alarm: Alarm,
}

impl MainState {
    /// Fresh state: clock mode, default alarm, nothing triggered.
    pub fn new(now: Datetime) -> Self {
        Self {
            now,
            alarm_setting: AlarmSetting::default(),
            ui: Ui::default(),
            alarm: Alarm::default(),
        }
    }

    /// Snapshot given to the renderer.
    pub fn view(&self) -> View {
        View {
            now: self.now,
            alarm: self.alarm_setting,
            status: self.alarm.status(),
            mode: self.ui.mode(),
            knob: self.ui.knob(),
        }
    }

    /// Run all the tasks of one cycle, in order: read the clock, sample the
    /// inputs, step the UI then the alarm, drive the actuators and redraw.
    /// Peripheral errors are logged and the cycle goes on.
    pub fn run<C, I, A, R, W>(
        &mut self,
        clock: &mut C,
        inputs: &mut I,
        actuators: &mut A,
        renderer: &mut R,
        log: &mut W,
        millis: u32,
    ) where
        C: ClockSource,
        I: InputEdges,
        A: Actuators,
        R: Renderer,
        W: ufmt::uWrite + ?Sized,
    {
        match clock.read() {
            Ok(now) => self.now = now,
            Err(_) => {
                ufmt::uwriteln!(&mut *log, "RTC read failed").ok();
            }
        }
        inputs.poll();

        self.process_ui(clock, inputs, log);
        self.process_alarm(inputs, log);

        let triggered = self.alarm.is_triggered();
        actuators.set_tone_active(triggered);
        actuators.set_alarm_light(triggered);
        actuators.set_status_light(millis % HEARTBEAT_PERIOD_MS < HEARTBEAT_ON_MS);

        if renderer.draw(&self.view()).is_err() {
            ufmt::uwriteln!(&mut *log, "Display failed").ok();
        }
    }

    /// Mode changes and edits of the time or the alarm
    fn process_ui<C, I, W>(&mut self, clock: &mut C, inputs: &mut I, log: &mut W)
    where
        C: ClockSource,
        I: InputEdges,
        W: ufmt::uWrite + ?Sized,
    {
        let step = self.ui.step(inputs, &self.now, &mut self.alarm_setting);

        if let Some(mode) = step.mode {
            ufmt::uwriteln!(&mut *log, "Mode {}", mode).ok();
        }
        if let Some(datetime) = step.adjust_time {
            match clock.adjust(&datetime) {
                // The alarm and the frame of this cycle keep the reading
                // sampled above, the new time comes with the next read
                Ok(()) => {
                    ufmt::uwriteln!(&mut *log, "Time set {}", datetime).ok();
                }
                Err(_) => {
                    ufmt::uwriteln!(&mut *log, "RTC write failed").ok();
                }
            }
        }
        if step.alarm_edit.is_some() {
            ufmt::uwriteln!(&mut *log, "Alarm set {}", self.alarm_setting).ok();
        }
    }

    /// Trigger and dismissal of the alarm. The "set" press seen by the UI
    /// during this cycle is also the dismissal.
    fn process_alarm<I, W>(&mut self, inputs: &I, log: &mut W)
    where
        I: InputEdges,
        W: ufmt::uWrite + ?Sized,
    {
        let dismiss = inputs.fell(Button::Set);
        match self
            .alarm
            .step(&self.alarm_setting, &self.now.time, dismiss)
        {
            Some(AlarmEvent::Triggered) => {
                ufmt::uwriteln!(&mut *log, "Alarm triggered {}", self.alarm_setting).ok();
            }
            Some(AlarmEvent::Dismissed) => {
                ufmt::uwriteln!(&mut *log, "Alarm dismissed").ok();
            }
            None => {}
        }
    }
}
