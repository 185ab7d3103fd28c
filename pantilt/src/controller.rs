//! Pan/tilt mount on top of the PWM driver.
//!
//! Every angle a caller hands in is clamped to the axis travel before it is
//! turned into a pulse, so the recorded position is always reachable.
//! Motion is open loop: the controller reports what it commanded, never what
//! the servo did.
//!
//! Smooth moves block the caller for `steps * step_delay_ms` and cannot be
//! interrupted once started.

use log::{debug, info};
use pantilt_common::cmd::{Direction, MoveRequest, StepRequest};
use pantilt_common::{LimitsSnapshot, Position, CENTER_DEGREE};

use crate::axis::{Axis, AxisId};
use crate::bus;
use crate::config::Settings;
use crate::err::Result;
use crate::pwm::pca9685::Pca9685;

pub struct PanTiltController {
    pwm: Pca9685,
    pan: Axis,
    tilt: Axis,
    step: i32,
    step_delay_ms: u32,
}

impl PanTiltController {
    /// Opens the bus described by `settings` (falling back to simulation if
    /// it cannot be opened), initializes the chip and centers both axes.
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let bus = bus::open(&settings.endpoint);
        let pwm = Pca9685::new(bus, Box::new(linux_embedded_hal::Delay));
        Self::with_driver(settings, pwm)
    }

    /// Same as [`PanTiltController::new`] with a driver built by the caller.
    pub fn with_driver(settings: &Settings, pwm: Pca9685) -> Result<Self> {
        settings.validate()?;
        let mut ctl = Self {
            pwm,
            pan: Axis::new(AxisId::Pan, settings.pan),
            tilt: Axis::new(AxisId::Tilt, settings.tilt),
            step: settings.step,
            step_delay_ms: settings.step_delay_ms,
        };
        ctl.pwm.initialize();
        ctl.reset_position()?;
        Ok(ctl)
    }

    pub fn is_simulated(&self) -> bool {
        self.pwm.is_simulated()
    }

    pub fn set_pan(&mut self, degree: i32) -> Result<()> {
        self.set_axis(AxisId::Pan, degree)
    }

    pub fn set_tilt(&mut self, degree: i32) -> Result<()> {
        self.set_axis(AxisId::Tilt, degree)
    }

    /// Points the mount at fractional angles, rounded to whole degrees.
    pub fn look(&mut self, pan: f64, tilt: f64) -> Result<()> {
        self.set_pan(pan.round() as i32)?;
        self.set_tilt(tilt.round() as i32)
    }

    pub fn pan_left(&mut self, step: Option<i32>) -> Result<()> {
        let step = self.step_or_default(step);
        self.set_pan(self.pan.angle().saturating_sub(step))
    }

    pub fn pan_right(&mut self, step: Option<i32>) -> Result<()> {
        let step = self.step_or_default(step);
        self.set_pan(self.pan.angle().saturating_add(step))
    }

    pub fn tilt_up(&mut self, step: Option<i32>) -> Result<()> {
        let step = self.step_or_default(step);
        self.set_tilt(self.tilt.angle().saturating_add(step))
    }

    pub fn tilt_down(&mut self, step: Option<i32>) -> Result<()> {
        let step = self.step_or_default(step);
        self.set_tilt(self.tilt.angle().saturating_sub(step))
    }

    pub fn step(&mut self, direction: Direction, step: Option<i32>) -> Result<()> {
        match direction {
            Direction::Left => self.pan_left(step),
            Direction::Right => self.pan_right(step),
            Direction::Up => self.tilt_up(step),
            Direction::Down => self.tilt_down(step),
        }
    }

    pub fn reset_position(&mut self) -> Result<()> {
        self.set_pan(CENTER_DEGREE)?;
        self.set_tilt(CENTER_DEGREE)?;
        info!("Servos reset to center position");
        Ok(())
    }

    /// Moves to an absolute position. An axis given as `None` stays where
    /// it is.
    ///
    /// With `smooth`, both axes are interpolated in lockstep over as many
    /// steps as the larger of the two requested moves needs, pausing
    /// `step_delay_ms` after each step. Steps are counted against the
    /// requested angles; every intermediate angle still goes through the
    /// axis clamp, so a request past a limit holds at the limit for the
    /// remaining steps. The shorter move repeats angles instead of
    /// overshooting. The end position is the same as without `smooth`.
    pub fn move_to_position(
        &mut self,
        pan: Option<i32>,
        tilt: Option<i32>,
        smooth: bool,
    ) -> Result<()> {
        if !smooth {
            if let Some(p) = pan {
                self.set_pan(p)?;
            }
            if let Some(t) = tilt {
                self.set_tilt(t)?;
            }
            return Ok(());
        }

        let start = self.get_position();
        let max_steps = distance(start.pan, pan).max(distance(start.tilt, tilt));
        if max_steps == 0 {
            return Ok(());
        }
        debug!(
            "Smooth move {:?} -> ({:?}, {:?}) in {} steps",
            start, pan, tilt, max_steps
        );

        for step in 1..=max_steps {
            let progress = step as f64 / max_steps as f64;
            if let Some(p) = pan {
                self.set_pan(interpolate(start.pan, p, progress))?;
            }
            if let Some(t) = tilt {
                self.set_tilt(interpolate(start.tilt, t, progress))?;
            }
            self.pwm.delay_ms(self.step_delay_ms);
        }
        Ok(())
    }

    pub fn apply_move(&mut self, req: &MoveRequest) -> Result<()> {
        self.move_to_position(req.pan, req.tilt, req.smooth)
    }

    pub fn apply_step(&mut self, req: &StepRequest) -> Result<()> {
        self.step(req.direction, req.step)
    }

    pub fn get_position(&self) -> Position {
        Position::new(self.pan.angle(), self.tilt.angle())
    }

    pub fn limits(&self) -> LimitsSnapshot {
        LimitsSnapshot {
            pan: self.pan.limits(),
            tilt: self.tilt.limits(),
            step_size: self.step,
            step_delay_ms: self.step_delay_ms,
        }
    }

    /// Releases the bus.
    pub fn close(self) {
        drop(self.pwm);
        info!("Servo controller closed");
    }

    // A zero step means "use the configured step".
    fn step_or_default(&self, step: Option<i32>) -> i32 {
        step.filter(|s| *s != 0).unwrap_or(self.step)
    }

    fn set_axis(&mut self, id: AxisId, degree: i32) -> Result<()> {
        let axis = match id {
            AxisId::Pan => &mut self.pan,
            AxisId::Tilt => &mut self.tilt,
        };
        let target = axis.clamp(degree);
        let applied = self.pwm.set_degree(axis.channel(), target)?;
        axis.record(applied);
        Ok(())
    }
}

fn distance(from: i32, to: Option<i32>) -> u32 {
    to.map_or(0, |t| from.abs_diff(t))
}

fn interpolate(from: i32, to: i32, progress: f64) -> i32 {
    let (from, to) = (from as f64, to as f64);
    (from + (to - from) * progress).round() as i32
}
