#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod cmd;

#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

/// Number of PWM outputs on the controller chip.
pub const CHANNEL_COUNT: u8 = 16;

/// Widest travel any servo axis can be given, in degrees.
pub const DEGREE_MIN: i32 = 0;
pub const DEGREE_MAX: i32 = 180;

/// Mechanical center of both axes.
pub const CENTER_DEGREE: i32 = 90;

const_assert!(DEGREE_MIN < CENTER_DEGREE && CENTER_DEGREE < DEGREE_MAX);

/// Last commanded angle of each axis, in whole degrees.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub pan: i32,
    pub tilt: i32,
}

impl Position {
    pub fn new(pan: i32, tilt: i32) -> Self {
        Self { pan, tilt }
    }

    pub fn centered() -> Self {
        Self {
            pan: CENTER_DEGREE,
            tilt: CENTER_DEGREE,
        }
    }
}

/// Travel limits and output channel of one axis, as reported to callers.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisLimits {
    pub min: i32,
    pub max: i32,
    pub channel: u8,
}

/// Snapshot of the motion configuration: both axes plus the global step
/// size and the pause between interpolation steps.
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitsSnapshot {
    pub pan: AxisLimits,
    pub tilt: AxisLimits,
    pub step_size: i32,
    pub step_delay_ms: u32,
}
