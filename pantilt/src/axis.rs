use core::fmt::Display;

use pantilt_common::{AxisLimits, CENTER_DEGREE};

use crate::config::AxisConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisId {
    Pan,
    Tilt,
}

impl Display for AxisId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AxisId::Pan => write!(f, "pan"),
            AxisId::Tilt => write!(f, "tilt"),
        }
    }
}

/// One servo axis: fixed channel and travel, plus the last angle commanded
/// to it. The angle never leaves `config.min..=config.max`.
#[derive(Debug, Clone)]
pub struct Axis {
    id: AxisId,
    config: AxisConfig,
    angle: i32,
}

impl Axis {
    pub fn new(id: AxisId, config: AxisConfig) -> Self {
        Self {
            id,
            config,
            angle: config.clamp(CENTER_DEGREE),
        }
    }

    pub fn id(&self) -> AxisId {
        self.id
    }

    pub fn channel(&self) -> u8 {
        self.config.channel
    }

    pub fn angle(&self) -> i32 {
        self.angle
    }

    pub fn limits(&self) -> AxisLimits {
        self.config.limits()
    }

    pub fn clamp(&self, degree: i32) -> i32 {
        self.config.clamp(degree)
    }

    /// Stores an angle the driver just commanded. Anything outside the
    /// travel is clamped first so the invariant holds even if the driver
    /// reported back something unexpected.
    pub(crate) fn record(&mut self, degree: i32) {
        self.angle = self.config.clamp(degree);
    }
}
