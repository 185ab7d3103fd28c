use std::{env, fs, path::Path};

use log::{debug, info};
use pantilt_common::{AxisLimits, CENTER_DEGREE, CHANNEL_COUNT, DEGREE_MAX, DEGREE_MIN};
use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

use crate::err::{Error, Result};

pub const DEFAULT_I2C_BUS: u8 = 1; // Raspberry Pi header bus
pub const DEFAULT_I2C_ADDR: u8 = 0x40;

pub const DEFAULT_TILT_CHANNEL: u8 = 0;
pub const DEFAULT_TILT_MIN: i32 = 15;
pub const DEFAULT_TILT_MAX: i32 = 145;

pub const DEFAULT_PAN_CHANNEL: u8 = 1;
pub const DEFAULT_PAN_MIN: i32 = 0;
pub const DEFAULT_PAN_MAX: i32 = 180;

pub const DEFAULT_STEP: i32 = 1;
pub const DEFAULT_STEP_DELAY_MS: u32 = 2;

/// Overrides `endpoint.simulate` when set to "true" or "false".
pub const SIMULATE_ENV: &str = "SIMULATE_SERVO";

const_assert!(DEFAULT_TILT_CHANNEL < CHANNEL_COUNT && DEFAULT_PAN_CHANNEL < CHANNEL_COUNT);
const_assert!(DEFAULT_TILT_CHANNEL != DEFAULT_PAN_CHANNEL);
const_assert!(DEFAULT_TILT_MIN <= CENTER_DEGREE && CENTER_DEGREE <= DEFAULT_TILT_MAX);
const_assert!(DEFAULT_PAN_MIN <= CENTER_DEGREE && CENTER_DEGREE <= DEFAULT_PAN_MAX);
const_assert!(DEFAULT_PAN_MIN >= DEGREE_MIN && DEFAULT_PAN_MAX <= DEGREE_MAX);

/// Where the PWM chip lives. Fixed once the transport is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusEndpoint {
    pub bus: u8,
    pub address: u8,
    pub simulate: bool,
}

impl Default for BusEndpoint {
    fn default() -> Self {
        Self {
            bus: DEFAULT_I2C_BUS,
            address: DEFAULT_I2C_ADDR,
            simulate: true,
        }
    }
}

impl BusEndpoint {
    pub fn device_path(&self) -> String {
        format!("/dev/i2c-{}", self.bus)
    }
}

/// One axis: its output channel and its allowed travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub channel: u8,
    pub min: i32,
    pub max: i32,
}

impl AxisConfig {
    pub fn pan() -> Self {
        Self {
            channel: DEFAULT_PAN_CHANNEL,
            min: DEFAULT_PAN_MIN,
            max: DEFAULT_PAN_MAX,
        }
    }

    pub fn tilt() -> Self {
        Self {
            channel: DEFAULT_TILT_CHANNEL,
            min: DEFAULT_TILT_MIN,
            max: DEFAULT_TILT_MAX,
        }
    }

    pub fn clamp(&self, degree: i32) -> i32 {
        degree.clamp(self.min, self.max)
    }

    pub fn limits(&self) -> AxisLimits {
        AxisLimits {
            min: self.min,
            max: self.max,
            channel: self.channel,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.channel >= CHANNEL_COUNT {
            return Err(Error::InvalidSettings(format!(
                "{name}.channel {} is not in 0-15",
                self.channel
            )));
        }
        if self.min > self.max {
            return Err(Error::InvalidSettings(format!(
                "{name}.min {} is above {name}.max {}",
                self.min, self.max
            )));
        }
        if self.min < DEGREE_MIN || self.max > DEGREE_MAX {
            return Err(Error::InvalidSettings(format!(
                "{name} range {}..={} leaves 0..=180",
                self.min, self.max
            )));
        }
        if !(self.min..=self.max).contains(&CENTER_DEGREE) {
            return Err(Error::InvalidSettings(format!(
                "{name} range {}..={} does not contain the center {CENTER_DEGREE}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Everything the controller needs at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoint: BusEndpoint,
    pub pan: AxisConfig,
    pub tilt: AxisConfig,
    /// Default increment for relative moves, in degrees.
    pub step: i32,
    /// Pause after each interpolation step of a smooth move.
    pub step_delay_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: BusEndpoint::default(),
            pan: AxisConfig::pan(),
            tilt: AxisConfig::tilt(),
            step: DEFAULT_STEP,
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
        }
    }
}

impl Settings {
    /// Reads settings from `path` if given, otherwise starts from the
    /// defaults. `SIMULATE_SERVO` is applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(p) => {
                info!("Loading settings from {}", p.display());
                Self::from_json_str(&fs::read_to_string(p)?)?
            }
            None => Self::default(),
        };

        if let Some(simulate) = env::var(SIMULATE_ENV).ok().and_then(|v| parse_flag(&v)) {
            debug!("{SIMULATE_ENV} overrides simulate={simulate}");
            settings.endpoint.simulate = simulate;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.pan.validate("pan")?;
        self.tilt.validate("tilt")?;
        if self.pan.channel == self.tilt.channel {
            return Err(Error::InvalidSettings(format!(
                "pan and tilt both use channel {}",
                self.pan.channel
            )));
        }
        if self.step < 1 {
            return Err(Error::InvalidSettings(format!(
                "step {} must be at least 1",
                self.step
            )));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
