//! PCA9685 16-channel PWM controller.
//!
//! Only the subset a servo mount needs: frequency setup and per-channel
//! on/off counts. Bus faults are logged here and go no further; a failed
//! read is treated as 0x00 and a failed write is not retried.

use embedded_hal::delay::DelayNs;
use log::{debug, error, info};
use pantilt_common::{CHANNEL_COUNT, DEGREE_MAX, DEGREE_MIN};

use super::servo::{pulse_ms_to_counts, PWM_RESOLUTION, STANDARD_SERVO};
use crate::bus::BoxedBus;
use crate::err::{Error, Result};

pub mod reg {
    pub const MODE1: u8 = 0x00;
    pub const LED0_ON_L: u8 = 0x06;
    pub const PRESCALE: u8 = 0xFE;
}

pub mod mode1 {
    pub const RESTART: u8 = 0x80;
    pub const AUTO_INCREMENT: u8 = 0x20;
    pub const SLEEP: u8 = 0x10;
}

/// Internal oscillator.
pub const OSC_CLOCK_HZ: f64 = 25_000_000.0;

/// The chip runs faster than the prescaler formula predicts; requested
/// frequencies are scaled by this before computing the prescaler.
pub const FREQUENCY_CORRECTION: f64 = 0.8449;

/// Frequency set by `initialize`, and the period pulse widths are computed
/// against.
pub const SERVO_FREQUENCY_HZ: f64 = 60.0;

/// Oscillator settle time after mode changes.
pub const SETTLE_MS: u32 = 5;

pub type BoxedDelay = Box<dyn DelayNs + Send>;

pub struct Pca9685 {
    bus: BoxedBus,
    delay: BoxedDelay,
}

/// Prescaler for `frequency_hz`, after the oscillator correction.
pub fn prescale_for(frequency_hz: f64) -> u8 {
    let corrected = frequency_hz * FREQUENCY_CORRECTION;
    let prescale = (OSC_CLOCK_HZ / (PWM_RESOLUTION * corrected) - 1.0).round();
    // hardware floor is 3
    prescale.clamp(3.0, 255.0) as u8
}

impl Pca9685 {
    pub fn new(bus: BoxedBus, delay: BoxedDelay) -> Self {
        Self { bus, delay }
    }

    pub fn is_simulated(&self) -> bool {
        self.bus.is_simulated()
    }

    /// Clears MODE1, lets the chip settle, then sets the servo frequency.
    pub fn initialize(&mut self) {
        self.write_reg(reg::MODE1, 0x00);
        self.delay.delay_ms(SETTLE_MS);
        let prescale = self.set_frequency(SERVO_FREQUENCY_HZ);
        info!(
            "PCA9685 initialized at {} Hz (prescale {})",
            SERVO_FREQUENCY_HZ, prescale
        );
    }

    /// Programs the prescaler for `frequency_hz` and returns the value
    /// written. The prescaler only latches while the chip sleeps, so the
    /// order is sleep, prescale, restore, settle, restart with
    /// auto-increment.
    pub fn set_frequency(&mut self, frequency_hz: f64) -> u8 {
        let prescale = prescale_for(frequency_hz);

        let old_mode = self.read_reg(reg::MODE1).unwrap_or(0x00);
        let sleep_mode = (old_mode & !mode1::RESTART) | mode1::SLEEP;

        self.write_reg(reg::MODE1, sleep_mode);
        self.write_reg(reg::PRESCALE, prescale);
        self.write_reg(reg::MODE1, old_mode);
        self.delay.delay_ms(SETTLE_MS);
        self.write_reg(reg::MODE1, old_mode | mode1::RESTART | mode1::AUTO_INCREMENT);

        debug!("Frequency {} Hz -> prescale {}", frequency_hz, prescale);
        prescale
    }

    /// Writes the on and off counts of `channel`. Nothing touches the bus
    /// when the channel does not exist.
    pub fn set_pwm(&mut self, channel: u8, on: u16, off: u16) -> Result<()> {
        if channel >= CHANNEL_COUNT {
            error!("Invalid channel: {}", channel);
            return Err(Error::InvalidChannel(channel));
        }

        let base = reg::LED0_ON_L + 4 * channel;
        self.write_reg(base, (on & 0xFF) as u8);
        self.write_reg(base + 1, (on >> 8) as u8);
        self.write_reg(base + 2, (off & 0xFF) as u8);
        self.write_reg(base + 3, (off >> 8) as u8);
        Ok(())
    }

    pub fn set_pulse_ms(&mut self, channel: u8, pulse_ms: f64) -> Result<()> {
        let counts = pulse_ms_to_counts(pulse_ms, SERVO_FREQUENCY_HZ);
        self.set_pwm(channel, counts.on, counts.off)
    }

    /// Moves the servo on `channel` to `degree`, held to 0-180 whatever
    /// the axis limits above allow. Returns the degree actually commanded.
    pub fn set_degree(&mut self, channel: u8, degree: i32) -> Result<i32> {
        let degree = degree.clamp(DEGREE_MIN, DEGREE_MAX);
        self.set_pulse_ms(channel, STANDARD_SERVO.angle_to_pulse_ms(degree))?;
        debug!("Set servo {} to {}°", channel, degree);
        Ok(degree)
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn write_reg(&mut self, register: u8, value: u8) {
        if let Err(e) = self.bus.write(register, value) {
            error!("Failed to write register 0x{:02x}: {}", register, e);
        }
    }

    fn read_reg(&mut self, register: u8) -> Option<u8> {
        match self.bus.read(register) {
            Ok(v) => Some(v),
            Err(e) => {
                error!("Failed to read register 0x{:02x}: {}", register, e);
                None
            }
        }
    }
}
