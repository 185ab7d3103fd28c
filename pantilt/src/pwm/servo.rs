/// PWM counts per period on the controller chip (12 bit).
pub const PWM_RESOLUTION: f64 = 4096.0;

/// Hobby servo that maps 0-180 degrees linearly onto a pulse width.
pub struct Servo {
    min_pulse_ms: f64,
    max_pulse_ms: f64,
}

pub struct ServoPwmOut {
    pub on: u16,
    pub off: u16,
}

/// 1.0 ms at 0 degrees, 2.0 ms at 180 degrees.
pub const STANDARD_SERVO: Servo = Servo::new(1.0, 2.0);

impl Servo {
    /// Creates a new `Servo`.
    ///
    /// # Parameters
    /// - `min_pulse_ms`: pulse width for 0 degrees.
    /// - `max_pulse_ms`: pulse width for 180 degrees.
    pub const fn new(min_pulse_ms: f64, max_pulse_ms: f64) -> Self {
        Servo {
            min_pulse_ms,
            max_pulse_ms,
        }
    }

    /// Pulse width in milliseconds for `degree`, which must already be
    /// within 0-180.
    pub fn angle_to_pulse_ms(&self, degree: i32) -> f64 {
        let scaled_angle = degree as f64 / 180.0;
        self.min_pulse_ms + (self.max_pulse_ms - self.min_pulse_ms) * scaled_angle
    }
}

/// Converts a pulse width into on/off counts for a PWM running at
/// `frequency_hz`. The pulse always starts at count 0; the off count is
/// rounded and held inside the 12-bit range.
pub fn pulse_ms_to_counts(pulse_ms: f64, frequency_hz: f64) -> ServoPwmOut {
    let period_ms = 1000.0 / frequency_hz;
    let counts = (pulse_ms / period_ms * PWM_RESOLUTION).round();
    let off_count = counts.clamp(0.0, PWM_RESOLUTION - 1.0) as u16;

    ServoPwmOut {
        on: 0,
        off: off_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_servo_spans_one_to_two_ms() {
        assert_eq!(STANDARD_SERVO.angle_to_pulse_ms(0), 1.0);
        assert_eq!(STANDARD_SERVO.angle_to_pulse_ms(90), 1.5);
        assert_eq!(STANDARD_SERVO.angle_to_pulse_ms(180), 2.0);
    }

    #[test]
    fn counts_at_sixty_hz() {
        assert_eq!(pulse_ms_to_counts(1.0, 60.0).off, 246);
        assert_eq!(pulse_ms_to_counts(1.5, 60.0).off, 369);
        assert_eq!(pulse_ms_to_counts(2.0, 60.0).off, 492);
        assert_eq!(pulse_ms_to_counts(2.0, 60.0).on, 0);
    }

    #[test]
    fn counts_stay_in_twelve_bits() {
        assert_eq!(pulse_ms_to_counts(-1.0, 60.0).off, 0);
        assert_eq!(pulse_ms_to_counts(100.0, 60.0).off, 4095);
    }
}
