mod common;

use common::{failing_driver, recording_driver};
use pantilt::pwm::pca9685::reg;
use pantilt::{Error, PanTiltController, Settings};
use pantilt_common::Position;

const PAN_CHANNEL: u8 = 1;
const TILT_CHANNEL: u8 = 0;

#[test]
fn construction_programs_sixty_hz_and_centers() {
    let (pwm, recorder, _) = recording_driver();
    let ctl = PanTiltController::with_driver(&Settings::default(), pwm).unwrap();

    assert_eq!(ctl.get_position(), Position::centered());
    let writes = recorder.writes();
    assert_eq!(writes[0], (reg::MODE1, 0x00));
    assert!(writes.contains(&(reg::PRESCALE, 119)));
    // 1.5 ms at 60 Hz
    assert_eq!(recorder.off_count(PAN_CHANNEL), 369);
    assert_eq!(recorder.off_count(TILT_CHANNEL), 369);
}

#[test]
fn smooth_move_ends_exactly_on_target_whatever_the_delay() {
    for delay_ms in [0, 2, 50] {
        let mut settings = Settings::default();
        settings.step_delay_ms = delay_ms;
        let (pwm, recorder, pauses) = recording_driver();
        let mut ctl = PanTiltController::with_driver(&settings, pwm).unwrap();
        pauses.reset();

        ctl.move_to_position(Some(45), Some(120), true).unwrap();

        assert_eq!(ctl.get_position(), Position::new(45, 120));
        assert_eq!(pauses.get(), 45);
        // 1.25 ms and 1.6667 ms
        assert_eq!(recorder.off_count(PAN_CHANNEL), 307);
        assert_eq!(recorder.off_count(TILT_CHANNEL), 410);
    }
}

#[test]
fn smooth_move_writes_every_step_of_both_axes() {
    let (pwm, recorder, _) = recording_driver();
    let mut ctl = PanTiltController::with_driver(&Settings::default(), pwm).unwrap();
    recorder.clear();

    ctl.move_to_position(Some(80), Some(95), true).unwrap();

    // ten steps, four bytes per axis per step
    assert_eq!(recorder.count(), 10 * 2 * 4);
}

#[test]
fn zero_delta_smooth_move_is_silent() {
    let (pwm, recorder, pauses) = recording_driver();
    let mut ctl = PanTiltController::with_driver(&Settings::default(), pwm).unwrap();
    recorder.clear();
    pauses.reset();

    ctl.move_to_position(Some(90), Some(90), true).unwrap();

    assert_eq!(recorder.count(), 0);
    assert_eq!(pauses.get(), 0);
    assert_eq!(ctl.get_position(), Position::centered());
}

#[test]
fn direct_move_only_writes_named_axes() {
    let (pwm, recorder, pauses) = recording_driver();
    let mut ctl = PanTiltController::with_driver(&Settings::default(), pwm).unwrap();
    recorder.clear();
    pauses.reset();

    ctl.move_to_position(None, Some(15), false).unwrap();

    let writes = recorder.writes();
    assert_eq!(writes.len(), 4);
    assert!(writes.iter().all(|(r, _)| (0x06..0x0a).contains(r)));
    assert_eq!(pauses.get(), 0);
    assert_eq!(ctl.get_position(), Position::new(90, 15));
}

#[test]
fn out_of_range_request_never_reaches_the_chip() {
    let (pwm, recorder, _) = recording_driver();
    let mut ctl = PanTiltController::with_driver(&Settings::default(), pwm).unwrap();

    ctl.set_tilt(175).unwrap();

    assert_eq!(ctl.get_position().tilt, 145);
    // 145 degrees -> 1.8056 ms -> 444 counts, not the 175-degree pulse
    assert_eq!(recorder.off_count(TILT_CHANNEL), 444);
}

#[test]
fn invalid_channel_issues_no_writes() {
    let (mut pwm, recorder, _) = recording_driver();

    let err = pwm.set_pwm(16, 0, 300).unwrap_err();

    assert!(matches!(err, Error::InvalidChannel(16)));
    assert!(err.is_caller_fault());
    assert_eq!(recorder.count(), 0);
}

#[test]
fn unacknowledged_writes_still_record_the_clamped_angle() {
    let (pwm, recorder) = failing_driver();
    let mut ctl = PanTiltController::with_driver(&Settings::default(), pwm).unwrap();
    recorder.clear();

    ctl.set_pan(500).unwrap();

    assert_eq!(ctl.get_position().pan, 180);
    // all four bytes are attempted even though each one fails
    assert_eq!(recorder.count(), 4);
    assert_eq!(recorder.off_count(PAN_CHANNEL), 492);
}
