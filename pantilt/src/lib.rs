//! Pan/tilt servo mount driven through a PCA9685 PWM controller on I2C.

/// modules
pub mod axis;
pub mod bus;
pub mod config;
pub mod controller;
pub mod err;
pub mod lifecycle;
pub mod pwm;

pub use config::Settings;
pub use controller::PanTiltController;
pub use err::{Error, Result};
pub use lifecycle::ControllerHandle;
