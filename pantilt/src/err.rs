use std::path::PathBuf;

use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Every failure the library can report. None of them are fatal: bus faults
/// are logged and absorbed by the driver, and an unopenable bus degrades to
/// simulation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("bus transfer on register 0x{register:02x} failed: {kind:?}")]
    Transport { register: u8, kind: ErrorKind },

    #[error("invalid channel {0}, expected 0-15")]
    InvalidChannel(u8),

    #[error("cannot open i2c bus {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: linux_embedded_hal::i2cdev::linux::LinuxI2CError,
    },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("malformed settings file")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Faults caused by what the caller asked for, as opposed to the
    /// hardware or the host. Transport details stay out of the message a
    /// caller sees for the latter.
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            Error::InvalidChannel(_) | Error::InvalidSettings(_) | Error::Config(_)
        )
    }
}
