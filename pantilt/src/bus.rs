//! Single-byte register access to the PWM chip.
//!
//! Two transports exist: [`I2cBus`] talks to a real device through any
//! `embedded-hal` I2C implementation, [`SimulatedBus`] accepts every write and
//! reads back zero. Which one the driver gets is decided once, in [`open`].
//!
//! Writes are never read back. A write that the bus acknowledged is assumed to
//! have landed.

use embedded_hal::i2c::{Error as _, I2c};
use linux_embedded_hal::I2cdev;
use log::{debug, error, info, warn};

use crate::config::BusEndpoint;
use crate::err::{Error, Result};

/// Value every simulated read returns.
pub const SIMULATED_READ: u8 = 0x00;

pub trait RegisterBus {
    fn write(&mut self, register: u8, value: u8) -> Result<()>;
    fn read(&mut self, register: u8) -> Result<u8>;

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Hardware transport: one device at a fixed 7-bit address.
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cBus<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RegisterBus for I2cBus<I2C> {
    fn write(&mut self, register: u8, value: u8) -> Result<()> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|e| Error::Transport {
                register,
                kind: e.kind(),
            })
    }

    fn read(&mut self, register: u8) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|e| Error::Transport {
                register,
                kind: e.kind(),
            })?;
        Ok(buf[0])
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedBus;

impl RegisterBus for SimulatedBus {
    fn write(&mut self, register: u8, value: u8) -> Result<()> {
        debug!("SIMULATE: write 0x{:02x} to register 0x{:02x}", value, register);
        Ok(())
    }

    fn read(&mut self, register: u8) -> Result<u8> {
        debug!("SIMULATE: read register 0x{:02x}", register);
        Ok(SIMULATED_READ)
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

pub type BoxedBus = Box<dyn RegisterBus + Send>;

/// Opens the transport for `endpoint`. A bus that cannot be opened is
/// logged and replaced by the simulation, so this never fails.
pub fn open(endpoint: &BusEndpoint) -> BoxedBus {
    if endpoint.simulate {
        info!("PCA9685 running in simulation mode");
        return Box::new(SimulatedBus);
    }

    let path = endpoint.device_path();
    match I2cdev::new(&path) {
        Ok(dev) => {
            info!("PCA9685 on {}, address 0x{:02x}", path, endpoint.address);
            Box::new(I2cBus::new(dev, endpoint.address))
        }
        Err(source) => {
            let err = Error::Open {
                path: path.into(),
                source,
            };
            error!("{}", err);
            warn!("Falling back to simulation mode");
            Box::new(SimulatedBus)
        }
    }
}
