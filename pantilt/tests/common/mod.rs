#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::ErrorKind;
use pantilt::bus::RegisterBus;
use pantilt::pwm::pca9685::Pca9685;
use pantilt::{Error, Result};

/// Register file that remembers every write, in order.
#[derive(Clone, Default)]
pub struct Recorder {
    writes: Arc<Mutex<Vec<(u8, u8)>>>,
}

impl Recorder {
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.writes.lock().unwrap().clear();
    }

    /// Last value written to each register.
    pub fn registers(&self) -> HashMap<u8, u8> {
        self.writes().into_iter().collect()
    }

    /// Off count currently programmed for `channel`.
    pub fn off_count(&self, channel: u8) -> u16 {
        let regs = self.registers();
        let base = 0x06 + 4 * channel;
        let lo = regs.get(&(base + 2)).copied().unwrap_or(0) as u16;
        let hi = regs.get(&(base + 3)).copied().unwrap_or(0) as u16;
        hi << 8 | lo
    }
}

pub struct RecordingBus(pub Recorder);

impl RegisterBus for RecordingBus {
    fn write(&mut self, register: u8, value: u8) -> Result<()> {
        self.0.writes.lock().unwrap().push((register, value));
        Ok(())
    }

    fn read(&mut self, _register: u8) -> Result<u8> {
        Ok(0x00)
    }
}

/// Chip that never acknowledges. Attempts are still recorded.
pub struct FailingBus(pub Recorder);

impl RegisterBus for FailingBus {
    fn write(&mut self, register: u8, value: u8) -> Result<()> {
        self.0.writes.lock().unwrap().push((register, value));
        Err(Error::Transport {
            register,
            kind: ErrorKind::Bus,
        })
    }

    fn read(&mut self, register: u8) -> Result<u8> {
        Err(Error::Transport {
            register,
            kind: ErrorKind::Bus,
        })
    }
}

/// Counts pauses instead of sleeping.
#[derive(Clone, Default)]
pub struct PauseCounter(pub Arc<AtomicU32>);

impl PauseCounter {
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::SeqCst);
    }
}

impl DelayNs for PauseCounter {
    fn delay_ns(&mut self, _ns: u32) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn recording_driver() -> (Pca9685, Recorder, PauseCounter) {
    let recorder = Recorder::default();
    let pauses = PauseCounter::default();
    let pwm = Pca9685::new(
        Box::new(RecordingBus(recorder.clone())),
        Box::new(pauses.clone()),
    );
    (pwm, recorder, pauses)
}

pub fn failing_driver() -> (Pca9685, Recorder) {
    let recorder = Recorder::default();
    let pwm = Pca9685::new(
        Box::new(FailingBus(recorder.clone())),
        Box::new(PauseCounter::default()),
    );
    (pwm, recorder)
}
