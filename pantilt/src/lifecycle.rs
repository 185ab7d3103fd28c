use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};

use crate::config::Settings;
use crate::controller::PanTiltController;
use crate::err::Result;

/// Shared owner of the one controller a process drives.
///
/// Cloning the handle shares the controller. The controller is built on
/// first use and centered as part of being built. After [`shutdown`] the
/// next use builds a fresh one, so teardown is not terminal.
///
/// Every operation runs under one lock, including smooth moves, so callers
/// on different threads never interleave writes to the chip.
///
/// [`shutdown`]: ControllerHandle::shutdown
#[derive(Clone)]
pub struct ControllerHandle {
    settings: Arc<Settings>,
    controller: Arc<Mutex<Option<PanTiltController>>>,
}

impl ControllerHandle {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            controller: Arc::new(Mutex::new(None)),
        }
    }

    /// Runs `f` against the controller, constructing it first if needed.
    pub fn with<R>(&self, f: impl FnOnce(&mut PanTiltController) -> R) -> Result<R> {
        let mut slot = self.lock();
        let ctl = match slot.take() {
            Some(ctl) => ctl,
            None => {
                debug!("Constructing servo controller");
                PanTiltController::new(&self.settings)?
            }
        };
        Ok(f(slot.insert(ctl)))
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    /// Closes the controller and its bus, if one exists.
    pub fn shutdown(&self) {
        if let Some(ctl) = self.lock().take() {
            ctl.close();
        } else {
            info!("Servo controller already shut down");
        }
    }

    // A panic inside `with` leaves the controller state as it was after the
    // last completed write, which is still within range.
    fn lock(&self) -> MutexGuard<'_, Option<PanTiltController>> {
        self.controller
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
