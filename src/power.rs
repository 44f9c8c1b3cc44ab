use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use tracing::{debug, error};

use crate::components::GhostStatus;

#[derive(Debug, Default)]
struct PowerState {
    status: GhostStatus,
    /// Bumped on every activation. A countdown only expires the activation
    /// it was started for.
    epoch: u64,
    deadline: Option<Instant>,
    expirations: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerSnapshot {
    pub status: GhostStatus,
    pub remaining: Duration,
}

/// Owns the shared ghost status and the single countdown that turns it back
/// to normal.
///
/// Reads take the read lock; activation (tick thread) and expiry (timer
/// thread) take the write lock.
pub struct PowerEffect {
    shared: Arc<RwLock<PowerState>>,
    duration: Duration,
    cancel: Option<Sender<()>>,
}

impl PowerEffect {
    pub fn new(duration: Duration) -> Self {
        Self {
            shared: Arc::new(RwLock::new(PowerState::default())),
            duration,
            cancel: None,
        }
    }

    pub fn status(&self) -> GhostStatus {
        read(&self.shared).status
    }

    pub fn is_active(&self) -> bool {
        self.status() == GhostStatus::Vulnerable
    }

    /// Time left before ghosts turn back, zero when inactive.
    pub fn remaining(&self) -> Duration {
        self.snapshot().remaining
    }

    /// Status and time left, read under one lock so the two always agree.
    pub fn snapshot(&self) -> PowerSnapshot {
        let state = read(&self.shared);
        PowerSnapshot {
            status: state.status,
            remaining: state.deadline.map_or(Duration::ZERO, |deadline| {
                deadline.saturating_duration_since(Instant::now())
            }),
        }
    }

    /// Number of Vulnerable→Normal transitions so far.
    pub fn expirations(&self) -> u64 {
        read(&self.shared).expirations
    }

    /// Makes ghosts vulnerable for the full duration. A countdown that is
    /// already running is cancelled first, so a second pill extends the
    /// effect instead of stacking timers.
    pub fn activate(&mut self) {
        // Dropping the sender wakes the old countdown with `Disconnected`.
        self.cancel = None;

        let epoch = {
            let mut state = write(&self.shared);
            state.epoch += 1;
            state.status = GhostStatus::Vulnerable;
            state.deadline = Instant::now().checked_add(self.duration);
            state.epoch
        };
        debug!(epoch, duration_ms = self.duration.as_millis() as u64, "power effect on");

        let (cancel_tx, cancel_rx) = bounded::<()>(1);
        let shared = Arc::clone(&self.shared);
        let duration = self.duration;
        let spawned = thread::Builder::new()
            .name("pacman-power".to_string())
            .spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = cancel_rx.recv_timeout(duration) {
                    expire(&shared, epoch);
                }
            });

        match spawned {
            Ok(_) => self.cancel = Some(cancel_tx),
            Err(e) => {
                error!("failed to start power countdown: {e}");
                expire(&self.shared, epoch);
            }
        }
    }
}

fn expire(shared: &RwLock<PowerState>, epoch: u64) {
    let mut state = write(shared);
    // A restart may have slipped in between the timeout and this lock.
    if state.epoch != epoch || state.status != GhostStatus::Vulnerable {
        return;
    }
    state.status = GhostStatus::Normal;
    state.deadline = None;
    state.expirations += 1;
    debug!(epoch, "power effect off");
}

fn read(shared: &RwLock<PowerState>) -> RwLockReadGuard<'_, PowerState> {
    shared.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(shared: &RwLock<PowerState>) -> RwLockWriteGuard<'_, PowerState> {
    shared.write().unwrap_or_else(PoisonError::into_inner)
}
