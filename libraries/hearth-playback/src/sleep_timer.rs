//! Sleep timer
//!
//! Counts down once per second on a tokio task and calls its callback when
//! the time is up. Tick and cancel take the same lock, so at expiry exactly
//! one of them wins: either the callback fires once or it never fires.
//! Subscribers see the timer go idle only after the callback returned.

use hearth_core::{HearthError, Result};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

const TICK: Duration = Duration::from_secs(1);

/// Countdown of an active timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepTimerState {
    /// Time left before the timer fires
    pub remaining: Duration,

    /// Length the timer was started with
    pub total: Duration,
}

#[derive(Debug, Default)]
struct TimerSlot {
    /// Bumped by every start and cancel; a task only acts for its own generation
    generation: u64,
    task: Option<JoinHandle<()>>,
}

/// Cancellable countdown
#[derive(Debug)]
pub struct SleepTimer {
    slot: Arc<Mutex<TimerSlot>>,
    state: Arc<watch::Sender<Option<SleepTimerState>>>,
    max_minutes: u32,
}

impl SleepTimer {
    /// Create an idle timer accepting up to `max_minutes`
    pub fn new(max_minutes: u32) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            slot: Arc::new(Mutex::new(TimerSlot::default())),
            state: Arc::new(state),
            max_minutes,
        }
    }

    /// Start a timer of `minutes`
    ///
    /// # Errors
    /// [`HearthError::Validation`] when `minutes` is 0 or above the maximum
    pub fn start<F>(&self, minutes: u32, on_elapsed: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if minutes == 0 || minutes > self.max_minutes {
            return Err(HearthError::validation(format!(
                "Sleep timer must be between 1 and {} minutes, got {}",
                self.max_minutes, minutes
            )));
        }

        self.start_for(Duration::from_secs(u64::from(minutes) * 60), on_elapsed);
        Ok(())
    }

    /// Start a timer of `duration`, replacing any active one
    ///
    /// Counts whole seconds, at least one tick. Must be called from within a
    /// Tokio runtime.
    pub fn start_for<F>(&self, duration: Duration, on_elapsed: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let ticks = duration.as_secs().max(1);
        let total = Duration::from_secs(ticks);

        let mut slot = lock(&self.slot);
        if let Some(previous) = slot.task.take() {
            debug!("Replacing active sleep timer");
            previous.abort();
        }
        slot.generation += 1;

        let generation = slot.generation;
        let task_slot = Arc::clone(&self.slot);
        let state = Arc::clone(&self.state);

        self.state.send_replace(Some(SleepTimerState {
            remaining: total,
            total,
        }));

        slot.task = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK, TICK);
            let mut remaining = ticks;

            loop {
                interval.tick().await;

                let mut slot = lock(&task_slot);
                if slot.generation != generation {
                    return;
                }

                remaining -= 1;
                if remaining > 0 {
                    state.send_replace(Some(SleepTimerState {
                        remaining: Duration::from_secs(remaining),
                        total,
                    }));
                    continue;
                }

                // Final tick won; later cancels find nothing to stop
                slot.generation += 1;
                slot.task = None;
                let finished = slot.generation;
                drop(slot);

                info!("Sleep timer elapsed after {:?}", total);
                on_elapsed();

                // A timer started meanwhile owns the state now
                let slot = lock(&task_slot);
                if slot.generation == finished {
                    state.send_replace(None);
                }
                return;
            }
        }));

        info!("Sleep timer started for {:?}", total);
    }

    /// Stop the timer without firing
    ///
    /// Returns `true` if a timer was active.
    pub fn cancel(&self) -> bool {
        let mut slot = lock(&self.slot);
        let Some(task) = slot.task.take() else {
            return false;
        };

        slot.generation += 1;
        task.abort();
        self.state.send_replace(None);

        info!("Sleep timer cancelled");
        true
    }

    /// Whether a countdown is running
    pub fn is_active(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Time left, `None` when idle
    pub fn remaining(&self) -> Option<Duration> {
        self.state.borrow().map(|s| s.remaining)
    }

    /// Current countdown state
    pub fn state(&self) -> Option<SleepTimerState> {
        *self.state.borrow()
    }

    /// Subscribe to countdown changes
    pub fn subscribe(&self) -> watch::Receiver<Option<SleepTimerState>> {
        self.state.subscribe()
    }
}

impl Drop for SleepTimer {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.slot).task.take() {
            task.abort();
        }
    }
}

fn lock(slot: &Mutex<TimerSlot>) -> std::sync::MutexGuard<'_, TimerSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
