//! Cancellable periodic countdown driver for the IQ engine.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// One tick of a countdown target. Returning false stops the driver.
pub trait Tick: Send + 'static {
    fn tick(&mut self) -> bool;
}

/// A single live countdown. Owns the driving task; dropping the handle
/// aborts it, so replacing a session's countdown can never leave a stale
/// timer firing against old state.
#[derive(Debug)]
pub struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawns a task that ticks `target` once per second. The task exits on
    /// its own when the target reports it is done or has been dropped.
    pub fn spawn<T: Tick>(target: Weak<Mutex<T>>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(target) = target.upgrade() else {
                    break;
                };
                if !target.lock().await.tick() {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
