//! Periodic pass over both clocks while either of them runs.

use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::debug;

use crate::{services::sse_events, state::SharedState};

/// Owned scheduler task. Dropping the handle aborts the task.
pub struct TickerHandle {
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    fn spawn(state: SharedState) -> Self {
        Self {
            task: Some(tokio::spawn(run(state))),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Release the task without aborting it; used by the task to retire itself.
    fn detach(mut self) {
        self.task.take();
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Start the scheduler when a clock runs and stop it when none does.
///
/// Call after every command that may have changed the running state.
pub async fn sync(state: &SharedState) {
    let mut slot = state.ticker().lock().await;
    let running = state.is_running().await;

    match slot.as_ref() {
        Some(handle) if running && !handle.is_finished() => {}
        _ if running => {
            *slot = Some(TickerHandle::spawn(state.clone()));
            debug!("tick scheduler started");
        }
        Some(_) => {
            slot.take();
            debug!("tick scheduler stopped");
        }
        None => {}
    }
}

async fn run(state: SharedState) {
    let mut interval = time::interval(state.config().tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let report = state.tick().await;
        sse_events::broadcast_scoreboard(&state, &report.display);

        if report.running {
            continue;
        }

        // Retire under the slot lock so a concurrent `sync` either sees the
        // clocks running here or finds the slot empty afterwards.
        let mut slot = state.ticker().lock().await;
        if state.is_running().await {
            continue;
        }
        if let Some(handle) = slot.take() {
            handle.detach();
        }
        debug!("no clock running; tick scheduler idle");
        break;
    }
}
