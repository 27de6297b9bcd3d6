// Refresh coordination
// One refresh cycle at a time; requests that hit a 401 meanwhile wait in FIFO order

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

/// Why a refresh cycle ended without a new access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Refresh token missing or refused by the backend
    Expired(String),

    /// Credentials could not be read or written locally
    Storage(String),

    /// Owning task went away, or the coordinator was reset
    Abandoned,
}

/// Outcome handed to every waiter: the new access token or the refresh error
type Outcome = Result<String, Rejection>;

#[derive(Default)]
struct RefreshState {
    /// Refresh-in-progress flag
    in_progress: bool,

    /// Continuations queued during the current cycle
    queue: VecDeque<oneshot::Sender<Outcome>>,

    /// Number of cycles started since creation or the last reset
    cycles: u64,

    /// Identifies the running cycle; never reset
    epoch: u64,
}

/// Shared refresh state of one request pipeline
///
/// The lock is only taken inside synchronous sections, never across an
/// `.await`, so checking the flag and enqueueing happen atomically.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

/// Result of [`RefreshCoordinator::begin`]
pub enum Ticket<'a> {
    /// No cycle was running; the caller now owns it and must refresh
    Lead(RefreshCycle<'a>),

    /// A cycle is already running; wait for its outcome
    Wait(Waiter),
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh cycle, or join the one in progress
    pub fn begin(&self) -> Ticket<'_> {
        let mut state = self.lock();

        if state.in_progress {
            let (tx, rx) = oneshot::channel();
            state.queue.push_back(tx);
            tracing::debug!(
                pending = state.queue.len(),
                "Refresh in progress, request queued"
            );
            return Ticket::Wait(Waiter { rx });
        }

        state.in_progress = true;
        state.cycles += 1;
        state.epoch += 1;
        tracing::debug!(cycle = state.cycles, "Starting refresh cycle");

        Ticket::Lead(RefreshCycle {
            coordinator: self,
            epoch: state.epoch,
            settled: false,
        })
    }

    /// Whether a refresh cycle is currently running
    pub fn is_refreshing(&self) -> bool {
        self.lock().in_progress
    }

    /// Number of requests waiting on the current cycle
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    /// Number of cycles started so far
    pub fn cycles(&self) -> u64 {
        self.lock().cycles
    }

    /// Return to the initial state
    /// Queued waiters are dropped and observe a rejection.
    pub fn reset(&self) {
        let mut state = self.lock();
        let epoch = state.epoch + 1;
        *state = RefreshState {
            epoch,
            ..RefreshState::default()
        };
    }

    /// Clear the flag and settle every queued waiter, in enqueue order
    fn settle(&self, epoch: u64, outcome: Outcome) {
        let queue = {
            let mut state = self.lock();
            if state.epoch != epoch || !state.in_progress {
                // Cycle was discarded by a reset
                return;
            }
            state.in_progress = false;
            std::mem::take(&mut state.queue)
        };

        tracing::debug!(
            waiters = queue.len(),
            success = outcome.is_ok(),
            "Flushing refresh queue"
        );

        for tx in queue {
            // Receiver gone means the caller stopped waiting
            let _ = tx.send(outcome.clone());
        }
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ownership of the running refresh cycle
///
/// Dropping it without calling `resolve` or `reject` rejects all waiters, so
/// the flag can never stay set after the owning task goes away.
pub struct RefreshCycle<'a> {
    coordinator: &'a RefreshCoordinator,
    epoch: u64,
    settled: bool,
}

impl RefreshCycle<'_> {
    /// Refresh succeeded: wake every waiter with the new access token
    pub fn resolve(mut self, access_token: &str) {
        self.settled = true;
        self.coordinator
            .settle(self.epoch, Ok(access_token.to_string()));
    }

    /// Refresh failed: reject every waiter with the same rejection
    pub fn reject(mut self, rejection: Rejection) {
        self.settled = true;
        self.coordinator.settle(self.epoch, Err(rejection));
    }
}

impl Drop for RefreshCycle<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Refresh cycle abandoned before completion");
            self.coordinator.settle(self.epoch, Err(Rejection::Abandoned));
        }
    }
}

/// Suspended request waiting for the running cycle
pub struct Waiter {
    rx: oneshot::Receiver<Outcome>,
}

impl Waiter {
    /// New access token, or the reason the refresh failed
    pub async fn wait(self) -> Result<String, Rejection> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(Rejection::Abandoned),
        }
    }
}
