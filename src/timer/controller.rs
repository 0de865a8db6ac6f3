//! Focus timer controller
//!
//! [`FocusTimer`] owns a [`TimerState`], runs its countdown on a background
//! task and reports sessions to a [`SessionStore`]. Store calls are fire and
//! forget: they never hold up a transition or the countdown, and their
//! failures are logged and swallowed.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use tokio::sync::watch;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, info, warn};

use crate::{
    services::SessionStore,
    state::{
        RecordId, Rejected, SessionEffect, SessionKind, TaskId, TickOutcome, TimerSnapshot,
        TimerState,
    },
    tasks::countdown_task,
};

const TICK_PERIOD: Duration = Duration::from_secs(1);

struct Inner {
    state: Mutex<TimerState>,
    store: Arc<dyn SessionStore>,
    /// Cancels the countdown task of the current run, if any
    ticker: Mutex<Option<CancellationToken>>,
    /// In-flight session store calls
    calls: TaskTracker,
    /// Set once by shutdown; keeps settle from reopening `calls`
    shut_down: Mutex<bool>,
    updates: watch::Sender<TimerSnapshot>,
    tick_period: Duration,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let ticker = self.ticker.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = ticker.take() {
            token.cancel();
        }
    }
}

/// Handle to a focus timer. Clones share the same timer.
///
/// Dropping the last handle cancels the countdown.
#[derive(Clone)]
pub struct FocusTimer {
    inner: Arc<Inner>,
}

impl FocusTimer {
    /// Create an idle timer reporting to `store`
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::with_tick_period(store, TICK_PERIOD)
    }

    /// Create a timer whose countdown ticks every `tick_period`
    pub fn with_tick_period(store: Arc<dyn SessionStore>, tick_period: Duration) -> Self {
        let state = TimerState::new();
        let (updates, _) = watch::channel(TimerSnapshot::from(&state));

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                store,
                ticker: Mutex::new(None),
                calls: TaskTracker::new(),
                shut_down: Mutex::new(false),
                updates,
                tick_period,
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, TimerState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Current view of the timer
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from(&*self.lock_state())
    }

    /// Receive a snapshot after every transition and every tick
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.inner.updates.subscribe()
    }

    /// Start a new session, or resume a paused one
    pub fn start(&self, task: Option<TaskId>) -> Result<TimerSnapshot, Rejected> {
        self.apply("start", |state| state.start(task))
    }

    pub fn pause(&self) -> Result<TimerSnapshot, Rejected> {
        self.apply("pause", |state| state.pause().map(|()| None))
    }

    pub fn resume(&self) -> Result<TimerSnapshot, Rejected> {
        self.apply("resume", |state| state.resume().map(|()| None))
    }

    /// Abandon the current session
    pub fn stop(&self) -> Result<TimerSnapshot, Rejected> {
        self.apply("stop", TimerState::stop)
    }

    /// Rewind the countdown and go idle
    pub fn reset(&self) -> TimerSnapshot {
        let result = self.apply("reset", |state| {
            state.reset();
            Ok(None)
        });
        result.unwrap_or_else(|_| self.snapshot())
    }

    pub fn set_session_kind(&self, kind: SessionKind) -> Result<TimerSnapshot, Rejected> {
        self.apply("set_session_kind", |state| {
            state.set_session_kind(kind).map(|()| None)
        })
    }

    pub fn set_task(&self, task: Option<TaskId>) -> Result<TimerSnapshot, Rejected> {
        self.apply("set_task", |state| state.set_task(task).map(|()| None))
    }

    /// Wait until every session store call issued so far has finished
    pub async fn settle(&self) {
        self.inner.calls.close();
        self.inner.calls.wait().await;

        let shut_down = self
            .inner
            .shut_down
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !*shut_down {
            self.inner.calls.reopen();
        }
    }

    /// Cancel the countdown and wait for in-flight session store calls
    pub async fn shutdown(&self) {
        info!("Shutting down focus timer");
        self.cancel_ticker();
        {
            let mut shut_down = self
                .inner
                .shut_down
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *shut_down = true;
            self.inner.calls.close();
        }
        self.inner.calls.wait().await;
    }

    /// Run a transition, then restart ticking and dispatch store calls as needed
    fn apply<F>(&self, action: &str, transition: F) -> Result<TimerSnapshot, Rejected>
    where
        F: FnOnce(&mut TimerState) -> Result<Option<SessionEffect>, Rejected>,
    {
        let mut state = self.lock_state();
        let generation = state.run_generation();

        let effect = match transition(&mut state) {
            Ok(effect) => effect,
            Err(reason) => {
                debug!("Ignoring {}: {}", action, reason);
                return Err(reason);
            }
        };

        if state.run_generation() != generation {
            self.cancel_ticker();
            if state.is_running() {
                self.spawn_countdown(state.run_generation());
            }
        }

        // published under the lock so observers never see snapshots out of order
        let snapshot = TimerSnapshot::from(&*state);
        self.inner.updates.send_replace(snapshot.clone());
        drop(state);

        info!(
            "Timer {}: {:?} {} {}",
            action, snapshot.status, snapshot.session_kind, snapshot.formatted_time
        );
        if let Some(effect) = effect {
            self.dispatch(effect);
        }
        Ok(snapshot)
    }

    fn cancel_ticker(&self) {
        let mut ticker = self
            .inner
            .ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = ticker.take() {
            token.cancel();
        }
    }

    fn spawn_countdown(&self, generation: u64) {
        let token = CancellationToken::new();
        let weak = Arc::downgrade(&self.inner);

        tokio::spawn(countdown_task(
            self.inner.tick_period,
            token.clone(),
            move || Self::tick_weak(&weak, generation),
        ));

        *self
            .inner
            .ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn tick_weak(inner: &Weak<Inner>, generation: u64) -> bool {
        match inner.upgrade() {
            Some(inner) => FocusTimer { inner }.on_tick(generation),
            None => false,
        }
    }

    /// Handle one countdown tick; returns whether the countdown continues
    fn on_tick(&self, generation: u64) -> bool {
        let mut state = self.lock_state();
        let outcome = state.tick(generation);
        if outcome == TickOutcome::Stale {
            return false;
        }
        let snapshot = TimerSnapshot::from(&*state);
        self.inner.updates.send_replace(snapshot.clone());
        drop(state);

        match outcome {
            TickOutcome::Stale | TickOutcome::Counted { .. } => true,
            TickOutcome::Completed { finished, effect } => {
                info!(
                    "{} session completed, next up: {} ({} work sessions done)",
                    finished, snapshot.session_kind, snapshot.completed_work_sessions
                );
                if let Some(effect) = effect {
                    self.dispatch(effect);
                }
                false
            }
        }
    }

    fn dispatch(&self, effect: SessionEffect) {
        let store = Arc::clone(&self.inner.store);

        match effect {
            SessionEffect::Create { epoch, session } => {
                let weak = Arc::downgrade(&self.inner);
                self.inner.calls.spawn(async move {
                    let record_id = match store.create_session(session).await {
                        Ok(id) => id,
                        Err(e) => {
                            warn!("Failed to create session record: {}", e);
                            return;
                        }
                    };
                    if let Some(inner) = weak.upgrade() {
                        FocusTimer { inner }.attach_record(epoch, record_id);
                    }
                });
            }
            SessionEffect::Finalize {
                record_id,
                completed,
                duration_seconds,
            } => {
                self.inner.calls.spawn(async move {
                    match store
                        .finalize_session(record_id, completed, duration_seconds)
                        .await
                    {
                        Ok(()) => debug!(
                            "Finalized session record {} (completed={}, {}s)",
                            record_id, completed, duration_seconds
                        ),
                        Err(e) => warn!("Failed to finalize session record {}: {}", record_id, e),
                    }
                });
            }
        }
    }

    fn attach_record(&self, epoch: u64, record_id: RecordId) {
        let mut state = self.lock_state();
        if !state.attach_record(epoch, record_id) {
            warn!(
                "Session ended before record {} was created, leaving it open",
                record_id
            );
            return;
        }
        self.inner
            .updates
            .send_replace(TimerSnapshot::from(&*state));
        drop(state);

        debug!("Attached session record {}", record_id);
    }
}
