//! Timer state structure and its transition functions
//!
//! `TimerState` is a plain state machine with no I/O. Transitions that need
//! the session record store return a [`SessionEffect`] for the caller to
//! dispatch; invalid transitions return a [`Rejected`] reason and leave the
//! state untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::session::{NewSession, RecordId, SessionKind, TaskId};

/// Coarse timer status derived from the running/paused flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

/// Why a transition was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("timer is already running")]
    AlreadyRunning,
    #[error("timer is not running")]
    NotRunning,
    #[error("timer is not paused")]
    NotPaused,
    #[error("no session is in progress")]
    NoSession,
    #[error("a session is in progress")]
    SessionInProgress,
    #[error("countdown still has {0}s remaining")]
    TimeRemaining(u32),
}

/// Side effect on the session record store requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Open a record for the session identified by `epoch`
    Create { epoch: u64, session: NewSession },
    /// Close a record with its final outcome
    Finalize {
        record_id: RecordId,
        completed: bool,
        duration_seconds: u32,
    },
}

/// Result of feeding one tick into the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick came from a source that is no longer current
    Stale,
    /// One second was counted down
    Counted { remaining_seconds: u32 },
    /// The countdown reached zero and the session was completed
    Completed {
        finished: SessionKind,
        effect: Option<SessionEffect>,
    },
}

/// Countdown state owned by a single focus timer
#[derive(Debug, Clone)]
pub struct TimerState {
    remaining_seconds: u32,
    session_kind: SessionKind,
    running: bool,
    paused: bool,
    completed_work_sessions: u32,
    active_task: Option<TaskId>,
    active_record: Option<RecordId>,
    // bumped whenever a fresh session opens
    session_epoch: u64,
    // bumped whenever ticking starts or stops
    run_generation: u64,
}

impl TimerState {
    /// Create an idle work session
    pub fn new() -> Self {
        Self {
            remaining_seconds: SessionKind::Work.duration_seconds(),
            session_kind: SessionKind::Work,
            running: false,
            paused: false,
            completed_work_sessions: 0,
            active_task: None,
            active_record: None,
            session_epoch: 0,
            run_generation: 0,
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn session_kind(&self) -> SessionKind {
        self.session_kind
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn active_task(&self) -> Option<TaskId> {
        self.active_task
    }

    pub fn active_record(&self) -> Option<RecordId> {
        self.active_record
    }

    pub fn run_generation(&self) -> u64 {
        self.run_generation
    }

    pub fn status(&self) -> TimerStatus {
        if self.running {
            TimerStatus::Running
        } else if self.paused {
            TimerStatus::Paused
        } else {
            TimerStatus::Idle
        }
    }

    fn full_duration(&self) -> u32 {
        self.session_kind.duration_seconds()
    }

    /// Remaining time as zero-padded `MM:SS`
    pub fn formatted_time(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }

    /// Share of the current session already elapsed, from 0 to 100
    pub fn progress_percent(&self) -> f64 {
        let total = f64::from(self.full_duration());
        (total - f64::from(self.remaining_seconds)) / total * 100.0
    }

    /// Start a fresh session, or resume a paused one.
    ///
    /// Without an explicit task the session is attributed to the task chosen
    /// earlier with [`TimerState::set_task`], if any.
    pub fn start(&mut self, task: Option<TaskId>) -> Result<Option<SessionEffect>, Rejected> {
        match self.status() {
            TimerStatus::Running => Err(Rejected::AlreadyRunning),
            TimerStatus::Paused => self.resume().map(|()| None),
            TimerStatus::Idle => {
                self.running = true;
                self.paused = false;
                self.active_task = task.or(self.active_task);
                // a record left open by reset belongs to the previous session
                self.active_record = None;
                self.session_epoch += 1;
                self.run_generation += 1;

                Ok(Some(SessionEffect::Create {
                    epoch: self.session_epoch,
                    session: NewSession::open(self.active_task, self.session_kind),
                }))
            }
        }
    }

    pub fn pause(&mut self) -> Result<(), Rejected> {
        if !self.running {
            return Err(Rejected::NotRunning);
        }
        self.running = false;
        self.paused = true;
        self.run_generation += 1;
        Ok(())
    }

    /// Continue a paused session. The session keeps its record.
    pub fn resume(&mut self) -> Result<(), Rejected> {
        if !self.paused {
            return Err(Rejected::NotPaused);
        }
        self.running = true;
        self.paused = false;
        self.run_generation += 1;
        Ok(())
    }

    /// Abandon the current session, closing its record with the elapsed time
    pub fn stop(&mut self) -> Result<Option<SessionEffect>, Rejected> {
        if self.status() == TimerStatus::Idle {
            return Err(Rejected::NoSession);
        }
        self.running = false;
        self.paused = false;

        let elapsed = self.full_duration() - self.remaining_seconds;
        let effect = self.active_record.take().map(|record_id| SessionEffect::Finalize {
            record_id,
            completed: false,
            duration_seconds: elapsed,
        });

        self.reset();
        Ok(effect)
    }

    /// Finish a session whose countdown reached zero and move to the next kind
    pub fn complete(&mut self) -> Result<Option<SessionEffect>, Rejected> {
        if self.remaining_seconds > 0 {
            return Err(Rejected::TimeRemaining(self.remaining_seconds));
        }
        self.running = false;
        self.paused = false;
        self.run_generation += 1;

        let effect = self.active_record.take().map(|record_id| SessionEffect::Finalize {
            record_id,
            completed: true,
            duration_seconds: self.full_duration(),
        });

        if self.session_kind == SessionKind::Work {
            self.completed_work_sessions += 1;
        }

        self.advance_to_next_session();
        Ok(effect)
    }

    /// Switch to the kind that follows the current one, idle and full length
    pub fn advance_to_next_session(&mut self) {
        self.session_kind = self.session_kind.next(self.completed_work_sessions);
        self.reset();
    }

    /// Rewind the countdown and go idle. The session record is left open and
    /// is dropped when the next session starts.
    pub fn reset(&mut self) {
        self.remaining_seconds = self.full_duration();
        self.running = false;
        self.paused = false;
        self.active_task = None;
        self.run_generation += 1;
    }

    pub fn set_session_kind(&mut self, kind: SessionKind) -> Result<(), Rejected> {
        if self.status() != TimerStatus::Idle {
            return Err(Rejected::SessionInProgress);
        }
        self.session_kind = kind;
        self.reset();
        Ok(())
    }

    pub fn set_task(&mut self, task: Option<TaskId>) -> Result<(), Rejected> {
        if self.status() != TimerStatus::Idle {
            return Err(Rejected::SessionInProgress);
        }
        self.active_task = task;
        Ok(())
    }

    /// Attach the record created for session `epoch`.
    ///
    /// Returns false when that session has already ended or been replaced,
    /// in which case the record is not tracked.
    pub fn attach_record(&mut self, epoch: u64, record_id: RecordId) -> bool {
        let open = self.status() != TimerStatus::Idle;
        if epoch != self.session_epoch || !open || self.active_record.is_some() {
            return false;
        }
        self.active_record = Some(record_id);
        true
    }

    /// Count down one second if `generation` is the current tick source
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        if !self.running || generation != self.run_generation {
            return TickOutcome::Stale;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return TickOutcome::Counted {
                remaining_seconds: self.remaining_seconds,
            };
        }

        let finished = self.session_kind;
        match self.complete() {
            Ok(effect) => TickOutcome::Completed { finished, effect },
            Err(_) => TickOutcome::Stale,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the timer published to observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub session_kind: SessionKind,
    pub remaining_seconds: u32,
    pub formatted_time: String,
    pub progress_percent: f64,
    pub completed_work_sessions: u32,
    pub active_task_id: Option<TaskId>,
    pub active_record_id: Option<RecordId>,
}

impl From<&TimerState> for TimerSnapshot {
    fn from(state: &TimerState) -> Self {
        Self {
            status: state.status(),
            session_kind: state.session_kind(),
            remaining_seconds: state.remaining_seconds(),
            formatted_time: state.formatted_time(),
            progress_percent: state.progress_percent(),
            completed_work_sessions: state.completed_work_sessions(),
            active_task_id: state.active_task(),
            active_record_id: state.active_record(),
        }
    }
}
