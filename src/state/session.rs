//! Session kinds and session record types shared by the timer and the stores

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of the task a session is attributed to
pub type TaskId = i64;

/// Opaque identifier of a persisted session record
pub type RecordId = i64;

/// Work session length in seconds
pub const WORK_DURATION: u32 = 25 * 60;
/// Short break length in seconds
pub const SHORT_BREAK_DURATION: u32 = 5 * 60;
/// Long break length in seconds
pub const LONG_BREAK_DURATION: u32 = 15 * 60;
/// Every n-th completed work session is followed by a long break
pub const SESSIONS_BEFORE_LONG_BREAK: u32 = 4;

/// Kind of timer session, which determines the countdown length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    /// Full countdown length for this kind, in seconds
    pub const fn duration_seconds(self) -> u32 {
        match self {
            Self::Work => WORK_DURATION,
            Self::ShortBreak => SHORT_BREAK_DURATION,
            Self::LongBreak => LONG_BREAK_DURATION,
        }
    }

    /// Kind that follows this one, given the work sessions completed so far
    pub const fn next(self, completed_work_sessions: u32) -> Self {
        match self {
            Self::Work if completed_work_sessions % SESSIONS_BEFORE_LONG_BREAK == 0 => {
                Self::LongBreak
            }
            Self::Work => Self::ShortBreak,
            Self::ShortBreak | Self::LongBreak => Self::Work,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::ShortBreak => "short_break",
            Self::LongBreak => "long_break",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_duration() -> u32 {
    WORK_DURATION
}

/// Request to open a new session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
    #[serde(default)]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub session_type: SessionKind,
    #[serde(default)]
    pub completed: bool,
}

impl NewSession {
    /// An open (not yet completed) record for a timer session of `kind`
    pub fn open(task_id: Option<TaskId>, kind: SessionKind) -> Self {
        Self {
            task_id,
            user_id: None,
            duration: kind.duration_seconds(),
            session_type: kind,
            completed: false,
        }
    }
}

/// Partial update of a session record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl SessionUpdate {
    /// Update that closes a record with its final outcome
    pub fn finalize(completed: bool, duration: u32) -> Self {
        Self {
            completed: Some(completed),
            duration: Some(duration),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_none() && self.duration.is_none()
    }
}

/// A persisted session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: RecordId,
    pub task_id: Option<TaskId>,
    pub user_id: Option<i64>,
    pub duration: u32,
    pub session_type: SessionKind,
    pub completed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
