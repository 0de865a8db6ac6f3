//! State management module
//! 
//! This module contains the timer state machine, the session types it
//! reports, and the state shared by the HTTP handlers.

pub mod app_state;
pub mod session;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use session::{
    NewSession, RecordId, SessionKind, SessionRecord, SessionUpdate, TaskId,
    LONG_BREAK_DURATION, SESSIONS_BEFORE_LONG_BREAK, SHORT_BREAK_DURATION, WORK_DURATION,
};
pub use timer_state::{
    Rejected, SessionEffect, TickOutcome, TimerSnapshot, TimerState, TimerStatus,
};
