//! Focus Timer - A Pomodoro focus timer server
//! 
//! This library provides the focus timer state machine and controller, the
//! session record stores it reports to, and the HTTP API exposing both.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use services::{HttpSessionStore, InMemorySessionStore, SessionStore, StoreError};
pub use state::{AppState, SessionKind, TimerSnapshot, TimerStatus};
pub use timer::FocusTimer;
pub use utils::signals::shutdown_signal;
