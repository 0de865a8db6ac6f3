//! Focus timer module
//!
//! This module contains the controller that runs the Pomodoro countdown and
//! keeps session records in sync with a session store.

pub mod controller;

// Re-export main types
pub use controller::FocusTimer;
