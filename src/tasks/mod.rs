//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod countdown;
pub mod timer_log;

// Re-export main functions
pub use countdown::countdown_task;
pub use timer_log::timer_log_task;
