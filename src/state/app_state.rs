//! Main application state shared by the HTTP handlers

use std::{sync::Arc, time::Instant};

use crate::{services::InMemorySessionStore, timer::FocusTimer};

/// Application state: the focus timer and the locally hosted session records
#[derive(Clone)]
pub struct AppState {
    /// The focus timer driven by the `/timer` endpoints
    pub timer: FocusTimer,
    /// Session records served under `/api/pomodoro`
    pub records: Arc<InMemorySessionStore>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    pub fn new(
        timer: FocusTimer,
        records: Arc<InMemorySessionStore>,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            timer,
            records,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed().as_secs())
    }
}

fn format_uptime(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(5), "5s");
        assert_eq!(format_uptime(125), "2m 5s");
        assert_eq!(format_uptime(3725), "1h 2m 5s");
    }
}
