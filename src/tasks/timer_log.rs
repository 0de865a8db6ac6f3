//! Timer transition logging task

use tokio::sync::watch;
use tracing::{debug, info};

use crate::state::{TimerSnapshot, TimerStatus};

/// Whether moving from `previous` to `current` is worth an info line
fn is_transition(previous: &TimerSnapshot, current: &TimerSnapshot) -> bool {
    previous.status != current.status
        || previous.session_kind != current.session_kind
        || previous.completed_work_sessions != current.completed_work_sessions
}

/// Background task that logs timer transitions until the timer goes away
pub async fn timer_log_task(mut updates: watch::Receiver<TimerSnapshot>) {
    info!("Starting timer log task");

    let mut previous = updates.borrow_and_update().clone();

    while updates.changed().await.is_ok() {
        let current = updates.borrow_and_update().clone();

        if is_transition(&previous, &current) {
            info!(
                "Timer is now {:?}: {} session, {} left, {} work sessions completed",
                current.status,
                current.session_kind,
                current.formatted_time,
                current.completed_work_sessions
            );
        } else if current.status == TimerStatus::Running && current.remaining_seconds % 60 == 0 {
            debug!(
                "{} session: {} left ({:.0}%)",
                current.session_kind, current.formatted_time, current.progress_percent
            );
        }

        previous = current;
    }

    debug!("Timer closed, timer log task exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{SessionKind, TimerState};

    #[test]
    fn test_ticks_are_not_transitions() {
        let mut state = TimerState::new();
        state.start(None).unwrap();
        let before = TimerSnapshot::from(&state);
        state.tick(state.run_generation());
        let after = TimerSnapshot::from(&state);

        assert!(!is_transition(&before, &after));
    }

    #[test]
    fn test_status_and_kind_changes_are_transitions() {
        let mut state = TimerState::new();
        let idle = TimerSnapshot::from(&state);
        state.start(None).unwrap();
        let running = TimerSnapshot::from(&state);
        assert!(is_transition(&idle, &running));

        let mut other = TimerState::new();
        other.set_session_kind(SessionKind::LongBreak).unwrap();
        assert!(is_transition(&idle, &TimerSnapshot::from(&other)));
    }

    #[tokio::test]
    async fn test_exits_when_sender_is_dropped() {
        let (tx, rx) = watch::channel(TimerSnapshot::from(&TimerState::new()));
        let handle = tokio::spawn(timer_log_task(rx));
        drop(tx);
        handle.await.unwrap();
    }
}
