//! Aggregated statistics over session records

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{SessionKind, SessionRecord};

/// Totals over a set of session records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_sessions: u64,
    pub completed_sessions: u64,
    /// Seconds spent in completed sessions
    pub total_duration: u64,
    pub work_sessions: u64,
    pub short_break_sessions: u64,
    pub long_break_sessions: u64,
}

impl SessionSummary {
    /// Completed sessions as a rounded percentage of all sessions
    pub fn completion_rate(&self) -> u64 {
        if self.total_sessions == 0 {
            return 0;
        }
        (self.completed_sessions as f64 / self.total_sessions as f64 * 100.0).round() as u64
    }

    /// Completed time in hours, rounded to one decimal
    pub fn focus_hours(&self) -> f64 {
        (self.total_duration as f64 / 360.0).round() / 10.0
    }
}

/// Per-day totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total_sessions: u64,
    pub total_duration: u64,
    pub completed_sessions: u64,
}

/// Bucket size for timeline statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    /// Parse a period name, falling back to `Day` for anything unknown
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "week" => Self::Week,
            "month" => Self::Month,
            "year" => Self::Year,
            _ => Self::Day,
        }
    }

    /// First day of the bucket containing `date`; weeks start on Monday
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => date - Duration::days(i64::from(date.weekday().num_days_from_monday())),
            Self::Month => date.with_day(1).unwrap_or(date),
            Self::Year => date.with_ordinal(1).unwrap_or(date),
        }
    }
}

/// Totals for one timeline bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineStats {
    pub period: NaiveDate,
    pub total_sessions: u64,
    pub total_duration: u64,
    pub completed_sessions: u64,
    pub work_duration: u64,
    pub short_break_duration: u64,
    pub long_break_duration: u64,
}

pub fn summarize(records: &[SessionRecord]) -> SessionSummary {
    let mut summary = SessionSummary::default();
    for record in records {
        summary.total_sessions += 1;
        if !record.completed {
            continue;
        }
        summary.completed_sessions += 1;
        summary.total_duration += u64::from(record.duration);
        match record.session_type {
            SessionKind::Work => summary.work_sessions += 1,
            SessionKind::ShortBreak => summary.short_break_sessions += 1,
            SessionKind::LongBreak => summary.long_break_sessions += 1,
        }
    }
    summary
}

/// Per-day totals for records started within the last `days` days, newest first.
///
/// Returns `None` when `days` is negative or reaches past the representable range.
pub fn daily(
    records: &[SessionRecord],
    days: i64,
    now: DateTime<Utc>,
) -> Option<Vec<DailyStats>> {
    if days < 0 {
        return None;
    }
    let since = now.checked_sub_signed(Duration::try_days(days)?)?;
    let mut by_date: BTreeMap<NaiveDate, DailyStats> = BTreeMap::new();

    for record in records.iter().filter(|r| r.started_at >= since) {
        let date = record.started_at.date_naive();
        let entry = by_date.entry(date).or_insert_with(|| DailyStats {
            date,
            total_sessions: 0,
            total_duration: 0,
            completed_sessions: 0,
        });
        entry.total_sessions += 1;
        if record.completed {
            entry.completed_sessions += 1;
            entry.total_duration += u64::from(record.duration);
        }
    }

    Some(by_date.into_values().rev().collect())
}

/// Totals grouped into `period` buckets, oldest first
pub fn timeline(records: &[SessionRecord], period: Period) -> Vec<TimelineStats> {
    let mut buckets: BTreeMap<NaiveDate, TimelineStats> = BTreeMap::new();

    for record in records {
        let start = period.bucket_start(record.started_at.date_naive());
        let entry = buckets.entry(start).or_insert_with(|| TimelineStats {
            period: start,
            ..Default::default()
        });
        entry.total_sessions += 1;
        if !record.completed {
            continue;
        }
        let duration = u64::from(record.duration);
        entry.completed_sessions += 1;
        entry.total_duration += duration;
        match record.session_type {
            SessionKind::Work => entry.work_duration += duration,
            SessionKind::ShortBreak => entry.short_break_duration += duration,
            SessionKind::LongBreak => entry.long_break_duration += duration,
        }
    }

    buckets.into_values().collect()
}

/// Human readable focus time such as `1h 30m` or `25m`
pub fn format_focus_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
