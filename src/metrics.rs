use crate::types::{ClosedIssue, CommitRecord, RepositorySnapshot};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Only this many issues, taken from the front of the list, feed the average.
pub const RESOLUTION_SAMPLE_SIZE: usize = 10;

/// Size of the trailing activity window, in days.
pub const ACTIVITY_WINDOW_DAYS: i64 = 60;

const SECONDS_PER_HOUR: f64 = 3600.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Derived figures shown for a searched repository and copied into campaign entries.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryMetrics {
    pub average_resolution_hours: f64,
    /// `average_resolution_hours` formatted for display, e.g. `"1.25 days"`.
    pub average_resolution_time: String,
    /// Issues closed within the last `ACTIVITY_WINDOW_DAYS`.
    pub issues_closed_in_window: usize,
    /// Commits within the last `ACTIVITY_WINDOW_DAYS`.
    pub commits_in_window: usize,
    pub latest_commit_date: Option<NaiveDate>,
}

/// Calculates all repository metrics relative to `now`.
pub fn calculate_metrics(snapshot: &RepositorySnapshot, now: DateTime<Utc>) -> RepositoryMetrics {
    let average_resolution_hours = average_resolution_hours(&snapshot.closed_issues);

    RepositoryMetrics {
        average_resolution_hours,
        average_resolution_time: format_resolution_time(average_resolution_hours),
        issues_closed_in_window: count_closed_within_days(
            &snapshot.closed_issues,
            ACTIVITY_WINDOW_DAYS,
            now,
        ),
        commits_in_window: count_commits_within_days(&snapshot.commits, ACTIVITY_WINDOW_DAYS, now),
        latest_commit_date: latest_commit_date(&snapshot.commits),
    }
}

/// Mean time from creation to closure, in hours, over the first
/// `RESOLUTION_SAMPLE_SIZE` issues in the order given.
///
/// Returns `0.0` for an empty list. An issue closed before it was created
/// contributes a negative duration.
pub fn average_resolution_hours(issues: &[ClosedIssue]) -> f64 {
    let sample = &issues[..issues.len().min(RESOLUTION_SAMPLE_SIZE)];
    if sample.is_empty() {
        return 0.0;
    }

    let total_seconds: i64 = sample
        .iter()
        .map(|issue| (issue.closed_at - issue.created_at).num_seconds())
        .sum();

    total_seconds as f64 / sample.len() as f64 / SECONDS_PER_HOUR
}

/// Counts issues closed at or after `now - days`.
pub fn count_closed_within_days(issues: &[ClosedIssue], days: i64, now: DateTime<Utc>) -> usize {
    let window_start = now - Duration::days(days);
    issues
        .iter()
        .filter(|issue| issue.closed_at >= window_start)
        .count()
}

/// Counts commits made at or after `now - days`.
pub fn count_commits_within_days(commits: &[CommitRecord], days: i64, now: DateTime<Utc>) -> usize {
    let window_start = now - Duration::days(days);
    commits
        .iter()
        .filter(|commit| commit.committed_at >= window_start)
        .count()
}

/// Formats hours as days once they exceed a full day (strictly), otherwise as hours.
pub fn format_resolution_time(hours: f64) -> String {
    if hours > HOURS_PER_DAY {
        format!("{:.2} days", hours / HOURS_PER_DAY)
    } else {
        format!("{:.2} hours", hours)
    }
}

fn latest_commit_date(commits: &[CommitRecord]) -> Option<NaiveDate> {
    commits
        .iter()
        .map(|commit| commit.committed_at)
        .max()
        .map(|at| at.date_naive())
}
