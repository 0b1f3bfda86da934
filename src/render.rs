//! Plain-text presentation: tables and horizontal bar charts.
//!
//! Every function returns a `String` so output can be checked in tests; colour
//! is applied by the caller only to status lines.

use crate::campaign::CampaignEntry;
use crate::config::RepoId;
use crate::metrics::{RepositoryMetrics, ACTIVITY_WINDOW_DAYS};
use crate::types::{RepositorySnapshot, UserRepository};

const BAR_WIDTH: usize = 40;
const MESSAGE_WIDTH: usize = 60;
const RECENT_COMMITS: usize = 10;

/// A simple left-aligned text table.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        push_line(&mut out, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or_default();
            format!("{:<width$}", cell, width = *width)
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Renders one labelled bar per value, scaled so the largest fills `BAR_WIDTH`.
pub fn bar_chart(title: &str, values: &[(String, f64)], unit: &str) -> String {
    let mut out = format!("{}\n", title);
    let label_width = values.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = values.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    for (label, value) in values {
        let filled = if max > 0.0 {
            ((value.max(0.0) / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "  {:<lw$}  {:<bw$}  {}{}\n",
            label,
            "█".repeat(filled),
            format_number(*value),
            unit,
            lw = label_width,
            bw = BAR_WIDTH
        ));
    }
    out
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// Full detail view for a searched repository.
pub fn render_snapshot(
    repo_id: &RepoId,
    snapshot: &RepositorySnapshot,
    metrics: &RepositoryMetrics,
) -> String {
    let latest = metrics
        .latest_commit_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    let mut out = [
        repo_id.to_string(),
        format!("Stars: {}", snapshot.stars),
        format!("Forks: {}", snapshot.forks),
        format!("Languages: {}", snapshot.language_names().join(", ")),
        format!("Average issue resolution time: {}", metrics.average_resolution_time),
        format!(
            "Issues closed in the last {} days: {}",
            ACTIVITY_WINDOW_DAYS, metrics.issues_closed_in_window
        ),
        format!(
            "Commits in the last {} days: {}",
            ACTIVITY_WINDOW_DAYS, metrics.commits_in_window
        ),
        format!("Latest commit: {}", latest),
    ]
    .join("\n");
    out.push('\n');

    let total = snapshot.total_language_bytes();
    if total > 0 {
        let shares: Vec<(String, f64)> = snapshot
            .languages
            .iter()
            .map(|l| (l.name.clone(), l.size as f64 * 100.0 / total as f64))
            .collect();
        out.push('\n');
        out.push_str(&bar_chart("Language breakdown", &shares, "%"));
    }

    if !snapshot.commits.is_empty() {
        let mut table = Table::new(["Date", "Message", "URL"]);
        for commit in snapshot.commits.iter().take(RECENT_COMMITS) {
            table.row([
                commit.committed_at.format("%Y-%m-%d").to_string(),
                truncate(commit.headline(), MESSAGE_WIDTH),
                commit.url.clone(),
            ]);
        }
        out.push_str("\nRecent commits\n");
        out.push_str(&table.render());
    }

    out.push_str("\nCollaborators\n");
    if snapshot.collaborators.is_empty() {
        out.push_str("  (none visible)\n");
    } else {
        let mut table = Table::new(["Login", "Profile"]);
        for c in &snapshot.collaborators {
            table.row([c.login.clone(), c.url.clone()]);
        }
        out.push_str(&table.render());
    }

    out
}

pub fn render_user_repositories(username: &str, repos: &[UserRepository]) -> String {
    if repos.is_empty() {
        return format!("{} has no public repositories.\n", username);
    }
    let mut table = Table::new(["Repository", "Owner", "URL"]);
    for repo in repos {
        table.row([repo.name.clone(), repo.owner_login.clone(), repo.html_url.clone()]);
    }
    format!("Repositories for {}\n{}", username, table.render())
}

pub fn render_campaign(entries: &[CampaignEntry]) -> String {
    if entries.is_empty() {
        return "The campaign is empty.\n".to_string();
    }
    let mut table = Table::new([
        "Repository",
        "Stars",
        "Forks",
        "Languages",
        "Avg resolution",
        "Latest commit",
        "Closed 60d",
        "Commits 60d",
        "Contributors",
    ]);
    for e in entries {
        table.row([
            e.full_name(),
            e.stars.to_string(),
            e.forks.to_string(),
            e.languages.clone(),
            e.average_resolution_time.clone(),
            e.latest_commit_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "n/a".to_string()),
            e.issues_closed_60d.to_string(),
            e.commits_60d.to_string(),
            truncate(&e.contributors, MESSAGE_WIDTH),
        ]);
    }
    table.render()
}

/// Side-by-side bar charts of the numeric campaign metrics.
pub fn render_comparison(entries: &[CampaignEntry]) -> String {
    if entries.is_empty() {
        return "The campaign is empty; add repositories to compare them.\n".to_string();
    }

    [
        bar_chart("Stars", &series(entries, |e| e.stars as f64), ""),
        bar_chart("Forks", &series(entries, |e| e.forks as f64), ""),
        bar_chart(
            "Issues closed (60 days)",
            &series(entries, |e| e.issues_closed_60d as f64),
            "",
        ),
        bar_chart(
            "Commits (60 days)",
            &series(entries, |e| e.commits_60d as f64),
            "",
        ),
    ]
    .join("\n")
}

fn series(entries: &[CampaignEntry], value: impl Fn(&CampaignEntry) -> f64) -> Vec<(String, f64)> {
    entries.iter().map(|e| (e.full_name(), value(e))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::calculate_metrics;
    use crate::types::{Collaborator, LanguageShare};
    use chrono::{TimeZone, Utc};

    fn entry(repo: &str, stars: u64) -> CampaignEntry {
        CampaignEntry {
            repository: repo.to_string(),
            owner: "o".to_string(),
            stars,
            forks: 1,
            languages: "Rust".to_string(),
            average_resolution_time: "2.00 hours".to_string(),
            latest_commit_date: None,
            contributors: "alice".to_string(),
            issues_closed_60d: 3,
            commits_60d: 0,
        }
    }

    #[test]
    fn test_table_alignment() {
        let mut table = Table::new(["Name", "N"]);
        table.row(["alpha", "1"]).row(["b", "200"]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Name   N");
        assert_eq!(lines[1], "-----  ---");
        assert_eq!(lines[2], "alpha  1");
        assert_eq!(lines[3], "b      200");
    }

    #[test]
    fn test_bar_chart_scales_to_max() {
        let chart = bar_chart(
            "Stars",
            &[("big".to_string(), 100.0), ("half".to_string(), 50.0)],
            "",
        );
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[1].matches('█').count(), BAR_WIDTH);
        assert_eq!(lines[2].matches('█').count(), BAR_WIDTH / 2);
        assert!(lines[2].ends_with("50"));
    }

    #[test]
    fn test_bar_chart_all_zero() {
        let chart = bar_chart("Commits", &[("a".to_string(), 0.0)], "");
        assert_eq!(chart.matches('█').count(), 0);
    }

    #[test]
    fn test_render_snapshot() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let snapshot = RepositorySnapshot {
            stars: 42,
            forks: 3,
            languages: vec![
                LanguageShare { name: "Rust".to_string(), size: 75 },
                LanguageShare { name: "C".to_string(), size: 25 },
            ],
            closed_issues: vec![],
            commits: vec![],
            collaborators: vec![Collaborator {
                login: "alice".to_string(),
                url: "https://github.com/alice".to_string(),
            }],
        };
        let metrics = calculate_metrics(&snapshot, now);
        let repo_id = RepoId { owner: "o".to_string(), repo: "r".to_string() };

        let out = render_snapshot(&repo_id, &snapshot, &metrics);

        assert!(out.starts_with("o/r\n"));
        assert!(out.contains("Stars: 42"));
        assert!(out.contains("Languages: Rust, C"));
        assert!(out.contains("Average issue resolution time: 0.00 hours"));
        assert!(out.contains("Latest commit: n/a"));
        assert!(out.contains("75%"));
        assert!(out.contains("alice"));
    }

    #[test]
    fn test_render_snapshot_header_lines() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let snapshot = RepositorySnapshot {
            stars: 7,
            forks: 2,
            languages: vec![],
            closed_issues: vec![],
            commits: vec![],
            collaborators: vec![],
        };
        let metrics = calculate_metrics(&snapshot, now);
        let repo_id = RepoId { owner: "o".to_string(), repo: "r".to_string() };

        let out = render_snapshot(&repo_id, &snapshot, &metrics);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            &lines[..8],
            [
                "o/r",
                "Stars: 7",
                "Forks: 2",
                "Languages: ",
                "Average issue resolution time: 0.00 hours",
                "Issues closed in the last 60 days: 0",
                "Commits in the last 60 days: 0",
                "Latest commit: n/a",
            ]
        );
        assert_eq!(lines[8], "");
        assert_eq!(lines[9], "Collaborators");
        assert!(out.ends_with("  (none visible)\n"));
    }

    #[test]
    fn test_bar_chart_one_line_per_value() {
        let chart = bar_chart(
            "Forks",
            &[("a".to_string(), 1.0), ("b".to_string(), 2.5)],
            "",
        );
        assert_eq!(chart.lines().count(), 3);
        assert!(chart.ends_with("2.5\n"));
    }

    #[test]
    fn test_render_campaign_and_comparison() {
        let entries = vec![entry("one", 10), entry("two", 20)];

        let table = render_campaign(&entries);
        assert!(table.contains("o/one"));
        assert!(table.contains("o/two"));

        let comparison = render_comparison(&entries);
        assert!(comparison.contains("Stars"));
        assert!(comparison.contains("Commits (60 days)"));
    }

    #[test]
    fn test_render_empty_campaign() {
        assert_eq!(render_campaign(&[]), "The campaign is empty.\n");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
