//! User-facing actions. The CLI and the interactive shell both call these.
//!
//! Handlers receive the GitHub client and the campaign store by reference. Both
//! are constructed once at startup.

use crate::campaign::{CampaignEntry, CampaignStore};
use crate::config::RepoId;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::metrics::{self, RepositoryMetrics};
use crate::types::{RepositorySnapshot, UserRepository};
use crate::{export, render};
use chrono::Utc;
use std::path::Path;

/// A fetched repository together with the metrics derived from it.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub repo_id: RepoId,
    pub snapshot: RepositorySnapshot,
    pub metrics: RepositoryMetrics,
}

impl SearchResult {
    pub fn from_snapshot(repo_id: RepoId, snapshot: RepositorySnapshot) -> Self {
        let metrics = metrics::calculate_metrics(&snapshot, Utc::now());
        Self {
            repo_id,
            snapshot,
            metrics,
        }
    }

    pub fn render(&self) -> String {
        render::render_snapshot(&self.repo_id, &self.snapshot, &self.metrics)
    }

    pub fn to_campaign_entry(&self) -> CampaignEntry {
        CampaignEntry::new(&self.repo_id, &self.snapshot, &self.metrics)
    }
}

/// Parses `owner/repo`, fetches it and derives its metrics.
pub async fn search_repository(client: &GitHubClient, input: &str) -> Result<SearchResult> {
    let repo_id: RepoId = input.parse()?;
    let snapshot = client.fetch_repository(&repo_id).await?;
    Ok(SearchResult::from_snapshot(repo_id, snapshot))
}

pub async fn search_developer(client: &GitHubClient, username: &str) -> Result<Vec<UserRepository>> {
    client.fetch_user_repositories(username).await
}

/// Appends the result's summary to the campaign and returns the stored entry.
pub fn add_to_campaign<'a>(
    store: &'a mut CampaignStore,
    result: &SearchResult,
) -> Result<&'a CampaignEntry> {
    store.append(result.to_campaign_entry())?;
    let entries = store.entries();
    Ok(&entries[entries.len() - 1])
}

pub fn clear_campaign(store: &mut CampaignStore) -> Result<()> {
    store.clear()
}

pub fn show_campaign(store: &CampaignStore) -> String {
    render::render_campaign(store.entries())
}

pub fn compare_campaign(store: &CampaignStore) -> String {
    render::render_comparison(store.entries())
}

/// Exports to `path`, or returns the CSV text when no path is given.
pub fn export_campaign(store: &CampaignStore, path: Option<&Path>) -> Result<Option<String>> {
    match path {
        Some(path) => {
            export::export_to_file(store.entries(), path)?;
            Ok(None)
        }
        None => export::to_csv_string(store.entries()).map(Some),
    }
}
