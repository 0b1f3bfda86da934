//! The campaign: a user-curated list of repository summaries kept for comparison.
//!
//! `CampaignStore` owns the in-memory list and mirrors it to a single JSON file.
//! Every mutation rewrites the whole file through a temporary file in the same
//! directory, which is then renamed over the target. A crash mid-write
//! therefore leaves the previous file intact.

use crate::config::RepoId;
use crate::error::Result;
use crate::metrics::RepositoryMetrics;
use crate::types::RepositorySnapshot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Summary of one searched repository, frozen when it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignEntry {
    pub repository: String,
    pub owner: String,
    pub stars: u64,
    pub forks: u64,
    /// Comma-joined language names.
    pub languages: String,
    /// Formatted with its unit, e.g. `"3.10 days"`.
    pub average_resolution_time: String,
    pub latest_commit_date: Option<NaiveDate>,
    /// Comma-joined collaborator logins.
    pub contributors: String,
    pub issues_closed_60d: usize,
    pub commits_60d: usize,
}

impl CampaignEntry {
    pub fn new(repo_id: &RepoId, snapshot: &RepositorySnapshot, metrics: &RepositoryMetrics) -> Self {
        Self {
            repository: repo_id.repo.clone(),
            owner: repo_id.owner.clone(),
            stars: snapshot.stars,
            forks: snapshot.forks,
            languages: snapshot.language_names().join(", "),
            average_resolution_time: metrics.average_resolution_time.clone(),
            latest_commit_date: metrics.latest_commit_date,
            contributors: snapshot.collaborator_logins().join(", "),
            issues_closed_60d: metrics.issues_closed_in_window,
            commits_60d: metrics.commits_in_window,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repository)
    }
}

#[derive(Debug)]
pub struct CampaignStore {
    path: PathBuf,
    entries: Vec<CampaignEntry>,
}

impl CampaignStore {
    /// Loads the campaign from `path`. A missing file is an empty campaign.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No campaign file yet; starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, entries })
    }

    pub fn entries(&self) -> &[CampaignEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `entry` and persists. Duplicates are kept.
    ///
    /// If persisting fails the entry is removed again, so memory and disk agree.
    pub fn append(&mut self, entry: CampaignEntry) -> Result<()> {
        let name = entry.full_name();
        self.entries.push(entry);
        if let Err(e) = self.save() {
            self.entries.pop();
            return Err(e);
        }
        tracing::info!(repo = %name, entries = self.entries.len(), "Added repository to campaign");
        Ok(())
    }

    /// Removes every entry and persists the empty campaign.
    pub fn clear(&mut self) -> Result<()> {
        let previous = std::mem::take(&mut self.entries);
        if let Err(e) = self.save() {
            self.entries = previous;
            return Err(e);
        }
        tracing::info!(path = %self.path.display(), "Cleared campaign");
        Ok(())
    }

    /// Writes the full list to disk via temp-file-then-rename.
    pub fn save(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, &self.entries)?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}
