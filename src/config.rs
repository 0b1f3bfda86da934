//! Application configuration and environment variable parsing.
//!
//! Settings are read from the environment (optionally seeded from a `.env` file).
//! `AppConfig` controls the GitHub credential, how much history each repository
//! query requests, and where the campaign file lives.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// GitHub caps every connection and REST page at 100 items.
pub const GITHUB_MAX_PAGE_SIZE: u32 = 100;

/// A unique identifier for a GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    /// The owner of the repository (e.g., "facebook").
    pub owner: String,
    /// The name of the repository (e.g., "react").
    pub repo: String,
}

impl RepoId {
    /// Checks that both parts are usable as a single path segment each.
    pub fn validate(&self) -> Result<()> {
        validate_segment("owner", &self.owner)?;
        validate_segment("repository name", &self.repo)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DashboardError::InputFormat(
                "Please enter a repository name.".to_string(),
            ));
        }

        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [owner, repo] if !owner.trim().is_empty() && !repo.trim().is_empty() => Ok(RepoId {
                owner: owner.trim().to_string(),
                repo: repo.trim().to_string(),
            }),
            _ => Err(DashboardError::InputFormat(format!(
                "Invalid repository name format '{}'. Please use the format 'owner/repo'.",
                s
            ))),
        }
    }
}

/// Rejects empty identifiers and identifiers that would add path segments.
pub fn validate_segment(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DashboardError::InputFormat(format!("{} must not be empty", what)));
    }
    if value.contains('/') {
        return Err(DashboardError::InputFormat(format!(
            "{} '{}' must not contain '/'",
            what, value
        )));
    }
    Ok(())
}

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// GitHub token sent as a bearer credential. Requests fail without it.
    pub github_token: Option<String>,

    /// Alternative API root, e.g. for GitHub Enterprise.
    pub github_api_url: Option<String>,

    /// File the campaign list is persisted to.
    #[serde(default = "default_campaign_path")]
    pub campaign_path: PathBuf,

    /// Number of closed issues requested per repository search.
    #[serde(default = "default_page_size")]
    pub issue_fetch_count: u32,

    /// Number of default-branch commits requested per repository search.
    #[serde(default = "default_page_size")]
    pub commit_fetch_count: u32,

    /// Number of collaborators requested per repository search.
    #[serde(default = "default_page_size")]
    pub collaborator_fetch_count: u32,

    /// Page size for listing a developer's repositories.
    #[serde(default = "default_page_size")]
    pub user_repos_per_page: u32,
}

fn default_campaign_path() -> PathBuf {
    PathBuf::from("campaign.json")
}

fn default_page_size() -> u32 {
    GITHUB_MAX_PAGE_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: None,
            campaign_path: default_campaign_path(),
            issue_fetch_count: default_page_size(),
            commit_fetch_count: default_page_size(),
            collaborator_fetch_count: default_page_size(),
            user_repos_per_page: default_page_size(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> std::result::Result<Self, envy::Error> {
        envy::from_env()
    }

    /// The configured token, or `MissingCredential` if it is unset or blank.
    pub fn token(&self) -> Result<&str> {
        match self.github_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(DashboardError::MissingCredential),
        }
    }

    pub fn issue_count(&self) -> u32 {
        clamp_page_size(self.issue_fetch_count)
    }

    pub fn commit_count(&self) -> u32 {
        clamp_page_size(self.commit_fetch_count)
    }

    pub fn collaborator_count(&self) -> u32 {
        clamp_page_size(self.collaborator_fetch_count)
    }

    pub fn user_repos_page_size(&self) -> u32 {
        clamp_page_size(self.user_repos_per_page)
    }
}

fn clamp_page_size(n: u32) -> u32 {
    n.clamp(1, GITHUB_MAX_PAGE_SIZE)
}
