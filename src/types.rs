use chrono::{DateTime, Utc};

/// Everything one repository search returns. Fetched fresh per search.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositorySnapshot {
    pub stars: u64,
    pub forks: u64,
    pub languages: Vec<LanguageShare>,
    /// Closed issues in the order the API returned them.
    pub closed_issues: Vec<ClosedIssue>,
    /// Default-branch history, newest first.
    pub commits: Vec<CommitRecord>,
    pub collaborators: Vec<Collaborator>,
}

impl RepositorySnapshot {
    pub fn language_names(&self) -> Vec<&str> {
        self.languages.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn collaborator_logins(&self) -> Vec<&str> {
        self.collaborators.iter().map(|c| c.login.as_str()).collect()
    }

    pub fn total_language_bytes(&self) -> u64 {
        self.languages.iter().map(|l| l.size).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageShare {
    pub name: String,
    /// Bytes of code in this language.
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedIssue {
    pub created_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub committed_at: DateTime<Utc>,
    pub message: String,
    pub url: String,
}

impl CommitRecord {
    pub fn headline(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collaborator {
    pub login: String,
    pub url: String,
}

/// One row of a developer's repository listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRepository {
    pub name: String,
    pub owner_login: String,
    pub html_url: String,
}
