use crate::config::{validate_segment, AppConfig, RepoId};
use crate::decode;
use crate::error::{DashboardError, Result};
use crate::types::{RepositorySnapshot, UserRepository};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde_json::{json, Value};

/// Longest error body excerpt carried in a `Transport` message.
const ERROR_MESSAGE_LIMIT: usize = 200;

/// Composite query for everything a repository search displays.
pub const REPOSITORY_QUERY: &str = r#"
query RepositoryDetails(
  $owner: String!
  $name: String!
  $issueCount: Int!
  $commitCount: Int!
  $collaboratorCount: Int!
) {
  repository(owner: $owner, name: $name) {
    stargazerCount
    forkCount
    languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
      edges {
        size
        node {
          name
        }
      }
    }
    issues(first: $issueCount, states: CLOSED, orderBy: {field: UPDATED_AT, direction: DESC}) {
      edges {
        node {
          createdAt
          closedAt
        }
      }
    }
    defaultBranchRef {
      target {
        ... on Commit {
          history(first: $commitCount) {
            edges {
              node {
                committedDate
                message
                url
              }
            }
          }
        }
      }
    }
    collaborators(first: $collaboratorCount) {
      edges {
        node {
          login
          url
        }
      }
    }
  }
}
"#;

pub struct GitHubClient {
    octocrab: Octocrab,
    issue_count: u32,
    commit_count: u32,
    collaborator_count: u32,
    user_repos_per_page: u32,
}

impl GitHubClient {
    /// Builds a client from configuration. A missing token is not an error here;
    /// unauthenticated requests are rejected by GitHub instead.
    ///
    /// Each call is a single request: octocrab's default retry layer is disabled.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut builder = Octocrab::builder().add_retry_config(RetryConfig::None);
        if let Ok(token) = config.token() {
            builder = builder.personal_token(token.to_string());
        }
        if let Some(url) = &config.github_api_url {
            builder = builder.base_uri(url.as_str())?;
        }

        Ok(Self {
            octocrab: builder.build()?,
            issue_count: config.issue_count(),
            commit_count: config.commit_count(),
            collaborator_count: config.collaborator_count(),
            user_repos_per_page: config.user_repos_page_size(),
        })
    }

    /// Fetches stars, forks, languages, closed issues, recent commits and
    /// collaborators for one repository in a single GraphQL request.
    pub async fn fetch_repository(&self, repo_id: &RepoId) -> Result<RepositorySnapshot> {
        repo_id.validate()?;
        tracing::debug!(owner = %repo_id.owner, repo = %repo_id.repo, "Fetching repository details");

        let payload = json!({
            "query": REPOSITORY_QUERY,
            "variables": {
                "owner": repo_id.owner,
                "name": repo_id.repo,
                "issueCount": self.issue_count,
                "commitCount": self.commit_count,
                "collaboratorCount": self.collaborator_count,
            }
        });

        let response = self.octocrab._post("/graphql", Some(&payload)).await?;
        let status = response.status().as_u16();
        let body = self.octocrab.body_to_string(response).await?;
        let snapshot = decode::decode_repository(parse_response(status, &body)?)?;

        tracing::debug!(
            repo_id = %repo_id,
            issues = snapshot.closed_issues.len(),
            commits = snapshot.commits.len(),
            collaborators = snapshot.collaborators.len(),
            "Fetched repository details"
        );

        Ok(snapshot)
    }

    /// Lists a user's public repositories (one page).
    pub async fn fetch_user_repositories(&self, username: &str) -> Result<Vec<UserRepository>> {
        let username = username.trim();
        validate_segment("username", username)?;
        tracing::debug!(username, "Fetching user repositories");

        let route = format!(
            "/users/{}/repos?per_page={}",
            username, self.user_repos_per_page
        );
        let response = self.octocrab._get(route).await?;
        let status = response.status().as_u16();
        let body = self.octocrab.body_to_string(response).await?;

        decode::decode_user_repositories(parse_response(status, &body)?)
    }
}

/// Maps a raw HTTP response to JSON.
///
/// Any non-success status becomes `Transport`, whatever the body looks like.
/// GitHub's JSON `message` is used when present, otherwise the start of the body.
pub fn parse_response(status: u16, body: &str) -> Result<Value> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| {
                body.lines()
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .chars()
                    .take(ERROR_MESSAGE_LIMIT)
                    .collect()
            });
        tracing::debug!(status, %message, "GitHub request failed");
        return Err(DashboardError::Transport { status, message });
    }

    serde_json::from_str(body).map_err(|e| DashboardError::NotFoundOrMalformed(e.to_string()))
}
