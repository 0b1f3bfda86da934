//! Typed decoding of GitHub API payloads.
//!
//! The fetcher hands raw JSON to this module. Decoding happens in two passes:
//! the GraphQL envelope first, so the `errors` list can be classified before
//! anything else, and then the `data` payload into strict wire records.
//! Any shape mismatch becomes `NotFoundOrMalformed`.

use crate::error::{DashboardError, GraphQlError, Result};
use crate::types::{
    ClosedIssue, Collaborator, CommitRecord, LanguageShare, RepositorySnapshot, UserRepository,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Sub-resource whose permission failures degrade to an empty list.
const COLLABORATORS_FIELD: &str = "collaborators";

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct RepositoryData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    stargazer_count: u64,
    fork_count: u64,
    #[serde(default)]
    languages: Option<Connection<LanguageEdge>>,
    issues: Connection<IssueEdge>,
    #[serde(default)]
    default_branch_ref: Option<BranchRef>,
    #[serde(default)]
    collaborators: Option<Connection<CollaboratorEdge>>,
}

/// A GraphQL connection; both the list and its items are nullable.
#[derive(Debug, Deserialize)]
struct Connection<E> {
    edges: Option<Vec<Option<E>>>,
}

impl<E> Connection<E> {
    fn into_edges(self) -> impl Iterator<Item = E> {
        self.edges.unwrap_or_default().into_iter().flatten()
    }
}

#[derive(Debug, Deserialize)]
struct LanguageEdge {
    size: u64,
    node: NamedNode,
}

#[derive(Debug, Deserialize)]
struct NamedNode {
    name: String,
}

#[derive(Debug, Deserialize)]
struct IssueEdge {
    node: IssueNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueNode {
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    #[serde(default)]
    target: Option<CommitTarget>,
}

/// `target` is a `GitObject`; only commits carry a `history`.
#[derive(Debug, Deserialize)]
struct CommitTarget {
    #[serde(default)]
    history: Option<Connection<CommitEdge>>,
}

#[derive(Debug, Deserialize)]
struct CommitEdge {
    node: CommitNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitNode {
    committed_date: DateTime<Utc>,
    #[serde(default)]
    message: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct CollaboratorEdge {
    node: UserNode,
}

#[derive(Debug, Deserialize)]
struct UserNode {
    login: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct RestRepository {
    name: String,
    html_url: String,
    owner: RestOwner,
}

#[derive(Debug, Deserialize)]
struct RestOwner {
    login: String,
}

/// Decodes the response of the composite repository query.
///
/// An `errors` list fails the decode with `Api`, unless every error is a
/// `FORBIDDEN` on the collaborators field. In that case the collaborators
/// are dropped and the rest of the snapshot is returned.
pub fn decode_repository(payload: Value) -> Result<RepositorySnapshot> {
    let envelope: GraphQlEnvelope = serde_json::from_value(payload).map_err(malformed)?;

    let errors = envelope.errors.unwrap_or_default();
    let collaborators_forbidden = !errors.is_empty();
    if collaborators_forbidden {
        if !errors.iter().all(is_forbidden_collaborators) {
            return Err(DashboardError::Api(errors));
        }
        tracing::warn!(
            errors = errors.len(),
            "Collaborators are not visible with this token; continuing without them"
        );
    }

    let data = envelope.data.ok_or_else(|| {
        DashboardError::NotFoundOrMalformed("response contains no data".to_string())
    })?;
    let data: RepositoryData = serde_json::from_value(data).map_err(malformed)?;
    let repository = data.repository.ok_or_else(|| {
        DashboardError::NotFoundOrMalformed("repository not found".to_string())
    })?;

    let languages = repository
        .languages
        .map(|conn| {
            conn.into_edges()
                .map(|edge| LanguageShare {
                    name: edge.node.name,
                    size: edge.size,
                })
                .collect()
        })
        .unwrap_or_default();

    let closed_issues = repository
        .issues
        .into_edges()
        .filter_map(|edge| {
            let closed_at = edge.node.closed_at?;
            Some(ClosedIssue {
                created_at: edge.node.created_at,
                closed_at,
            })
        })
        .collect();

    let commits = repository
        .default_branch_ref
        .and_then(|branch| branch.target)
        .and_then(|target| target.history)
        .map(|history| {
            history
                .into_edges()
                .map(|edge| CommitRecord {
                    committed_at: edge.node.committed_date,
                    message: edge.node.message,
                    url: edge.node.url,
                })
                .collect()
        })
        .unwrap_or_default();

    let collaborators = match repository.collaborators {
        Some(conn) if !collaborators_forbidden => conn
            .into_edges()
            .map(|edge| Collaborator {
                login: edge.node.login,
                url: edge.node.url,
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(RepositorySnapshot {
        stars: repository.stargazer_count,
        forks: repository.fork_count,
        languages,
        closed_issues,
        commits,
        collaborators,
    })
}

/// Decodes the REST listing of a user's repositories.
pub fn decode_user_repositories(payload: Value) -> Result<Vec<UserRepository>> {
    let repos: Vec<RestRepository> = serde_json::from_value(payload).map_err(malformed)?;
    Ok(repos
        .into_iter()
        .map(|repo| UserRepository {
            name: repo.name,
            owner_login: repo.owner.login,
            html_url: repo.html_url,
        })
        .collect())
}

fn is_forbidden_collaborators(error: &GraphQlError) -> bool {
    error.is_forbidden() && error.touches_field(COLLABORATORS_FIELD)
}

fn malformed(err: serde_json::Error) -> DashboardError {
    DashboardError::NotFoundOrMalformed(err.to_string())
}
