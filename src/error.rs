use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    /// Error classification reported by GitHub (e.g. `FORBIDDEN`, `NOT_FOUND`).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Path of the field that failed, e.g. `["repository", "collaborators"]`.
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
    #[serde(default)]
    pub message: String,
}

impl GraphQlError {
    pub fn is_forbidden(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("FORBIDDEN"))
    }

    /// Whether `field` appears anywhere in the error path.
    pub fn touches_field(&self, field: &str) -> bool {
        self.path.iter().any(|segment| segment.as_str() == Some(field))
    }
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to fetch data: {status} ({message})")]
    Transport { status: u16, message: String },

    #[error("Errors in response: {}", join_messages(.0))]
    Api(Vec<GraphQlError>),

    #[error("Not found or malformed response: {0}")]
    NotFoundOrMalformed(String),

    #[error("Invalid input: {0}")]
    InputFormat(String),

    #[error("No GitHub token configured; set GITHUB_TOKEN to authenticate requests")]
    MissingCredential,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

impl From<octocrab::Error> for DashboardError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => DashboardError::Transport {
                status: source.status_code.as_u16(),
                message: source.message.clone(),
            },
            other => DashboardError::Request(describe_error(&other)),
        }
    }
}

/// One-line description built from an error's source chain.
///
/// octocrab appends a backtrace to its own `Display`, so only the first line
/// of each message is kept and the underlying causes are preferred.
pub fn describe_error(err: &(dyn std::error::Error + 'static)) -> String {
    let mut causes = Vec::new();
    let mut current = err.source();
    while let Some(cause) = current {
        let line = first_line(&cause.to_string());
        if !line.is_empty() && !causes.contains(&line) {
            causes.push(line);
        }
        current = cause.source();
    }

    if causes.is_empty() {
        first_line(&err.to_string())
    } else {
        causes.join(": ")
    }
}

fn first_line(s: &str) -> String {
    s.lines().next().unwrap_or_default().trim().to_string()
}

fn join_messages(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| match &e.kind {
            Some(kind) => format!("[{}] {}", kind, e.message),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
