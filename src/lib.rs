pub mod app;
pub mod campaign;
pub mod cli;
pub mod config;
pub mod decode;
pub mod error;
pub mod export;
pub mod github;
pub mod metrics;
pub mod render;
pub mod shell;
pub mod types;

pub use error::{DashboardError, Result};
