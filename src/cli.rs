use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "repo-dashboard")]
#[command(about = "Inspect GitHub repositories and compare them in a saved campaign")]
#[command(version)]
pub struct Cli {
    /// Campaign file; overrides CAMPAIGN_PATH
    #[arg(long, global = true)]
    pub campaign: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show details and metrics for a repository
    Repo {
        /// Repository in the form owner/repo
        repository: String,

        /// Also add the result to the campaign
        #[arg(long)]
        add: bool,
    },

    /// List a developer's repositories
    User {
        username: String,
    },

    /// Work with the saved campaign
    Campaign {
        #[command(subcommand)]
        action: CampaignAction,
    },

    /// Interactive session (default)
    Shell,
}

#[derive(Subcommand, Debug)]
pub enum CampaignAction {
    /// Print the campaign table
    Show,
    /// Bar charts comparing campaign entries
    Compare,
    /// Remove every entry
    Clear,
    /// Write the campaign as CSV
    Export {
        /// Output file; stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}
