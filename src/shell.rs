//! Interactive session: reads one command per line and runs it to completion
//! before reading the next. Failures are reported and the session continues.

use crate::app::{self, SearchResult};
use crate::campaign::CampaignStore;
use crate::error::{DashboardError, Result};
use crate::github::GitHubClient;
use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;

pub const HELP: &str = "\
Commands:
  search <owner/repo>   show repository details and metrics
  add                   add the last search result to the campaign
  user <username>       list a developer's repositories
  campaign              show the campaign table
  compare               compare campaign entries side by side
  clear                 remove every campaign entry
  export [path]         write the campaign as CSV (stdout without a path)
  help                  show this message
  quit                  leave the dashboard";

#[derive(Debug, PartialEq)]
pub enum ShellCommand {
    Search(String),
    Add,
    User(String),
    Campaign,
    Compare,
    Clear,
    Export(Option<PathBuf>),
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let argument = |what: &str| -> Result<String> {
            if rest.is_empty() {
                Err(DashboardError::InputFormat(format!("'{}' needs {}", word, what)))
            } else {
                Ok(rest.to_string())
            }
        };

        Ok(match word.to_ascii_lowercase().as_str() {
            "" => ShellCommand::Empty,
            "search" | "repo" => ShellCommand::Search(argument("a repository (owner/repo)")?),
            "add" => ShellCommand::Add,
            "user" => ShellCommand::User(argument("a username")?),
            "campaign" | "show" => ShellCommand::Campaign,
            "compare" => ShellCommand::Compare,
            "clear" => ShellCommand::Clear,
            "export" => ShellCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => {
                return Err(DashboardError::InputFormat(format!(
                    "unknown command '{}'; type 'help' for a list",
                    other
                )))
            }
        })
    }
}

/// Session state: the client, the campaign, and the most recent search result.
pub struct Session<'a> {
    client: &'a GitHubClient,
    store: &'a mut CampaignStore,
    last_result: Option<SearchResult>,
}

impl<'a> Session<'a> {
    pub fn new(client: &'a GitHubClient, store: &'a mut CampaignStore) -> Self {
        Self {
            client,
            store,
            last_result: None,
        }
    }

    /// Runs until `quit` or end of input.
    pub async fn run(&mut self) -> io::Result<()> {
        println!("{}", "GitHub Repository Dashboard".bold().green());
        println!("{}", HELP.dimmed());

        loop {
            print!("{} ", ">".cyan());
            io::stdout().flush()?;

            let mut line = String::new();
            if io::stdin().read_line(&mut line)? == 0 {
                break;
            }

            let command = match ShellCommand::parse(&line) {
                Ok(ShellCommand::Quit) => break,
                Ok(command) => command,
                Err(e) => {
                    eprintln!("{}", e.to_string().red());
                    continue;
                }
            };

            match self.execute(command).await {
                Ok(output) if !output.is_empty() => println!("{}", output),
                Ok(_) => {}
                Err(e) => eprintln!("{}", e.to_string().red()),
            }
        }
        Ok(())
    }

    /// Executes one command and returns the text to display.
    pub async fn execute(&mut self, command: ShellCommand) -> Result<String> {
        match command {
            ShellCommand::Search(input) => {
                let result = app::search_repository(self.client, &input).await?;
                let output = result.render();
                self.last_result = Some(result);
                Ok(output)
            }
            ShellCommand::Add => {
                let result = self.last_result.as_ref().ok_or_else(|| {
                    DashboardError::InputFormat("search for a repository before adding it".to_string())
                })?;
                let name = app::add_to_campaign(self.store, result)?.full_name();
                Ok(format!(
                    "{} {} ({} in campaign)",
                    "Added".green(),
                    name,
                    self.store.len()
                ))
            }
            ShellCommand::User(username) => {
                let repos = app::search_developer(self.client, &username).await?;
                Ok(crate::render::render_user_repositories(&username, &repos))
            }
            ShellCommand::Campaign => Ok(app::show_campaign(self.store)),
            ShellCommand::Compare => Ok(app::compare_campaign(self.store)),
            ShellCommand::Clear => {
                app::clear_campaign(self.store)?;
                Ok("Campaign cleared.".to_string())
            }
            ShellCommand::Export(path) => match app::export_campaign(self.store, path.as_deref())? {
                Some(csv) => Ok(csv),
                None => Ok(format!(
                    "Exported {} entries to {}",
                    self.store.len(),
                    path.unwrap_or_default().display()
                )),
            },
            ShellCommand::Help => Ok(HELP.to_string()),
            ShellCommand::Quit | ShellCommand::Empty => Ok(String::new()),
        }
    }
}
