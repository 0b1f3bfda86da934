use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use repo_dashboard::app;
use repo_dashboard::campaign::CampaignStore;
use repo_dashboard::cli::{CampaignAction, Cli, Command};
use repo_dashboard::config::AppConfig;
use repo_dashboard::github::GitHubClient;
use repo_dashboard::render;
use repo_dashboard::shell::Session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repo_dashboard=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Invalid configuration in environment")?;
    if let Some(path) = cli.campaign {
        config.campaign_path = path;
    }

    // Requests will fail without a token, but the dashboard stays usable.
    if let Err(e) = config.token() {
        tracing::warn!("{}", e);
        eprintln!("{} {}", "Warning:".yellow().bold(), e.to_string().yellow());
    }

    let client = GitHubClient::new(&config).context("Failed to build GitHub client")?;
    let mut store = CampaignStore::load(&config.campaign_path).with_context(|| {
        format!("Failed to load campaign from {}", config.campaign_path.display())
    })?;

    let outcome = match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            Session::new(&client, &mut store).run().await?;
            Ok(())
        }
        Command::Repo { repository, add } => {
            run_repo(&client, &mut store, &repository, add).await
        }
        Command::User { username } => app::search_developer(&client, &username)
            .await
            .map(|repos| print!("{}", render::render_user_repositories(&username, &repos))),
        Command::Campaign { action } => run_campaign(&mut store, action),
    };

    if let Err(e) = outcome {
        eprintln!("{}", e.to_string().red());
        std::process::exit(1);
    }

    Ok(())
}

async fn run_repo(
    client: &GitHubClient,
    store: &mut CampaignStore,
    repository: &str,
    add: bool,
) -> repo_dashboard::Result<()> {
    let result = app::search_repository(client, repository).await?;
    print!("{}", result.render());

    if add {
        let name = app::add_to_campaign(store, &result)?.full_name();
        println!(
            "{} {} ({} in campaign)",
            "Added".green(),
            name,
            store.len()
        );
    }
    Ok(())
}

fn run_campaign(store: &mut CampaignStore, action: CampaignAction) -> repo_dashboard::Result<()> {
    match action {
        CampaignAction::Show => print!("{}", app::show_campaign(store)),
        CampaignAction::Compare => print!("{}", app::compare_campaign(store)),
        CampaignAction::Clear => {
            app::clear_campaign(store)?;
            println!("{}", "Campaign cleared.".green());
        }
        CampaignAction::Export { output } => {
            match app::export_campaign(store, output.as_deref())? {
                Some(csv) => print!("{}", csv),
                None => eprintln!(
                    "{} {} entries",
                    "Exported".green(),
                    store.len()
                ),
            }
        }
    }
    Ok(())
}
