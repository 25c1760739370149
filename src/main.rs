//! Start page dashboard - a personal start page backed by a caching proxy
//!
//! `startpage serve` runs the backend that the browser front-end talks to;
//! `show`, `settings` and `search` use the same dashboard model from a terminal.

use std::process::ExitCode;

use chrono::Local;
use clap::Parser;

use startpage::cli::{Cli, Command, SettingsArgs};
use startpage::config::ServerConfig;
use startpage::dashboard::{render_text, DashboardClient, DashboardModel, SettingsStore};
use startpage::logging;
use startpage::server::{AppState, DashboardServer};

/// Settings store in the user's data directory, or the working directory as a fallback
fn settings_store() -> SettingsStore {
    SettingsStore::new().unwrap_or_else(|| SettingsStore::with_dir(".".into()))
}

async fn serve(args: &startpage::cli::ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_args(args)?;
    let state = AppState::from_config(&config)?;
    let server = DashboardServer::new(state, config.public_dir.clone());

    server.run(&config.addr.to_string()).await?;
    Ok(())
}

async fn show(server: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut model = DashboardModel::load(&settings_store());
    let client = DashboardClient::new(server);

    for (topic, error) in client.refresh(&mut model).await {
        tracing::warn!(?topic, error = %error, "could not refresh");
    }

    println!("{}", render_text(&model, Local::now().time()));
    Ok(())
}

fn settings(args: &SettingsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = settings_store();
    let mut model = DashboardModel::load(&store);

    if args.has_changes() {
        let updated = args.apply(model.settings())?;
        model.update_settings(updated);
        model.save(&store)?;
    }

    println!("{}", serde_json::to_string_pretty(model.settings())?);
    Ok(())
}

fn search(query: &[String]) {
    let settings = settings_store().load();
    println!("{}", settings.search_engine.search_url(&query.join(" ")));
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Command::Serve(_) => "info",
        _ => "warn",
    };
    if let Err(e) = logging::init(default_level) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = match &cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Show { server } => show(server).await,
        Command::Settings(args) => settings(args),
        Command::Search { query } => {
            search(query);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
