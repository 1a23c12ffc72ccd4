use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use arena_core::{
    archive::{suggested_save_name, write_archive},
    ArenaClient, SessionOutcome, SessionState, SessionView, ViewRefresh,
};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use shared::protocol::DebateRequest;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::{load_settings, Settings};
use console::ConsoleView;

#[derive(Parser, Debug)]
#[command(name = "arena", about = "Run and watch multi-agent debates")]
struct Cli {
    /// Debate server base URL; overrides arena.toml and the environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a debate from a JSON request file and print it as it unfolds.
    Run(RunArgs),
    /// List the judge presets offered by the server.
    Judges,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(long)]
    request: PathBuf,
    /// Wait for the whole debate instead of streaming it.
    #[arg(long)]
    sync: bool,
    /// Save the finished debate on the server, optionally under NAME.
    #[arg(long, value_name = "NAME", num_args = 0..=1, default_missing_value = "")]
    save: Option<String>,
    /// Write the finished debate to the local archive directory.
    #[arg(long)]
    archive: bool,
    #[arg(long)]
    archive_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    let client = ArenaClient::new(&settings.server_url)?;

    match cli.command {
        Command::Run(args) => run(&client, &settings, args).await,
        Command::Judges => list_judges(&client).await,
    }
}

async fn run(client: &ArenaClient, settings: &Settings, args: RunArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.request)
        .with_context(|| format!("failed to read request file '{}'", args.request.display()))?;
    let request = serde_json::from_str::<DebateRequest>(&raw)
        .with_context(|| format!("invalid request file '{}'", args.request.display()))?
        .without_blank_judges();

    let mut view = ConsoleView::new(std::io::stdout());
    let state = if args.sync || !settings.stream {
        let state = client
            .run_debate_sync(&request)
            .await
            .context("debate did not complete")?;
        view.refresh(&state, ViewRefresh::ALL).await;
        view.completed(&state).await;
        state
    } else {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        match client
            .run_debate(&request, &mut view, cancel)
            .await
            .context("debate did not complete")?
        {
            SessionOutcome::Completed(state) => state,
            SessionOutcome::Cancelled(partial) => {
                info!(
                    turns = partial.map(|state| state.transcript.len()).unwrap_or_default(),
                    "debate cancelled"
                );
                return Ok(());
            }
        }
    };

    persist(client, settings, &args, &state).await
}

async fn persist(
    client: &ArenaClient,
    settings: &Settings,
    args: &RunArgs,
    state: &SessionState,
) -> Result<()> {
    let debate = state.to_response();
    let chosen_name = args
        .save
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    if args.save.is_some() {
        let filename = chosen_name
            .map(str::to_string)
            .unwrap_or_else(|| suggested_save_name(&debate.topic));
        let path = client
            .save_debate(&debate, Some(&filename))
            .await
            .context("failed to save debate on the server")?;
        println!("Saved on server: {path}");
    }

    if args.archive {
        let dir = args
            .archive_dir
            .clone()
            .unwrap_or_else(|| settings.archive_dir.clone());
        let path = write_archive(&dir, &debate, chosen_name, Utc::now())?;
        println!("Archived to {}", path.display());
    }
    Ok(())
}

async fn list_judges(client: &ArenaClient) -> Result<()> {
    let presets = client.judge_presets().await;
    if presets.is_empty() {
        println!("No judge presets available from {}", client.server_url());
        return Ok(());
    }
    for preset in presets {
        match &preset.persona {
            Some(persona) => println!("{} ({persona})  {}", preset.name, preset.endpoint),
            None => println!("{}  {}", preset.name, preset.endpoint),
        }
        if !preset.description.is_empty() {
            println!("    {}", preset.description);
        }
    }
    Ok(())
}
