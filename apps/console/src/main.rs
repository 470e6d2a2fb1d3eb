use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use catalog::Catalog;
use clap::Parser;
use session_core::{load_settings, load_settings_from, SessionHandle, SessionSettings};
use shared::{domain::Sender, protocol::SessionEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod controller;
mod render;

use controller::{
    events::{parse_command, ConsoleCommand, HELP},
    orchestration::{dispatch_view_event, status_for},
};

#[derive(Parser, Debug)]
#[command(name = "sommelier", about = "Wine detail screen with an assistant chat")]
struct Args {
    /// Settings file; defaults to ./sommelier.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Catalog JSON file (as written by `sommelier-tools export`).
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[arg(long)]
    reply_delay_ms: Option<u64>,
    /// Print session events as JSON lines instead of chat text.
    #[arg(long)]
    json_events: bool,
}

fn resolve_settings(args: &Args) -> Result<SessionSettings> {
    let mut settings = match &args.config {
        Some(path) => load_settings_from(Some(path.as_path()), |key| std::env::var(key).ok())
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => load_settings().context("failed to load settings")?,
    };
    if let Some(path) = &args.catalog {
        settings.catalog_path = Some(path.clone());
    }
    if let Some(delay) = args.reply_delay_ms {
        settings.reply_delay_ms = delay;
    }
    Ok(settings)
}

fn spawn_event_printer(session: &SessionHandle, json: bool) -> tokio::task::JoinHandle<()> {
    let mut events = session.subscribe_events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) if json => match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(err) => tracing::warn!("failed to encode session event: {err}"),
                },
                Ok(SessionEvent::MessageAppended { message })
                    if message.sender == Sender::Assistant =>
                {
                    println!("assistant: {}", message.text);
                }
                Ok(_) => {}
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event printer lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    let catalog = match &settings.catalog_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        None => Catalog::builtin(),
    };
    let catalog = Arc::new(catalog);

    let session = SessionHandle::new(Arc::clone(&catalog), settings);
    let printer = spawn_event_printer(&session, args.json_events);

    println!("{}", render::render_product(&session.product_detail_view().await));
    println!("{}", render::render_chat(&session.chat_panel_view().await));
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut status = String::new();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{}", status_for(&err));
                continue;
            }
        };

        match command {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Products => {
                for product in catalog.products() {
                    println!(
                        "#{} {} - {}",
                        product.id,
                        product.name,
                        session_core::view::price_label(product.price_cents)
                    );
                }
            }
            ConsoleCommand::Flush => {
                let delivered = session.flush_pending().await;
                println!("delivered {delivered} pending replies");
            }
            ConsoleCommand::Json => {
                let snapshot = session.snapshot().await;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            ConsoleCommand::Show => {
                let detail = session.product_detail_view().await;
                println!("{}", render::render_product(&detail));
                print!("{}", render::render_section_bodies(&detail, &catalog));
                println!("{}", render::render_chat(&session.chat_panel_view().await));
            }
            ConsoleCommand::View(event) => {
                dispatch_view_event(&session, event, &mut status).await;
                if !status.is_empty() {
                    println!("{status}");
                }
            }
        }
    }

    // Let replies that are already scheduled land before exiting.
    session.flush_pending().await;
    drop(session);
    if tokio::time::timeout(Duration::from_millis(200), printer)
        .await
        .is_err()
    {
        tracing::debug!("event printer still running at exit");
    }
    Ok(())
}
