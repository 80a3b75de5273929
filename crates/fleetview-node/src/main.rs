//! Fleetview Node - replays a fleet feed through the follow-heading pipeline
//!
//! This binary reads JSON-lines device and position events, maintains the
//! device directory and per-device headings, and writes every resulting
//! state change to stdout as JSON lines. Logs go to stderr.

mod messages;
mod session;

use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use fleetview_core::FleetConfig;
use messages::StateChange;
use session::Session;

#[derive(Parser)]
#[command(name = "fleetview-node")]
#[command(about = "Replay a fleet position feed through the follow-heading pipeline")]
struct Args {
    /// JSON-lines feed to replay (stdin when omitted)
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match args.config {
        Some(ref path) => FleetConfig::load(path)?,
        None => FleetConfig::default(),
    };

    // Initialize logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config.logging.level.into()
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let source = match args.input {
        Some(ref path) => path.display().to_string(),
        None => "stdin".to_string(),
    };
    info!("Replaying feed from {}", source);

    let reader: Box<dyn AsyncRead + Unpin + Send> = match args.input {
        Some(ref path) => Box::new(tokio::fs::File::open(path).await?),
        None => Box::new(tokio::io::stdin()),
    };

    // Printer task: the subscriber side of the session
    let (change_tx, mut change_rx) = mpsc::channel::<StateChange>(256);
    let printer = tokio::spawn(async move {
        while let Some(change) = change_rx.recv().await {
            match serde_json::to_string(&change) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Failed to encode state change: {}", e),
            }
        }
    });

    let mut session = Session::new(&config);
    let mut lines = BufReader::new(reader).lines();
    'feed: while let Some(line) = lines.next_line().await? {
        for change in session.handle_line(&line) {
            if change_tx.send(change).await.is_err() {
                warn!("Printer stopped; dropping the rest of the feed");
                break 'feed;
            }
        }
    }

    let stats = session.stats();
    info!(
        "Feed finished: {} events, {} positions, {} heading updates, {} rejected lines",
        stats.events, stats.positions, stats.heading_updates, stats.rejected_lines
    );
    info!(
        "Directory: {} devices, {} headings (version {})",
        session.directory().items().len(),
        session.directory().headings().len(),
        session.directory().version()
    );

    drop(change_tx);
    printer.await?;

    Ok(())
}
