//! CLI command implementations

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Subcommand;
use matchcaller_core::{
    MatchStore, ReplayConfig, ReplaySession, ReplaySubscriber, Snapshot, SubscriberFault,
    TimelineIndex, VisibleSet, list_snapshot_files,
};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Replay a captured snapshot against the terminal
    Run {
        /// Path to a captured tournament snapshot
        snapshot: PathBuf,
        /// Virtual-time multiplier on wall time
        #[arg(short, long, default_value = "60")]
        speed: f64,
        /// Wall-time milliseconds between ticks
        #[arg(long, default_value = "1000")]
        tick_interval_ms: u64,
    },
    /// Show metadata and timeline statistics for a snapshot
    Info {
        /// Path to a captured tournament snapshot
        snapshot: PathBuf,
    },
    /// List captured snapshots in a directory, newest first
    List {
        /// Directory holding tournament_*.json capture files
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            snapshot,
            speed,
            tick_interval_ms,
        } => run_replay(snapshot, speed, tick_interval_ms).await,
        Commands::Info { snapshot } => show_info(snapshot),
        Commands::List { dir } => list_snapshots(dir),
    }
}

/// Prints each tick's visible set, skipping ticks where nothing changed.
struct TickPrinter {
    last: Option<VisibleSet>,
}

impl ReplaySubscriber for TickPrinter {
    fn on_tick(
        &mut self,
        visible: &VisibleSet,
        virtual_now: Duration,
    ) -> Result<(), SubscriberFault> {
        if self.last.as_ref() == Some(visible) {
            return Ok(());
        }
        self.last = Some(visible.clone());

        println!();
        println!(
            "=== T+{} | {} matches on display ===",
            format_offset(virtual_now),
            visible.len()
        );

        let mut pools: BTreeMap<&str, Vec<_>> = BTreeMap::new();
        for entry in visible.iter() {
            pools.entry(entry.pool.as_str()).or_default().push(entry);
        }

        for (pool, entries) in pools {
            println!("  [{pool}]");
            for entry in entries {
                println!(
                    "    {:<11} {} — {} vs {}",
                    entry.classification.label(),
                    entry.display_name,
                    entry.player1,
                    entry.player2
                );
            }
        }

        Ok(())
    }
}

async fn run_replay(path: PathBuf, speed: f64, tick_interval_ms: u64) -> anyhow::Result<()> {
    let snapshot = Snapshot::load_file(&path)
        .with_context(|| format!("failed to load snapshot {}", path.display()))?;

    println!(
        "Replaying {} / {} at {speed}x",
        snapshot.metadata.tournament_name, snapshot.metadata.event_name
    );

    let store = Arc::new(MatchStore::load(snapshot).context("snapshot failed validation")?);
    println!(
        "{} matches, {} of recorded play",
        store.record_count(),
        format_offset(store.end_offset())
    );

    let session = ReplaySession::new(
        Arc::clone(&store),
        ReplayConfig {
            speed,
            tick_interval: Duration::from_millis(tick_interval_ms),
        },
    );
    let handle = session
        .start(TickPrinter { last: None })
        .context("failed to start replay")?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                handle.stop().await;
                println!("\nReplay stopped");
                return Ok(());
            }
            _ = tokio::time::sleep(Duration::from_millis(200)) => {
                if !handle.is_running() {
                    println!("\nReplay finished");
                    return Ok(());
                }
            }
        }
    }
}

fn show_info(path: PathBuf) -> anyhow::Result<()> {
    let snapshot = Snapshot::load_file(&path)
        .with_context(|| format!("failed to load snapshot {}", path.display()))?;

    println!("Tournament:  {}", snapshot.metadata.tournament_name);
    println!("Event:       {}", snapshot.metadata.event_name);
    if let Some(slug) = &snapshot.metadata.event_slug {
        println!("Slug:        {slug}");
    }
    if let Some(captured) = snapshot.metadata.captured_at() {
        println!("Captured:    {}", captured.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("Matches:     {}", snapshot.metadata.total_matches);
    println!("Duration:    {} minutes (nominal)", snapshot.duration_minutes);

    let store = MatchStore::load(snapshot).context("snapshot failed validation")?;
    let timeline = TimelineIndex::build(&store);
    println!("Transitions: {} distinct instants", timeline.len());
    println!("Replay span: {}", format_offset(store.end_offset()));

    Ok(())
}

fn list_snapshots(dir: PathBuf) -> anyhow::Result<()> {
    let listing = list_snapshot_files(&dir)
        .with_context(|| format!("failed to list snapshots in {}", dir.display()))?;

    if listing.is_empty() {
        println!("No capture files found in {}", dir.display());
        return Ok(());
    }

    for info in listing {
        let captured = info
            .metadata
            .captured_at()
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{:<19} {:>4} matches {:>5} min  {} — {}",
            captured,
            info.metadata.total_matches,
            info.duration_minutes,
            info.metadata.tournament_name,
            info.metadata.event_name
        );
    }

    Ok(())
}

/// Formats a virtual offset the way the display shows elapsed time.
fn format_offset(offset: Duration) -> String {
    let total = offset.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
