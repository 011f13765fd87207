//! Role Ledger CLI
//!
//! Runs round selections against a persisted ledger and inspects rotations.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use role_core::{RoleId, SelectionConfig, SelectionOptions, TicketStore, DEFAULT_TICKETS};
#[cfg(feature = "cli")]
use role_ledger::{Ledger, RoundReport};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "role_ledger")]
#[command(about = "Run round-start role selection against a ticket ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Select roles for a roster and update the ledger
    Select {
        /// Roster JSON file (array of player profiles)
        #[arg(long)]
        roster: PathBuf,

        /// Ledger file path (created if missing)
        #[arg(long)]
        ledger: PathBuf,

        /// Selection config (JSON or YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// RNG seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Team queue override
        #[arg(long)]
        queue: Option<String>,

        /// Spawn every SCP slot regardless of the cap
        #[arg(long, default_value = "false")]
        allow_overflow: bool,

        /// Do not write the ledger back
        #[arg(long, default_value = "false")]
        dry_run: bool,

        /// Output report JSON file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show how a team queue sizes a round
    Queue {
        /// Team queue (default rotation if omitted)
        #[arg(long)]
        queue: Option<String>,

        /// Eligible player count
        #[arg(long)]
        players: usize,

        /// SCP cap
        #[arg(long, default_value_t = role_core::DEFAULT_MAX_SPAWNABLE_SCPS)]
        max_scps: usize,

        #[arg(long, default_value = "false")]
        allow_overflow: bool,
    },

    /// Print or edit ticket counts
    Tickets {
        /// Ledger file path
        #[arg(long)]
        ledger: PathBuf,

        /// Set tickets, e.g. --set 12=20
        #[arg(long, value_parser = parse_ticket_override)]
        set: Vec<(u32, i32)>,
    },
}

#[cfg(feature = "cli")]
fn parse_ticket_override(arg: &str) -> std::result::Result<(u32, i32), String> {
    let (id, value) = arg.split_once('=').ok_or_else(|| format!("expected ID=VALUE, got {arg:?}"))?;
    let id = id.trim().parse().map_err(|e| format!("invalid player id {id:?}: {e}"))?;
    let value = value.trim().parse().map_err(|e| format!("invalid ticket value {value:?}: {e}"))?;
    Ok((id, value))
}

#[cfg(feature = "cli")]
fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr).compact())
        .init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Select { roster, ledger, config, seed, queue, allow_overflow, dry_run, out } => {
            let mut config = match config {
                Some(path) => role_ledger::load_config(&path)
                    .with_context(|| format!("Failed to load config: {}", path.display()))?,
                None => SelectionConfig::default(),
            };
            if let Some(queue) = queue {
                config.team_queue = queue;
            }
            if allow_overflow {
                config.options.insert(SelectionOptions::ALLOW_SCP_OVERFLOW);
            }

            let players = role_ledger::load_roster(&roster)
                .with_context(|| format!("Failed to read roster: {}", roster.display()))?;
            let mut book = Ledger::load_or_default(&ledger)
                .with_context(|| format!("Failed to load ledger: {}", ledger.display()))?;

            let seed = seed.unwrap_or_else(rand::random);
            tracing::info!(seed, players = players.len(), queue = %config.team_queue, "selecting roles");

            let report = role_ledger::run_round(&mut book, &players, &config, seed)?;
            print_report(&report);

            if dry_run {
                println!("\n(dry run, ledger not written)");
            } else {
                let meta = book.save(&ledger)?;
                println!("\nLedger saved to {} ({} players)", ledger.display(), meta.players);
                println!("   Checksum: {}", meta.checksum);
            }

            if let Some(out) = out {
                save_json(&out, &report)?;
            }
        }

        Commands::Queue { queue, players, max_scps, allow_overflow } => {
            let source = queue.unwrap_or_else(|| role_core::DEFAULT_TEAM_QUEUE.to_string());
            let preview = role_ledger::preview_queue(&source, players, max_scps, allow_overflow);

            println!("Queue:   {}", preview.queue.to_queue_string());
            if !preview.queue.skipped.is_empty() {
                println!("Skipped: {:?}", preview.queue.skipped);
            }
            println!("Players: {}", preview.players);
            println!("SCPs:    {}", preview.estimate.spawn_scp_count);
            for (role, count) in &preview.human_roles {
                println!("   {:<18} {}", role.to_string(), count);
            }
            if preview.estimate.scps_overflowing {
                println!(
                    "Overflow: yes (hume shield x{:.2})",
                    preview.estimate.hume_shield_multiplier
                );
            }
        }

        Commands::Tickets { ledger, set } => {
            let mut book = Ledger::load_or_default(&ledger)
                .with_context(|| format!("Failed to load ledger: {}", ledger.display()))?;

            for (id, value) in &set {
                book.tickets.modify_tickets(role_core::PlayerId(*id), *value);
            }

            println!("{:<10} {:>8}", "Player", "Tickets");
            for (id, value) in book.tickets.iter() {
                println!("{:<10} {:>8}", id.to_string(), value);
            }
            println!("(players not listed have {} tickets)", DEFAULT_TICKETS);

            if !set.is_empty() {
                book.save(&ledger)?;
                println!("\nLedger saved to {}", ledger.display());
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_report(report: &RoundReport) {
    println!("Round seed {}", report.seed);
    for (id, role) in &report.assignments {
        println!("   {:<10} {}", id.to_string(), role);
    }

    println!("\nSCPs:      {}", report.scp_count());
    for role in [RoleId::ClassD, RoleId::Scientist, RoleId::FacilityGuard, RoleId::ChaosConscript] {
        let count = report.count(role);
        if count > 0 {
            println!("{:<10} {}", format!("{}:", role), count);
        }
    }
    if report.result.scps_overflowing() {
        println!("Overflow:  hume shield x{:.2}", report.result.hume_shield_multiplier());
    }
}

#[cfg(feature = "cli")]
fn save_json(path: &Path, report: &RoundReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    println!("\nReport saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("role_ledger CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
