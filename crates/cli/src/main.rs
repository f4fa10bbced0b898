//! Co-simulation handoff CLI.
//!
//! This binary exercises the handoff and schedule tooling outside a full simulator.
//! It provides:
//! 1. **Host:** Create a semaphore pair as the RTL side and alternate with a peer.
//! 2. **Peer:** Attach to an announced pair as the reference side and alternate.
//! 3. **Schedule:** Validate an interrupt schedule file and print it normalized.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use cosim_core::config::Config;
use cosim_core::interrupt::InterruptSchedule;
use cosim_core::sync::{Role, SyncCoordinator, SyncKey, SysV, TrialPaths};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cosim",
    author,
    version,
    about = "Lock-step co-simulation handoff tooling",
    long_about = "Create or attach to a trial's semaphore pair and alternate control, or validate interrupt schedules.\n\nExamples:\n  cosim host --output /tmp/run7 --rounds 10\n  cosim peer --key 0x1234 --output /tmp/run7 --rounds 10\n  cosim schedule /tmp/run7/.input_0.isa.intr"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a pair as the RTL side, print its key, and alternate with the peer.
    Host {
        /// Trial output directory. Defaults to `general.output_dir` from the config.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of handoffs to perform.
        #[arg(short, long, default_value_t = 1)]
        rounds: u64,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Attach to an announced pair as the reference side and alternate.
    Peer {
        /// Base key printed by `cosim host` (decimal or 0x-prefixed hex).
        #[arg(short, long, value_parser = parse_key)]
        key: SyncKey,

        /// Trial output directory.
        #[arg(short, long)]
        output: PathBuf,

        /// Number of handoffs to perform.
        #[arg(short, long, default_value_t = 1)]
        rounds: u64,
    },

    /// Validate an interrupt schedule file and print it in normalized form.
    Schedule {
        /// Schedule file path.
        path: PathBuf,
    },
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Host {
            output,
            rounds,
            config,
        } => cmd_host(output.as_deref(), rounds, config.as_deref()),
        Commands::Peer {
            key,
            output,
            rounds,
        } => cmd_peer(key, &output, rounds),
        Commands::Schedule { path } => cmd_schedule(&path),
    };

    if let Err(err) = result {
        eprintln!("\n[!] FATAL: {err}");
        process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Parses a semaphore key given as decimal or `0x`-prefixed hex.
fn parse_key(text: &str) -> Result<SyncKey, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => i32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed
        .map(SyncKey)
        .map_err(|e| format!("invalid key `{text}`: {e}"))
}

/// Loads the JSON config at `path`, or the defaults.
fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("could not read config {}: {e}", path.display()))?;
            Ok(Config::from_json(&text)?)
        }
        None => Ok(Config::default()),
    }
}

/// Creates the pair, announces it on stdout, and runs `rounds` handoffs as the RTL side.
///
/// The RTL side runs first: each round it takes its turn, then yields to the peer
/// and waits for it to yield back. The pair is removed on return.
fn cmd_host(output: Option<&Path>, rounds: u64, config: Option<&Path>) -> CliResult {
    let config = load_config(config)?;
    let paths = TrialPaths::resolve(output, &config.general)?;
    let coordinator = SyncCoordinator::create(&SysV, paths, &config.sync)?;

    println!("[*] Key: {} ({})", coordinator.key(), coordinator.key().raw());
    println!("    program:   {}", coordinator.target_program_path().display());
    println!("    signature: {}", coordinator.signature_file_path().display());
    std::io::stdout().flush()?;

    for round in 1..=rounds {
        info!(round, role = %Role::Rtl, "turn");
        coordinator.yield_control()?;
    }

    coordinator.close()?;
    println!("[*] Done after {rounds} rounds");
    Ok(())
}

/// Attaches as the reference side and runs `rounds` handoffs.
///
/// Waits for the host's first yield, then alternates. The final turn releases the
/// host without waiting, so both sides finish after the same number of rounds.
fn cmd_peer(key: SyncKey, output: &Path, rounds: u64) -> CliResult {
    let paths = TrialPaths::new(output)?;
    let coordinator = SyncCoordinator::attach(&SysV, key, Role::Reference, paths)?;

    if rounds > 0 {
        coordinator.wait_turn()?;
    }
    for round in 1..=rounds {
        info!(round, role = %Role::Reference, "turn");
        if round == rounds {
            coordinator.release()?;
        } else {
            coordinator.yield_control()?;
        }
    }

    println!("[*] Done after {rounds} rounds");
    Ok(())
}

/// Loads a schedule and prints it normalized, with a summary on stderr.
fn cmd_schedule(path: &Path) -> CliResult {
    let schedule = InterruptSchedule::load(path)?;
    print!("{schedule}");
    eprintln!("[*] {} entries in {}", schedule.len(), path.display());
    Ok(())
}
