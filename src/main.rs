//! Cadence CLI
//!
//! Trains and verifies keystroke rhythm patterns from recorded keystroke logs.
//!
//! Exit codes: 0 on success or an accepted verification, 1 when a
//! verification is rejected, 2 on any error.

use cadence_tracker::{
    capture::{parse_log, KeyFeed},
    config::Config,
    core::{CadenceSummary, CadenceTracker},
    store::{PatternStore, StoredPattern},
    transparency::{create_shared_log_with_persistence, SharedTransparencyLog},
    VERSION,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status for a rejected verification.
const EXIT_REJECTED: u8 = 1;
/// Exit status for bad input, missing patterns and I/O failures.
const EXIT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(version = VERSION)]
#[command(about = "Keystroke rhythm training and verification", long_about = None)]
struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a named pattern from a keystroke log
    Train {
        /// Pattern name
        name: String,

        /// Keystroke log (`<millis> <key>` per line), or `-` for stdin
        #[arg(long, short, default_value = "-")]
        input: String,

        /// Tolerance to store with the pattern (milliseconds)
        #[arg(long)]
        tolerance: Option<u64>,
    },

    /// Verify a keystroke log against a trained pattern
    Verify {
        /// Pattern name
        name: String,

        /// Keystroke log (`<millis> <key>` per line), or `-` for stdin
        #[arg(long, short, default_value = "-")]
        input: String,

        /// Tolerance in milliseconds (overrides the stored one)
        #[arg(long)]
        tolerance: Option<u64>,

        /// Print which keystrokes did not match
        #[arg(long)]
        explain: bool,
    },

    /// Show a trained pattern
    Show {
        /// Pattern name
        name: String,
    },

    /// List trained patterns
    List,

    /// Delete a trained pattern
    Forget {
        /// Pattern name
        name: String,
    },

    /// Show collection statistics
    Status {
        /// Zero the persisted counters
        #[arg(long)]
        reset: bool,
    },

    /// Show configuration, optionally updating it
    Config {
        /// Set the default tolerance (milliseconds)
        #[arg(long)]
        tolerance: Option<u64>,

        /// Clamp negative gaps from out-of-order timestamps to zero
        #[arg(long)]
        clamp_negative_deltas: Option<bool>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config {config_path:?}: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let result = match cli.command {
        Commands::Train {
            name,
            input,
            tolerance,
        } => cmd_train(&config, &name, &input, tolerance),
        Commands::Verify {
            name,
            input,
            tolerance,
            explain,
        } => cmd_verify(&config, &name, &input, tolerance, explain),
        Commands::Show { name } => cmd_show(&config, &name),
        Commands::List => cmd_list(&config),
        Commands::Forget { name } => cmd_forget(&config, &name),
        Commands::Status { reset } => cmd_status(&config, reset),
        Commands::Config {
            tolerance,
            clamp_negative_deltas,
        } => cmd_config(config, &config_path, tolerance, clamp_negative_deltas),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

type CmdResult = Result<ExitCode, Box<dyn std::error::Error>>;

fn cmd_train(config: &Config, name: &str, input: &str, tolerance: Option<u64>) -> CmdResult {
    let transparency = open_transparency(config);
    let tracker = replay_into_tracker(config, input, &transparency)?;
    if tracker.is_empty() {
        return Err("keystroke log contains no key presses".into());
    }

    config.ensure_directories()?;
    let store = PatternStore::new(&config.patterns_path);
    let stored = StoredPattern::new(name, tracker.train()).with_tolerance(tolerance);
    let path = store.save(&stored)?;
    transparency.record_pattern_trained();
    save_transparency(&transparency);

    println!(
        "Trained '{}' from {} keystrokes ({:?})",
        name,
        stored.pattern.len(),
        path
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_verify(
    config: &Config,
    name: &str,
    input: &str,
    tolerance: Option<u64>,
    explain: bool,
) -> CmdResult {
    let store = PatternStore::new(&config.patterns_path);
    let stored = store.load(name)?;
    let tolerance = stored.effective_tolerance(tolerance, config);

    let transparency = open_transparency(config);
    let tracker = replay_into_tracker(config, input, &transparency)?;

    let accepted = tracker.verify_within(&stored.pattern, tolerance);
    transparency.record_verification(accepted);
    save_transparency(&transparency);

    if explain {
        println!("{}", tracker.report(&stored.pattern, tolerance));
    } else if accepted {
        println!("match");
    } else {
        println!("no match");
    }

    Ok(if accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_REJECTED)
    })
}

fn cmd_show(config: &Config, name: &str) -> CmdResult {
    let stored = PatternStore::new(&config.patterns_path).load(name)?;
    let summary = CadenceSummary::from_pattern(&stored.pattern);

    println!("Pattern '{}'", stored.name);
    println!("  Id: {}", stored.id);
    println!("  Trained: {}", stored.trained_at.format("%Y-%m-%d %H:%M:%S UTC"));
    match stored.tolerance_ms {
        Some(t) => println!("  Tolerance: {t}ms"),
        None => println!("  Tolerance: {}ms (config default)", config.default_tolerance_ms),
    }
    println!();
    println!("  #    key          gap");
    for (i, event) in stored.pattern.iter().enumerate() {
        println!("  {:<4} {:<12} {}ms", i, event.key, event.time_diff);
    }
    println!();
    println!("  Keystrokes: {}", summary.keystrokes);
    println!("  Typed span: {}ms", summary.total_ms);
    println!(
        "  Mean gap: {:.1}ms (std dev {:.1}ms, range {}-{}ms)",
        summary.mean_gap_ms, summary.gap_std_dev_ms, summary.min_gap_ms, summary.max_gap_ms
    );
    println!("  Rate: {:.2} keys/s", summary.keys_per_second());
    Ok(ExitCode::SUCCESS)
}

fn cmd_list(config: &Config) -> CmdResult {
    let names = PatternStore::new(&config.patterns_path).list()?;
    if names.is_empty() {
        println!("No trained patterns in {:?}", config.patterns_path);
        println!("Run 'cadence train <name> --input <log>' to create one.");
    }
    for name in names {
        println!("{name}");
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_forget(config: &Config, name: &str) -> CmdResult {
    PatternStore::new(&config.patterns_path).remove(name)?;
    println!("Forgot '{name}'");
    Ok(ExitCode::SUCCESS)
}

fn cmd_status(config: &Config, reset: bool) -> CmdResult {
    let path = config.transparency_path();
    if !path.exists() {
        println!("No previous session data found.");
        return Ok(ExitCode::SUCCESS);
    }

    let transparency = create_shared_log_with_persistence(path);
    if reset {
        transparency.reset();
        transparency.save()?;
        println!("Statistics reset.");
        println!();
    }
    println!("{}", transparency.summary());
    Ok(ExitCode::SUCCESS)
}

fn cmd_config(
    mut config: Config,
    path: &Path,
    tolerance: Option<u64>,
    clamp_negative_deltas: Option<bool>,
) -> CmdResult {
    if tolerance.is_some() || clamp_negative_deltas.is_some() {
        if let Some(t) = tolerance {
            config.default_tolerance_ms = t;
        }
        if let Some(clamp) = clamp_negative_deltas {
            config.clamp_negative_deltas = clamp;
        }
        config.save_to(path)?;
        println!("Configuration saved.");
        println!();
    }

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {path:?}");
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(ExitCode::SUCCESS)
}

/// Read a keystroke log and record it into a fresh tracker through a feed.
fn replay_into_tracker(
    config: &Config,
    input: &str,
    transparency: &SharedTransparencyLog,
) -> Result<CadenceTracker, Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let start = Utc::now();
    let presses = parse_log(&text, start)?;

    let feed = KeyFeed::with_capacity(presses.len().max(1));
    let sender = feed.sender();
    for press in presses {
        sender.send(press)?;
    }

    let mut tracker =
        CadenceTracker::starting_at(start).clamp_negative_deltas(config.clamp_negative_deltas);
    let recorded = feed.drain_into(&mut tracker);
    transparency.record_keystrokes(recorded as u64);
    Ok(tracker)
}

fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
    }
}

fn open_transparency(config: &Config) -> SharedTransparencyLog {
    create_shared_log_with_persistence(config.transparency_path())
}

fn save_transparency(transparency: &SharedTransparencyLog) {
    if let Err(e) = transparency.save() {
        tracing::warn!("Could not save transparency log: {e}");
    }
}
