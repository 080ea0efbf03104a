//! # sw-cli — sortwin on the command line
//!
//! - `sw stream`: running min/median/max over numbers read from stdin.
//! - `sw show`: print the sorted window after a list of pushes.
//! - `sw check`: replay random operations against the brute-force oracle.
//! - `sw verify`: run the Kani proofs.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tabled::{Table, Tabled};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod stream;

use config::Config;
use stream::Format;

/// Sorted sliding windows: running order statistics over the last N samples.
#[derive(Parser)]
#[command(name = "sw", version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, global = true, default_value = "sw.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print `value min median max` for every number in the input.
    Stream {
        /// Window capacity (overrides the config file).
        #[arg(long)]
        capacity: Option<usize>,

        /// Read from this file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Emit one JSON object per sample.
        #[arg(long)]
        json: bool,
    },

    /// Push VALUES and print the resulting window in sorted order.
    Show {
        /// Window capacity (overrides the config file).
        #[arg(long)]
        capacity: Option<usize>,

        #[arg(allow_negative_numbers = true, required = true)]
        values: Vec<f64>,
    },

    /// Replay random operations against the brute-force oracle.
    Check {
        #[arg(long, default_value_t = 16, value_parser = parse_check_capacity)]
        capacity: usize,

        /// Number of operations to replay.
        #[arg(long, default_value_t = 10_000)]
        ops: usize,

        /// Values are drawn from -SPREAD..=SPREAD; small spreads force ties.
        #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
        spread: i64,

        /// RNG seed (random when omitted).
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run Kani formal verification proofs.
    Verify,
}

/// Largest window `sw check` will replay; resizes go up to twice this.
const MAX_CHECK_CAPACITY: usize = 1 << 16;

fn parse_check_capacity(arg: &str) -> Result<usize, String> {
    let capacity: usize = arg.parse().map_err(|e| format!("{e}"))?;
    if capacity > MAX_CHECK_CAPACITY {
        return Err(format!("capacity must be at most {MAX_CHECK_CAPACITY}"));
    }
    Ok(capacity)
}

#[derive(Tabled)]
struct Row {
    rank: usize,
    value: f64,
    #[tabled(rename = "")]
    marker: &'static str,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "sw=info,sw_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Stream {
            capacity,
            input,
            json,
        } => {
            let capacity = capacity.unwrap_or(config.window.capacity);
            let format = if json || config.output.json {
                Format::Json
            } else {
                Format::Plain {
                    precision: config.output.precision,
                }
            };
            let mut window = stream::sample_window(capacity);
            tracing::info!(capacity, ?format, "streaming");

            let stdout = io::stdout().lock();
            let samples = match input {
                Some(path) => {
                    let file = File::open(&path)
                        .with_context(|| format!("failed to open {}", path.display()))?;
                    stream::run(BufReader::new(file), stdout, &mut window, format)?
                }
                None => stream::run(io::stdin().lock(), stdout, &mut window, format)?,
            };
            tracing::info!(samples, "done");
        }

        Commands::Show { capacity, values } => {
            let mut window = stream::sample_window(capacity.unwrap_or(config.window.capacity));
            window.extend(values);

            let median_rank = window.median_rank();
            let last = window.len().saturating_sub(1);
            let rows = window.iter().enumerate().map(|(rank, &value)| Row {
                rank,
                value,
                marker: match rank {
                    _ if Some(rank) == median_rank => "median",
                    0 => "min",
                    _ if rank == last => "max",
                    _ => "",
                },
            });
            println!("{}", Table::new(rows));
            println!("{} of {} slots used", window.len(), window.max_size());
        }

        Commands::Check {
            capacity,
            ops,
            spread,
            seed,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            tracing::info!(capacity, ops, spread, seed, "replaying against oracle");

            let mut rng = StdRng::seed_from_u64(seed);
            let ops = sw_verify::random_ops(&mut rng, ops, spread, capacity.saturating_mul(2));
            match sw_verify::replay(capacity, |a: &i64, b: &i64| a < b, &ops) {
                Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                Err(divergence) => {
                    tracing::error!(seed, %divergence, "window diverged from oracle");
                    bail!("divergence with seed {seed}: {divergence}");
                }
            }
        }

        Commands::Verify => {
            eprintln!("sortwin: running Kani proofs");
            let mut failed = Vec::new();
            for package in ["sw-verify", "sw-ring"] {
                let status = Command::new("cargo")
                    .args(["kani", "--package", package])
                    .status();
                match status {
                    Ok(status) if status.success() => eprintln!("   {package}: all proofs passed"),
                    Ok(_) => {
                        eprintln!("   {package}: proof failure");
                        failed.push(package);
                    }
                    Err(e) => {
                        eprintln!("   Kani not found: {e}");
                        eprintln!("   Install with: cargo install kani-verifier && cargo kani setup");
                        failed.push(package);
                    }
                }
            }
            if !failed.is_empty() {
                bail!("verification incomplete: {}", failed.join(", "));
            }
        }
    }

    Ok(())
}
