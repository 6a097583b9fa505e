use anyhow::{Context, Result};
use clap::Parser;
use ripple_logic::{parse, run, Complement};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Adds or subtracts two bytes on a gate-level ripple-carry circuit.
#[derive(Parser)]
#[command(name = "ripple-logic")]
#[command(version)]
struct Cli {
    /// Expression such as "00000100 - 00000001", "0b101 + 3" or "200 + 100"
    expr: String,
    /// Subtract without the carry-in at bit 0 (result is one short)
    #[arg(long)]
    ones_complement: bool,
    /// Log circuit construction
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = parse(&cli.expr).with_context(|| format!("invalid expression {:?}", cli.expr))?;
    let complement = if cli.ones_complement {
        Complement::Ones
    } else {
        Complement::Twos
    };
    debug!(?command, ?complement, "evaluating");

    println!("{}", run(command, complement)?);
    Ok(())
}
