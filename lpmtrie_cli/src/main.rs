mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use commands::{cmd_count, cmd_lookup};

#[derive(Parser)]
#[command(name = "lpmtrie")]
#[command(
    about = "Longest-prefix matching of IPv4 addresses against a prefix table",
    long_about = "lpmtrie - Longest-prefix matching of IPv4 addresses against a prefix table\n\n\
    The prefix table holds one A.B.C.D/M record per line. Measurement files hold\n\
    one `A.B.C.D S` record per line, where S is 1 for an active address.\n\n\
    Examples:\n\
      lpmtrie lookup prefixes.txt 112.229.75.52 29.171.113.167\n\
      lpmtrie count prefixes.txt measurements.txt"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the longest matching prefix for each address ("-" when none)
    Lookup {
        /// Prefix table (one A.B.C.D/M per line)
        #[arg(value_name = "PREFIXES")]
        prefixes: PathBuf,

        /// Dotted-quad addresses to classify
        #[arg(value_name = "ADDR", required = true)]
        addrs: Vec<String>,
    },

    /// Count reachable and active-but-unreachable addresses in a measurement file
    Count {
        /// Prefix table (one A.B.C.D/M per line)
        #[arg(value_name = "PREFIXES")]
        prefixes: PathBuf,

        /// Measurement file (one `A.B.C.D S` per line)
        #[arg(value_name = "MEASUREMENTS")]
        measurements: PathBuf,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Lookup { prefixes, addrs } => cmd_lookup(prefixes, addrs),
        Commands::Count {
            prefixes,
            measurements,
        } => cmd_count(prefixes, measurements),
    }
}

/// Exit status: the core error code when one is in the chain, 1 otherwise.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<lpmtrie_core::Error>())
        .map(|e| e.code() as u8)
        .unwrap_or(1)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}
