use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use fount_core::FountError;

mod ops;
mod stream;

#[derive(Parser)]
#[command(name = "fount-tool", version, about = "Precoded LT fountain encode/decode")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Split a file into symbols and write a unit stream.
    Encode {
        #[arg(long)] input: PathBuf,
        #[arg(long)] output: PathBuf,
        #[arg(long, default_value_t = 64)] symbol_len: usize,
        /// Units to emit. Defaults to 1.5 x (K + P).
        #[arg(long)] count: Option<usize>,
        #[arg(long, default_value_t = 3)] parity: usize,
        /// Precode graph seed, shared with the decoder through the header.
        #[arg(long, default_value_t = 0)] seed: u64,
        /// Seed for the unit stream itself. Fresh entropy if omitted.
        #[arg(long)] stream_seed: Option<u64>,
    },
    /// Rebuild the file from a unit stream.
    Decode {
        #[arg(long)] input: PathBuf,
        #[arg(long)] output: PathBuf,
        /// Solve by elimination instead of peeling plus repair.
        #[arg(long)] exact: bool,
    },
    /// Print the header and a degree histogram.
    Inspect {
        #[arg(long)] input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Encode { input, output, symbol_len, count, parity, seed, stream_seed } => {
            let opts = ops::EncodeOpts { symbol_len, count, parity, seed, stream_seed };
            let count = ops::encode_file(&input, &output, &opts)?;
            println!("{} {} units to {}", "encoded".green(), count, output.display());
        }

        Cmd::Decode { input, output, exact } => match ops::decode_file(&input, &output, exact) {
            Ok(k) => println!("{} {} sources to {}", "recovered".green(), k, output.display()),
            Err(err) => {
                if matches!(
                    err.downcast_ref::<FountError>(),
                    Some(
                        FountError::DecodeStalled { .. }
                            | FountError::PrecodeExhausted { .. }
                            | FountError::RankDeficient { .. }
                    )
                ) {
                    println!("{} {:#}", "partial".red(), err);
                }
                return Err(err);
            }
        },

        Cmd::Inspect { input } => {
            let summary = ops::inspect_file(&input)?;
            let h = &summary.header;
            println!(
                "K={} P={} symbol_len={} degrees=[{}, {}] seed={} count={}",
                h.k, h.p, h.symbol_len, h.min_degree, h.max_degree, h.seed, h.count
            );
            println!(
                "units={} mean_degree={:.2} histogram={:?}",
                summary.units, summary.mean_degree, summary.histogram
            );
        }
    }

    Ok(())
}
