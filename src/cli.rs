use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Covered-call scanner — find the nearest out-of-the-money call per stock
/// per expiry and compute the yield of buying one lot and selling that call.
#[derive(Parser)]
#[command(name = "covercall", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan the derivatives universe and write a yield snapshot
    Scan {
        /// Path to the instrument catalog JSON file
        #[arg(long, default_value = "json/data.json")]
        catalog: PathBuf,

        /// Path to the access-token JSON file ({"access_token": "..."})
        #[arg(long, default_value = "json/token.json")]
        token_file: PathBuf,

        /// Output path for the snapshot document
        #[arg(long, short = 'o', default_value = "deploy.json")]
        output: PathBuf,

        /// Universe policy: "futures" (FUT-driven) or "calls" (CE-driven)
        #[arg(long, default_value = "futures")]
        universe: String,
    },

    /// Download the exchange's complete instrument master (gzipped JSON)
    FetchInstruments {
        /// Output path for the decompressed catalog JSON
        #[arg(long, default_value = "json/data.json")]
        output: PathBuf,
    },
}
