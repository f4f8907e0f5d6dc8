use clap::Parser;

use covercall::cli::{Cli, Command};
use covercall::{catalog, scan};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan {
            catalog,
            token_file,
            output,
            universe,
        } => scan::run(&scan::ScanConfig {
            catalog,
            token_file,
            output,
            universe,
        }),
        Command::FetchInstruments { output } => catalog::run_fetch(&output),
    }
}
