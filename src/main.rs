use clap::Parser;
use mediasweep::cli::{Cli, run_cli};
use mediasweep::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Failed entries are reported, not fatal; only bad configuration fails the run.
    match run_cli(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e);
            ExitCode::FAILURE
        }
    }
}
