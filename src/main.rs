use clap::Parser;
use rsitrader::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
