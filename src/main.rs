use clap::Parser;
use fluxo::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
