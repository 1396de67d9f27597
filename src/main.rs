#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use std::{io, process::ExitCode};

use chess960::{config::Args, repl::repl};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<ExitCode> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log))
        .with_writer(io::stderr)
        .init();

    let start = match args.start_position() {
        Ok(start) => start,
        Err(err) => {
            eprintln!("Error: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };
    let (id, arrangement) = match start.arrangement() {
        Ok(start) => start,
        Err(err) => {
            eprintln!("Error: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };
    info!(?start, id, %arrangement, "starting");
    repl(args.view, id, arrangement)?;
    Ok(ExitCode::SUCCESS)
}
