//! Implied Move CLI
//!
//! Prompts for a ticker, then prints call/put implied volatility, the current
//! price and the expected move to the nearest expiration.
//!
//! Logs go to stderr; set RUST_LOG=info (or debug) to see them.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use implied_move::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> MoveResult<()> {
    let symbol = prompt_symbol()?;

    let yahoo = YahooClient::new()?;
    let now = chrono::Local::now().naive_local();
    let analysis = analyze(&yahoo, &symbol, &ImpliedVolSolver::default(), now)?;

    for line in analysis.report_lines() {
        println!("{line}");
    }
    Ok(())
}

fn prompt_symbol() -> MoveResult<String> {
    let mut stdout = io::stdout();
    write!(stdout, "Stock symbol:")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let symbol = line.trim().to_string();
    if symbol.is_empty() {
        return Err(MoveError::invalid_input("no stock symbol entered"));
    }
    Ok(symbol)
}
