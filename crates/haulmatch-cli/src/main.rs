//! Haulmatch - load-vehicle compatibility matching for a freight marketplace
//!
//! A CLI for the admin back office and vehicle owners: match loads to
//! vehicles, confirm assignments, and track commission.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
