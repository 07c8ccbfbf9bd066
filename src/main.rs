use std::io;

mod cli;
mod commands;
mod display;
mod manager;
mod parser;
mod storage;
mod types;
mod utils;

use chrono::Local;
use commands::Session;
use display::{print_error, print_greeting, print_response};
use storage::FileStorage;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use utils::read_lossy_line;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    cli::build_cli().get_matches();

    let storage = match FileStorage::open_default() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open task storage: {}", e);
            return Ok(());
        }
    };
    info!(path = %storage.path().display(), "using task file");

    let mut session = Session::new(storage);

    print_greeting();
    if let Err(e) = session.load() {
        warn!(error = %e, "could not load saved tasks");
        print_response("Starting fresh (no saved tasks found).");
    }

    let mut stdin = io::stdin().lock();
    loop {
        let line = match read_lossy_line(&mut stdin) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "could not read input");
                break;
            }
        };
        match session.respond(&line, Local::now().date_naive()) {
            Ok(response) => {
                print_response(&response.text);
                if response.exit {
                    return Ok(());
                }
            }
            Err(e) => print_error(&e),
        }
    }

    print_response(&display::farewell());
    Ok(())
}
