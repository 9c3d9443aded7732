#![forbid(unsafe_code)]

//! tuiloop demo
//!
//! A grid of tiles. Arrow keys move focus, typing goes to the focused tile,
//! Enter clears it, Backspace deletes. Ctrl-D or Ctrl-C quits.
//!
//! # Running
//!
//! ```sh
//! cargo run -p tuiloop-demo
//! TUILOOP_INPUT=worker TUILOOP_LOG_FILE=/tmp/tuiloop.log cargo run -p tuiloop-demo
//! ```
//!
//! `TUILOOP_DEMO_GRID=COLSxROWS` changes the grid (default `3x3`).

mod board;

use std::io;

use tuiloop::prelude::*;
use tuiloop::{EXIT_IO, exit, logging};

use board::Board;

const DEFAULT_GRID: (usize, usize) = (3, 3);

fn grid_from_env() -> (usize, usize) {
    std::env::var("TUILOOP_DEMO_GRID")
        .ok()
        .and_then(|value| board::parse_grid(&value))
        .unwrap_or(DEFAULT_GRID)
}

fn main() {
    logging::init_from_env();
    let config = AppConfig::from_env();
    let (cols, rows) = grid_from_env();

    #[cfg(unix)]
    let host = match tuiloop::native::open(&config) {
        Ok(host) => host,
        Err(err) => {
            eprintln!("tuiloop-demo: cannot open terminal: {err}");
            std::process::exit(EXIT_IO);
        }
    };
    #[cfg(not(unix))]
    let host: Host = {
        eprintln!("tuiloop-demo: no native host on this platform");
        std::process::exit(EXIT_IO);
    };

    let board = Board::new(cols, rows, Box::new(io::stdout()));
    let app = match Application::new(host, Box::new(board), config) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("tuiloop-demo: {err}");
            std::process::exit(err.exit_code());
        }
    };
    tracing::info!(cols, rows, strategy = %app.strategy(), "demo starting");
    exit::run_and_exit(app);
}
