//! Headless runner: line-delimited JSON over stdin/stdout.
//!
//! Each input line is one protocol message; every reply is written as one
//! line. Logs go to stderr (or `SHAPE_SNAP_LOG_PATH`).

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::{info, warn};

use shape_snap::adapter::{RuntimeConfig, Session};
use shape_snap::logging;

fn main() -> Result<()> {
    let config = RuntimeConfig::from_env();
    match &config.log_path {
        Some(path) => logging::init_file(path)?,
        None => logging::init_stderr()?,
    }

    let mut session = Session::from_config(&config);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        for msg in session.handle_line(&line) {
            match msg.to_line() {
                Ok(text) => writeln!(stdout, "{}", text)?,
                Err(e) => warn!(error = %e, "failed to encode reply"),
            }
        }
        stdout.flush()?;
    }

    info!("stdin closed, exiting");
    Ok(())
}
