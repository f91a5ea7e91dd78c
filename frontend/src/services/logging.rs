//! Routes `tracing` output to the browser console.

use std::io::{self, Write};

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber, filtered by `level` (an `EnvFilter`
/// directive such as `info` or `budgetbee_frontend=debug`).
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ConsoleWriter::default)
        .with_ansi(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

/// Buffers one formatted event and writes it to the console when dropped.
#[derive(Default)]
pub struct ConsoleWriter {
    buffer: Vec<u8>,
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buffer).trim_end().to_string();
        gloo::console::log!(line);
    }
}
