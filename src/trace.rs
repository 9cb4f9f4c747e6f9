//! Timestamped debug output gated by `-v`

use chrono::Local;

/// Debug message sink for the run.
///
/// Messages are written to stdout with a `[HH:MM:SS]` prefix, and only when
/// verbosity was raised at least once on the command line.
#[derive(Clone, Copy, Debug)]
pub struct Trace {
    level: u8,
}

impl Trace {
    pub fn new(level: u8) -> Self {
        Self { level }
    }

    /// Write one debug line if verbosity is enabled
    pub fn debug(&self, message: impl AsRef<str>) {
        if self.level > 0 {
            println!("[{}] {}", Local::now().format("%H:%M:%S"), message.as_ref());
        }
    }
}
