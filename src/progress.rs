use log::{info, warn};
use std::io::Write;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Receives every improvement of the best known decomposition width.
pub trait ProgressSink: Send + Sync {
    fn report(&self, width: usize, at: SystemTime);
}

/// Logs improvements in the PACE status format: `c status <bag size> <unix millis>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl LogProgress {
    pub fn status_line(width: usize, at: SystemTime) -> String {
        let millis = at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        format!("c status {} {}", width + 1, millis)
    }
}

impl ProgressSink for LogProgress {
    fn report(&self, width: usize, at: SystemTime) {
        info!("{}", Self::status_line(width, at));
    }
}

/// Writes the status lines directly, independent of the log level.
pub struct WriterProgress<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterProgress<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> ProgressSink for WriterProgress<W> {
    fn report(&self, width: usize, at: SystemTime) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        let line = LogProgress::status_line(width, at);
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!("could not write status line: {}", e);
        }
    }
}
