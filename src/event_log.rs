//! Append-only event log.
//!
//! Each append resolves the second-bucket file for the current instant,
//! creates its hour-bucket directory, and appends one line. Nothing is
//! cached between calls.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use crate::clock::{Clock, SystemClock};
use crate::errors::{StoreError, StoreResult};
use crate::event::EventRecord;
use crate::log_path::{prepare_log_path, resolve_log_path};

/// Where a line landed and what was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendReceipt {
    pub path: PathBuf,
    pub line: String,
}

#[derive(Clone)]
pub struct EventLog {
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl EventLog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_clock(root, Arc::new(SystemClock))
    }

    pub fn with_clock(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File the next append would target. Creates nothing.
    pub fn current_path(&self) -> PathBuf {
        resolve_log_path(&self.root, &self.clock.now())
    }

    /// Formats `record` and appends it as one line.
    ///
    /// The file is opened only after its directory exists, so a directory
    /// failure leaves no partial line behind. No retry is attempted.
    pub async fn append(&self, record: &EventRecord) -> StoreResult<AppendReceipt> {
        let line = record.to_log_line();
        let path = prepare_log_path(&self.root, &self.clock.now()).await?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StoreError::io(format!("opening {}", path.display()), e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StoreError::io(format!("appending to {}", path.display()), e))?;
        file.flush()
            .await
            .map_err(|e| StoreError::io(format!("flushing {}", path.display()), e))?;

        Ok(AppendReceipt { path, line })
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog").field("root", &self.root).finish()
    }
}
