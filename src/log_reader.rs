//! Read-back of persisted event lines.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::errors::{StoreError, StoreResult};
use crate::event::FIELD_SEPARATOR;
use crate::log_path::LOG_FILE_EXTENSION;

const FIELD_COUNT: usize = 6;

/// One persisted line split into its positional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    pub timestamp: String,
    pub action: String,
    pub product: String,
    pub quantity: String,
    pub price: String,
    pub route: String,
}

impl LogLine {
    pub fn parse(line: &str) -> StoreResult<Self> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(StoreError::malformed_line(format!(
                "expected {FIELD_COUNT} fields, found {}",
                fields.len()
            )));
        }
        Ok(Self {
            timestamp: fields[0].to_string(),
            action: fields[1].to_string(),
            product: fields[2].to_string(),
            quantity: fields[3].to_string(),
            price: fields[4].to_string(),
            route: fields[5].to_string(),
        })
    }
}

impl std::fmt::Display for LogLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}",
            self.timestamp, self.action, self.product, self.quantity, self.price, self.route
        )
    }
}

/// Second-bucket files of one hour bucket, oldest first.
pub async fn bucket_files(root: &Path, hour_key: &str) -> StoreResult<Vec<PathBuf>> {
    let dir = root.join(hour_key);
    let mut entries = tokio::fs::read_dir(&dir)
        .await
        .map_err(|e| StoreError::io(format!("listing {}", dir.display()), e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| StoreError::io(format!("listing {}", dir.display()), e))?
    {
        let path = entry.path();
        let is_log = path
            .extension()
            .is_some_and(|ext| ext == LOG_FILE_EXTENSION);
        if !is_log {
            continue;
        }
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| StoreError::io(format!("inspecting {}", path.display()), e))?;
        if file_type.is_file() {
            files.push(path);
        }
    }
    // second keys are fixed width, so name order is chronological
    files.sort();
    Ok(files)
}

/// Every parseable line of one hour bucket, in file then line order.
pub async fn read_hour_bucket(root: &Path, hour_key: &str) -> StoreResult<Vec<LogLine>> {
    let mut lines = Vec::new();
    for path in bucket_files(root, hour_key).await? {
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StoreError::io(format!("reading {}", path.display()), e))?;
        for (number, raw) in contents.lines().enumerate() {
            match LogLine::parse(raw) {
                Ok(line) => lines.push(line),
                Err(e) => tracing::warn!(
                    "Skipping {}:{}: {}",
                    path.display(),
                    number + 1,
                    e
                ),
            }
        }
    }
    Ok(lines)
}
