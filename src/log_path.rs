//! Hour-bucket directories and second-bucket files.
//!
//! Layout under the log root: `YYYYMMDDHH/YYYYMMDDHHMMSS.txt`, keyed in
//! host local time.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::errors::{StoreError, StoreResult};

pub const LOG_FILE_EXTENSION: &str = "txt";

/// `YYYYMMDDHH` for the hour containing `now`.
pub fn hour_key<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%Y%m%d%H").to_string()
}

/// `YYYYMMDDHHMMSS` for the second containing `now`.
pub fn second_key<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    now.format("%Y%m%d%H%M%S").to_string()
}

/// Hour-bucket directory for `now`. Pure.
pub fn hour_bucket_dir<Tz>(root: &Path, now: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    root.join(hour_key(now))
}

/// Second-bucket file for `now`. Pure: touches nothing on disk.
pub fn resolve_log_path<Tz>(root: &Path, now: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    hour_bucket_dir(root, now).join(format!("{}.{}", second_key(now), LOG_FILE_EXTENSION))
}

/// Resolves the file for `now` and creates its hour-bucket directory.
///
/// Creation is recursive and idempotent. A path segment that exists as a
/// regular file fails here, before any log file is opened.
pub async fn prepare_log_path<Tz>(root: &Path, now: &DateTime<Tz>) -> StoreResult<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let dir = hour_bucket_dir(root, now);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| StoreError::io(format!("creating log directory {}", dir.display()), e))?;
    Ok(dir.join(format!("{}.{}", second_key(now), LOG_FILE_EXTENSION)))
}

/// Joins a relative log root onto the working directory.
pub fn absolute_root(root: &Path) -> StoreResult<PathBuf> {
    if root.is_absolute() {
        return Ok(root.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .map_err(|e| StoreError::io("reading working directory", e))?;
    Ok(cwd.join(root))
}
