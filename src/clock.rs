//! Injectable wall clock.
//!
//! Log paths are derived from "now". Reading the host clock through a trait
//! lets tests pin the instant instead of racing the second boundary.

use chrono::{DateTime, Local};
use std::sync::{Arc, RwLock};

/// Source of the current wall-clock instant in host local time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Local>;
}

/// Reads the host clock.
#[derive(Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a settable instant.
#[derive(Clone, Debug)]
pub struct FixedClock {
    instant: Arc<RwLock<DateTime<Local>>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Local>) -> Self {
        Self {
            instant: Arc::new(RwLock::new(instant)),
        }
    }

    /// Moves the pinned instant. Clones share the same instant.
    pub fn set(&self, instant: DateTime<Local>) {
        // a poisoned lock still holds a valid DateTime
        let mut guard = self.instant.write().unwrap_or_else(|e| e.into_inner());
        *guard = instant;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.instant.read().unwrap_or_else(|e| e.into_inner())
    }
}
