//! Library root for the `storefront_events` crate
//! Event ingress for the demo storefront: hourly log buckets, catalog proxy, CLI

// Core error handling
pub mod api_errors;
pub mod errors;

// Event records and formatting
pub mod event;
pub mod timestamp;

// Log layout and persistence
pub mod clock;
pub mod event_log;
pub mod log_path;
pub mod log_reader;

// Catalog collaborator
pub mod catalog;

// Configuration & CLI
pub mod cli;
pub mod config_loader;

// Web server interface
pub mod app_state;
pub mod web;

// Logging
pub mod telemetry;

pub use app_state::AppState;
pub use event::EventRecord;
pub use event_log::{AppendReceipt, EventLog};
pub use log_path::{prepare_log_path, resolve_log_path};
pub use timestamp::format_timestamp;
