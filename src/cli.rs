use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;

use crate::{
    app_state::AppState,
    config_loader::{load_config, StorefrontConfig},
    event_log::EventLog,
    log_path::absolute_root,
    log_reader::read_hour_bucket,
};

/// Top-level CLI interface for the storefront event service
#[derive(Parser, Debug)]
#[command(
    name = "storefront",
    version = "0.1.0",
    about = "Storefront event log service"
)]
pub struct Cli {
    /// TOML config file (defaults to storefront.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the event endpoint, catalog proxy, and static frontend
    Serve {
        /// Host/IP to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to bind
        #[arg(long)]
        port: Option<u16>,
        /// Root of the hour-bucket log tree
        #[arg(long)]
        log_dir: Option<String>,
        /// Directory of prebuilt frontend files
        #[arg(long)]
        static_dir: Option<String>,
    },

    /// Print the file an event would be written to right now
    Where,

    /// Print the persisted lines of one hour bucket (YYYYMMDDHH)
    Show {
        hour_key: String,
    },
}

impl Commands {
    /// Applies `serve` flags on top of file and environment values.
    pub fn apply_overrides(&self, config: &mut StorefrontConfig) {
        if let Commands::Serve {
            host,
            port,
            log_dir,
            static_dir,
        } = self
        {
            if let Some(host) = host {
                config.host = host.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
            if let Some(dir) = log_dir {
                config.log_dir = dir.clone();
            }
            if let Some(dir) = static_dir {
                config.static_dir = dir.clone();
            }
        }
    }
}

pub fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_config(cli.config.as_deref()).context("loading configuration")?;
    cli.command.apply_overrides(&mut config);
    config.validate().context("validating configuration")?;
    crate::telemetry::init(config.tracing_level()?);

    match cli.command {
        Commands::Serve { .. } => {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("building Tokio runtime")?;
            rt.block_on(serve(config))
        }
        Commands::Where => {
            let root = absolute_root(Path::new(&config.log_dir))?;
            println!("{}", EventLog::new(root).current_path().display());
            Ok(())
        }
        Commands::Show { hour_key } => {
            let root = absolute_root(Path::new(&config.log_dir))?;
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("building Tokio runtime")?;
            let lines = rt
                .block_on(read_hour_bucket(&root, &hour_key))
                .with_context(|| format!("reading hour bucket {hour_key}"))?;
            for line in lines {
                println!("{line}");
            }
            Ok(())
        }
    }
}

pub async fn serve(config: StorefrontConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    tracing::info!("Writing event logs under {}", state.event_log.root().display());
    let app = crate::web::build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}
