use clap::Parser;
use storefront_events::cli::{dispatch, Cli};

fn main() -> anyhow::Result<()> {
    dispatch(Cli::parse())
}
