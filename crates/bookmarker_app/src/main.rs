use anyhow::Result;
use bookmarker_app::cli::Cli;
use clap::Parser;

fn main() -> Result<()> {
    bookmarker_app::platform::run_app(Cli::parse())
}
