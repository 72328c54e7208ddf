//! `tablekit`: inspect filter registries and derive table queries.

use clap::Parser;

mod cli;
mod commands;
mod logging;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let output = match cli.command {
        Command::Filters(args) => commands::run_filters(&args)?,
        Command::Query(args) => commands::run_query(&args)?,
    };
    println!("{output}");
    Ok(())
}
