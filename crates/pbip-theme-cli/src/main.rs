use std::io;

use anyhow::Result;
use clap::Parser;
use pbip_theme_cli::{run, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG, when set, overrides the level chosen by -v.
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    run(&cli, &mut io::stdout().lock())?;
    Ok(())
}
