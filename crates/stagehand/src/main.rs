use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

fn main() -> Result<()> {
    let parsed = cli::Cli::parse();

    let code = parsed.dispatch()?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
