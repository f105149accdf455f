use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;

use strokecast::cli::Cli;

/// Write a completion script for `shell` to stdout.
#[cfg(not(tarpaulin_include))]
pub fn handle(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "strokecast", &mut std::io::stdout());
    Ok(())
}
