//! Config subcommands handler

use anyhow::Result;

use strokecast::Config;

/// Show the effective configuration as TOML.
#[cfg(not(tarpaulin_include))]
pub fn handle_show(config: &Config) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    print!("{}", toml_str);
    Ok(())
}

/// Print where the configuration is read from, and whether it exists.
#[cfg(not(tarpaulin_include))]
pub fn handle_path() -> Result<()> {
    let config_path = Config::config_path()?;
    if config_path.exists() {
        println!("{}", config_path.display());
    } else {
        println!("{} (not created, using defaults)", config_path.display());
    }
    Ok(())
}
