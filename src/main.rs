use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use strokecast::cli::{Cli, Commands, ConfigCommands};
use strokecast::Config;

mod commands;

/// Install the stderr log subscriber.
///
/// `-v` flags win over `RUST_LOG`, which wins over `logging.level`.
fn init_logging(verbose: u8, configured: &str) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured)),
        1 => EnvFilter::new("strokecast=debug"),
        _ => EnvFilter::new("strokecast=trace"),
    };
    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load();
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "warn".to_string());
    init_logging(cli.verbose, &level);

    match cli.command {
        Commands::Inspect { file } => commands::inspect::handle(&file),
        Commands::Render { file, at } => commands::render::handle(&file, at, &config?),
        Commands::Play {
            file,
            speed,
            tick_ms,
            from,
        } => commands::play::handle(&file, &config?, speed, tick_ms, from),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(&config?),
            ConfigCommands::Path => commands::config::handle_path(),
        },
        Commands::Completions { shell } => commands::completions::handle(shell),
    }
}
