use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pbp_cli::commands::{halfgames, parse, status};
use pbp_cli::{Cli, Commands, Config};

fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Parse { input, output }) => {
            let config = load_config(&cli)?;
            parse::run(input, output.as_deref(), &config)?;
        }
        Some(Commands::Halfgames { input, output }) => {
            let config = load_config(&cli)?;
            halfgames::run(input, output.as_deref(), &config)?;
        }
        Some(Commands::Status) => {
            let config = load_config(&cli)?;
            let mut stdout = std::io::stdout().lock();
            status::run(&mut stdout, &config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
