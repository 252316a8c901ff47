pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;
use config::GeneralConfig;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config.general)?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Init => cli::cmd_init(&config).await,
        Commands::Feed(args) => cli::cmd_feed(&config, args).await,
        Commands::Pending { page } => cli::cmd_pending(&config, page).await,
        Commands::Activate { id } => cli::cmd_activate(&config, id).await,
        Commands::ActivateAll => cli::cmd_activate_all(&config).await,
        Commands::Remove { id, yes } => cli::cmd_remove(&config, id, yes).await,
        Commands::Recompute => cli::cmd_recompute(&config).await,
        Commands::AddUser {
            email,
            name,
            password,
            admin,
        } => cli::cmd_add_user(&config, email, name, password, admin).await,
    }
}

/// `RUST_LOG` wins over `general.log_level`. Logs go to stderr so command
/// output on stdout stays clean.
pub fn init_tracing(general: &GeneralConfig) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if general.log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}
