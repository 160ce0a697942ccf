pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod domain;
pub mod services;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::CommandFactory;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use cli::Cli;
use cli::Commands;
pub use config::Config;
use domain::SubmitOutcome;

/// Reads the config named by `--config`, or the first one found on the
/// default search paths.
pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    config.validate()?;
    Ok(config)
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    // Logs go to stderr so `tripfinder search` output stays pipeable
    let fmt_layer = if config.general.log_format == "json" {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let (layer, task) = tracing_loki::builder()
            .label("app", "tripfinder")?
            .build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    Ok(())
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<ExitCode> {
    init_tracing(&config)?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Search {
            query,
            mode,
            source,
        } => {
            let query = query.join(" ");
            let outcome = cli::cmd_search(&config, &query, mode, source.as_deref()).await?;
            Ok(match outcome {
                SubmitOutcome::Failed(_) => ExitCode::FAILURE,
                _ => ExitCode::SUCCESS,
            })
        }

        Commands::Serve => {
            let prometheus_handle = if config.observability.metrics_enabled {
                use metrics_exporter_prometheus::PrometheusBuilder;
                let handle = PrometheusBuilder::new()
                    .install_recorder()
                    .context("Failed to install Prometheus recorder")?;
                info!("Prometheus metrics recorder initialized");
                Some(handle)
            } else {
                None
            };

            info!(
                "Tripfinder v{} starting web server...",
                env!("CARGO_PKG_VERSION")
            );

            let state = Arc::new(
                api::AppState::new(config, prometheus_handle)
                    .context("Invalid dataset settings")?,
            );
            api::serve(state).await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Entries { source } => {
            cli::cmd_entries(&config, source.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Check { source } => {
            cli::cmd_check(&config, source.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Init => {
            cli::cmd_init()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
