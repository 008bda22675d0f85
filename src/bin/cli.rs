//! Court Notifier CLI
//!
//! Local execution entry point. For AWS Lambda, use `court-notifier-lambda`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use court_notifier::{
    config,
    error::Result,
    models::{Config, CrawlParameters, RunTimestamp},
    pipeline::Notifier,
    queue::{LocalOutbox, QueueClient},
    services::Publisher,
    session::HttpBrowser,
    trigger,
};

/// Court Notifier - tennis course availability alerts
#[derive(Parser, Debug)]
#[command(
    name = "court-notifier",
    version,
    about = "Checks tennis coaching courses for open spaces and queues a notification"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl, resolve availability and publish one notification
    Run {
        /// Trigger parameters: a file path, inline JSON or base64 (default: config `[defaults]`)
        #[arg(short, long)]
        params: Option<String>,

        /// Directory receiving published messages
        #[arg(long, default_value = "outbox")]
        outbox: PathBuf,

        /// Publish to AWS SNS instead of the local outbox
        #[cfg(feature = "sns")]
        #[arg(long)]
        sns: bool,
    },

    /// Validate the configuration and default parameters
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Read trigger parameters from a file or take the argument as the payload itself.
fn read_params(arg: Option<&str>, config: &Config) -> Result<CrawlParameters> {
    let decoded = match arg {
        Some(value) => {
            let path = PathBuf::from(value);
            if path.is_file() {
                log::info!("Reading parameters from {}", path.display());
                trigger::decode(&std::fs::read(&path)?)?
            } else {
                trigger::decode(value.as_bytes())?
            }
        }
        None => None,
    };
    Ok(trigger::resolve(decoded, &config.defaults))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let timestamp = RunTimestamp::now();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Court Notifier starting...");

    let config = config::load_config(&cli.config)?;
    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Run {
            params,
            outbox,
            #[cfg(feature = "sns")]
            sns,
        } => {
            config.validate()?;
            let params = read_params(params.as_deref(), &config)?;

            #[cfg(feature = "sns")]
            let queue: Arc<dyn QueueClient> = if sns {
                Arc::new(court_notifier::queue::SnsQueue::from_env().await?)
            } else {
                Arc::new(LocalOutbox::new(&outbox))
            };
            #[cfg(not(feature = "sns"))]
            let queue: Arc<dyn QueueClient> = Arc::new(LocalOutbox::new(&outbox));

            let browser = Arc::new(HttpBrowser::new(&config.crawler)?);
            let publisher = Publisher::new(queue, &config.notify);
            let notifier = Notifier::new(&config, browser, publisher);

            let report = notifier.run(&params, &timestamp).await?;
            log::info!(
                "{} course(s) listed, {} excluded, {} available",
                report.listed,
                report.excluded,
                report.available
            );
            match report.message_id {
                Some(id) => log::info!("Notification queued as {}", id),
                None => log::info!("No notification sent"),
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            if let Err(e) = config.defaults.validate() {
                log::error!("Default parameters are invalid: {}", e);
                return Err(e);
            }
            log::info!("✓ Default parameters OK ({})", config.defaults.base_url);

            log::info!("All validations passed!");
        }
    }

    log::info!("Done!");

    Ok(())
}
