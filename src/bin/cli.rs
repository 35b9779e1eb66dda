//! Post-call summary connector CLI
//!
//! Replays contact events locally. For AWS Lambda, use `connector-lambda`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use connector::{
    config::ConfigLoader,
    error::{AppError, Result},
    handler::Connector,
    models::{HandlerResponse, HandlerSettings, InboundEvent, ParameterNames},
    parameters::FileParameters,
    storage::LocalArtifactStore,
    utils::http::join_url,
};
use serde_json::Value;

/// Post-call summary connector
#[derive(Parser, Debug)]
#[command(
    name = "connector",
    version,
    about = "Copies Contact Lens post-call summaries into CRM phone calls"
)]
struct Cli {
    /// Root of the parameter hierarchy (defaults to SSM_PARAM_ROOT_NAME)
    #[arg(long, global = true)]
    root: Option<String>,

    /// Deployment environment (defaults to ENVIRONMENT_NAME or `poc`)
    #[arg(long, global = true)]
    environment: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the connector once for an event file
    Invoke {
        /// Event JSON file
        #[arg(short, long)]
        event: PathBuf,

        /// TOML file with `[parameters]` and `[secrets]`
        #[arg(short, long, default_value = "parameters.toml")]
        params: PathBuf,

        /// Directory holding one subdirectory per bucket
        #[arg(short, long, default_value = "storage")]
        storage_dir: PathBuf,

        /// Use SSM, Secrets Manager and S3 instead of local files
        #[arg(long)]
        aws: bool,
    },

    /// Print the analysis key prefix derived from an event file
    Prefix {
        /// Event JSON file
        #[arg(short, long)]
        event: PathBuf,
    },

    /// Check that a parameter file resolves a complete configuration
    Validate {
        /// TOML file with `[parameters]` and `[secrets]`
        #[arg(short, long, default_value = "parameters.toml")]
        params: PathBuf,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Parameter names from the environment with command-line overrides.
fn parameter_names(cli: &Cli) -> Result<ParameterNames> {
    let root = cli.root.clone();
    let environment = cli.environment.clone();
    ParameterNames::from_lookup(|key| match key {
        "SSM_PARAM_ROOT_NAME" => root.clone().or_else(|| std::env::var(key).ok()),
        "ENVIRONMENT_NAME" => environment.clone().or_else(|| std::env::var(key).ok()),
        _ => std::env::var(key).ok(),
    })
}

fn read_event(path: &PathBuf) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn print_response(response: &HandlerResponse) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    if response.is_success() {
        Ok(())
    } else {
        Err(AppError::Unsuccessful(response.status_code))
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = HandlerSettings::from_env();
    settings.validate()?;

    match &cli.command {
        #[cfg(feature = "aws")]
        Command::Invoke {
            event, aws: true, ..
        } => {
            let payload = read_event(event)?;
            let connector = Connector::new(
                parameter_names(&cli)?,
                settings,
                connector::parameters::AwsParameterStore::from_env().await,
                connector::storage::S3ArtifactStore::from_env().await,
            );
            print_response(&connector.handle(&payload).await)?;
        }

        #[cfg(not(feature = "aws"))]
        Command::Invoke { aws: true, .. } => {
            return Err(AppError::config(
                "--aws requires the `aws` feature; rebuild with --features aws",
            ));
        }

        Command::Invoke {
            event,
            params,
            storage_dir,
            ..
        } => {
            let payload = read_event(event)?;
            let connector = Connector::new(
                parameter_names(&cli)?,
                settings,
                FileParameters::load(params)?,
                LocalArtifactStore::new(storage_dir),
            );
            log::info!("Replaying {} against {}", event.display(), storage_dir.display());
            print_response(&connector.handle(&payload).await)?;
        }

        Command::Prefix { event } => {
            let payload = read_event(event)?;
            let event = InboundEvent::parse(&payload, &settings.rule_name)?;
            println!("{}", event.analysis_prefix());
        }

        Command::Validate { params } => {
            let names = parameter_names(&cli)?;
            let parameters = FileParameters::load(params)?;

            match ConfigLoader::new(&parameters, &names).load().await {
                Ok(config) => {
                    log::info!("✓ Parameters OK under {}", names.prefix());
                    let phone_calls = join_url(&config.base_url, &config.phone_call_path)?;
                    log::info!("    Phone calls: {}", phone_calls);
                    log::info!("    Bucket: {}", config.bucket_name);
                    log::info!("    User: {}", config.username);
                }
                Err(e) => {
                    log::error!("Parameter validation failed: {}", e);
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
