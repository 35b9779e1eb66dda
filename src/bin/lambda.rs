//! AWS Lambda entry point for the connector.
//!
//! Deploy with `cargo lambda build --release --features lambda`
//! and route the Contact Lens rule's EventBridge events to the function.

use lambda_runtime::{Error as LambdaError, service_fn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use connector::lambda;

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Post-call summary connector starting...");

    let connector = lambda::build_connector().await?;
    lambda_runtime::run(service_fn(|event| lambda::handler(event, &connector))).await
}
