//! `secrets-manager-function` binary: hosts the handler in the Lambda runtime loop

use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use sms_aws::AwsResolver;
use sms_function::{Backend, FunctionConfig, SecretFetchHandler, telemetry};
use sms_secrets::{ExtensionResolver, SecretResolver};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Configuration errors stop the cold start before any request is made
    let config = FunctionConfig::from_env()?;
    telemetry::init_tracing(&config.tracing)?;

    tracing::info!(
        backend = config.backend.name(),
        secret_id = %config.secret.secret_id,
        echo_secret = config.echo_secret,
        "Starting secrets function"
    );

    match config.backend {
        Backend::Extension(extension) => {
            let resolver = ExtensionResolver::new(&extension)?;
            let handler = SecretFetchHandler::new(resolver, config.secret)
                .with_echo_secret(config.echo_secret);
            serve(handler).await
        }
        Backend::Sdk { region } => {
            let resolver = AwsResolver::from_env(region).await;
            let handler = SecretFetchHandler::new(resolver, config.secret)
                .with_echo_secret(config.echo_secret);
            serve(handler).await
        }
    }
}

async fn serve<R: SecretResolver>(handler: SecretFetchHandler<R>) -> Result<(), Error> {
    let handler = &handler;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler.invoke(event).await
    }))
    .await
}
