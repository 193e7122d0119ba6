//! The invocation handler
//!
//! One invocation is one secret fetch. The event payload is not inspected;
//! every failure is returned to the runtime as an invocation error.

use crate::response::InvocationResult;
use lambda_runtime::LambdaEvent;
use serde_json::Value;
use sms_secrets::{SecretError, SecretRef, SecretResolver};
use tracing::Instrument;

/// Fetches a configured secret and wraps it in an [`InvocationResult`]
#[derive(Debug)]
pub struct SecretFetchHandler<R> {
    resolver: R,
    secret: SecretRef,
    echo_secret: bool,
}

impl<R: SecretResolver> SecretFetchHandler<R> {
    /// Create a handler that fetches `secret` through `resolver`
    #[must_use]
    pub fn new(resolver: R, secret: SecretRef) -> Self {
        Self {
            resolver,
            secret,
            echo_secret: false,
        }
    }

    /// Log the fetched value on every invocation
    #[must_use]
    pub fn with_echo_secret(mut self, echo_secret: bool) -> Self {
        self.echo_secret = echo_secret;
        self
    }

    /// The secret this handler serves
    #[must_use]
    pub const fn secret(&self) -> &SecretRef {
        &self.secret
    }

    /// Fetch the secret and build the response.
    ///
    /// # Errors
    /// Propagates every [`SecretError`] from the resolver unchanged.
    pub async fn handle(&self) -> Result<InvocationResult, SecretError> {
        let secret = self.resolver.resolve_secure(&self.secret).await?;

        if self.echo_secret {
            tracing::warn!(
                secret = secret.expose(),
                "ECHO_SECRET is enabled; secret value written to logs"
            );
        }

        InvocationResult::secret(secret.expose())
    }

    /// Runtime entry point: wraps [`handle`](Self::handle) in a span keyed by
    /// the request ID.
    ///
    /// # Errors
    /// Returns the boxed [`SecretError`] for the runtime to report.
    pub async fn invoke(
        &self,
        event: LambdaEvent<Value>,
    ) -> Result<InvocationResult, lambda_runtime::Error> {
        let span = tracing::info_span!(
            "invocation",
            request_id = %event.context.request_id,
            secret_id = %self.secret.secret_id,
            provider = self.resolver.provider_name(),
        );

        async {
            let result = self.handle().await;
            match &result {
                Ok(_) => tracing::info!("Secret returned"),
                Err(e) => tracing::error!(error = %e, "Secret fetch failed"),
            }
            Ok::<_, lambda_runtime::Error>(result?)
        }
        .instrument(span)
        .await
    }
}
