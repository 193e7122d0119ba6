//! AWS Secrets Manager resolver over the SDK
//!
//! This path talks to Secrets Manager directly with the ambient credential
//! chain instead of going through the extension. Store errors are not
//! translated: they surface as [`SecretError::Store`] holding the SDK error.

use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;
use sms_secrets::{SecretError, SecretRef, SecretResolver};

/// Boxed error returned by a [`SecretValueApi`] implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The one Secrets Manager call the resolver needs.
///
/// Implemented for the SDK [`Client`]; tests substitute their own.
#[async_trait]
pub trait SecretValueApi: Send + Sync {
    /// Call `GetSecretValue` and return its `SecretString`, if any.
    async fn fetch_secret_string(&self, secret: &SecretRef) -> Result<Option<String>, BoxError>;
}

#[async_trait]
impl SecretValueApi for Client {
    async fn fetch_secret_string(&self, secret: &SecretRef) -> Result<Option<String>, BoxError> {
        let output = Self::get_secret_value(self)
            .secret_id(&secret.secret_id)
            .set_version_id(secret.version_id.clone())
            .set_version_stage(secret.version_stage.clone())
            .send()
            .await
            .map_err(|e| Box::new(e) as BoxError)?;

        Ok(output.secret_string().map(str::to_string))
    }
}

/// Resolves secrets from AWS Secrets Manager through an injected client
pub struct AwsResolver<C = Client> {
    client: C,
}

impl<C> std::fmt::Debug for AwsResolver<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsResolver").finish_non_exhaustive()
    }
}

impl AwsResolver<Client> {
    /// Build an SDK client from the ambient AWS configuration.
    ///
    /// `region` overrides the region from the default provider chain.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let config = loader.load().await;
        Self::new(Client::new(&config))
    }
}

impl<C: SecretValueApi> AwsResolver<C> {
    /// Wrap an existing client
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Fetch a secret string straight from Secrets Manager.
    ///
    /// # Errors
    /// Returns [`SecretError::Store`] with the client's error unchanged, or
    /// [`SecretError::MissingSecretString`] for binary secrets.
    pub async fn get_secret(&self, secret: &SecretRef) -> Result<String, SecretError> {
        let value = self
            .client
            .fetch_secret_string(secret)
            .await
            .map_err(|e| {
                tracing::debug!(secret_id = %secret.secret_id, error = %e, "GetSecretValue failed");
                SecretError::Store(e)
            })?;

        value.ok_or_else(|| SecretError::MissingSecretString {
            secret_id: secret.secret_id.clone(),
        })
    }
}

#[async_trait]
impl<C: SecretValueApi> SecretResolver for AwsResolver<C> {
    fn provider_name(&self) -> &'static str {
        "aws"
    }

    async fn resolve(&self, secret: &SecretRef) -> Result<String, SecretError> {
        self.get_secret(secret).await
    }
}
