//! Secret retrieval for the sms-secrets function
//!
//! Provides the error taxonomy, the [`SecretResolver`] seam and the resolver
//! that talks to the Secrets Manager Lambda extension over loopback HTTP.
//!
//! ```ignore
//! use sms_secrets::{ExtensionConfig, SecretResolver};
//! use sms_secrets::resolvers::ExtensionResolver;
//!
//! let config = ExtensionConfig::from_env()?;
//! let resolver = ExtensionResolver::new(&config)?;
//! let secret = resolver.resolve_secure(&config.secret_ref()).await?;
//! ```

mod config;
mod envelope;
pub mod resolvers;
mod types;

pub use config::{
    ExtensionConfig, PORT_VAR, SECRET_NAME_VAR, SECRET_VERSION_ID_VAR, SECRET_VERSION_STAGE_VAR,
    SESSION_TOKEN_VAR,
};
pub use envelope::SecretEnvelope;
pub use types::{SecretRef, SecureSecret};

pub use resolvers::ExtensionResolver;

use async_trait::async_trait;
use thiserror::Error;

/// Error types for secret retrieval
#[derive(Debug, Error)]
pub enum SecretError {
    /// A required environment variable is unset or empty
    #[error("Required environment variable '{var}' is not set")]
    MissingConfig {
        /// Variable name
        var: &'static str,
    },

    /// An environment variable is set but unusable
    #[error("Invalid value for '{var}': {message}")]
    InvalidConfig {
        /// Variable name
        var: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    /// The extension could not be reached or the body could not be read
    #[error("Failed to reach the secrets extension for '{secret_id}'")]
    Transport {
        /// Secret being fetched
        secret_id: String,
        /// Underlying HTTP error
        #[source]
        source: reqwest::Error,
    },

    /// The extension answered with a non-2xx status
    #[error("Secrets extension returned HTTP {status} for '{secret_id}': {body}")]
    UnexpectedStatus {
        /// Secret being fetched
        secret_id: String,
        /// HTTP status code
        status: u16,
        /// Response body as returned
        body: String,
    },

    /// The response body was not a valid secret envelope
    #[error("Secrets extension returned an invalid envelope for '{secret_id}'")]
    InvalidEnvelope {
        /// Secret being fetched
        secret_id: String,
        /// JSON parse error
        #[source]
        source: serde_json::Error,
    },

    /// The envelope carries no `SecretString` (binary or malformed secret)
    #[error("Secret '{secret_id}' has no string value")]
    MissingSecretString {
        /// Secret being fetched
        secret_id: String,
    },

    /// Error raised by the remote secret store, passed through unchanged
    #[error(transparent)]
    Store(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// The response body could not be encoded
    #[error("Failed to encode response body")]
    Encode(#[source] serde_json::Error),
}

/// Trait for fetching a secret value from a backing store.
///
/// Implemented by the extension resolver for the active path and by the
/// AWS SDK resolver for direct Secrets Manager access.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Fetch the plain string value of a secret.
    async fn resolve(&self, secret: &SecretRef) -> Result<String, SecretError>;

    /// Provider identifier, used in log fields.
    ///
    /// Examples: `"extension"`, `"aws"`
    fn provider_name(&self) -> &'static str;

    /// Fetch a secret wrapped in a [`SecureSecret`] that zeros on drop.
    async fn resolve_secure(&self, secret: &SecretRef) -> Result<SecureSecret, SecretError> {
        let value = self.resolve(secret).await?;
        Ok(SecureSecret::new(value))
    }
}
