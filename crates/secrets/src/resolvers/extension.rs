//! Secrets Manager Lambda extension resolver
//!
//! The extension runs next to the function and serves `GetSecretValue`
//! responses from its cache at `/secretsmanager/get`. Each call must carry the
//! function's session token in [`SECRETS_TOKEN_HEADER`].

use crate::{ExtensionConfig, SecretEnvelope, SecretError, SecretRef, SecretResolver};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

/// Header the extension checks against the function's session token
pub const SECRETS_TOKEN_HEADER: &str = "X-Aws-Parameters-Secrets-Token";

const GET_SECRET_PATH: &str = "/secretsmanager/get";

/// Build the extension URL for a secret.
///
/// The secret ID is appended verbatim so the URL matches what the extension
/// documents, e.g. `http://localhost:2773/secretsmanager/get?secretId=emails`.
#[must_use]
pub fn extension_url(base_url: &str, secret: &SecretRef) -> String {
    let mut url = format!(
        "{}{GET_SECRET_PATH}?secretId={}",
        base_url.trim_end_matches('/'),
        secret.secret_id
    );
    if let Some(version_id) = &secret.version_id {
        url.push_str("&versionId=");
        url.push_str(version_id);
    }
    if let Some(version_stage) = &secret.version_stage {
        url.push_str("&versionStage=");
        url.push_str(version_stage);
    }
    url
}

/// Resolves secrets through the local Secrets Manager extension
pub struct ExtensionResolver {
    client: reqwest::Client,
    base_url: String,
    session_token: SecretString,
}

impl std::fmt::Debug for ExtensionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionResolver")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ExtensionResolver {
    /// Create a resolver for the extension on `localhost:<port>`
    ///
    /// # Errors
    /// Returns [`SecretError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(config: &ExtensionConfig) -> Result<Self, SecretError> {
        Self::with_base_url(config.base_url(), config.session_token.clone())
    }

    /// Create a resolver against an arbitrary base URL
    ///
    /// # Errors
    /// Returns [`SecretError::HttpClient`] if the HTTP client cannot be built.
    pub fn with_base_url(
        base_url: impl Into<String>,
        session_token: SecretString,
    ) -> Result<Self, SecretError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(SecretError::HttpClient)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            session_token,
        })
    }

    /// URL this resolver requests for a secret
    #[must_use]
    pub fn url_for(&self, secret: &SecretRef) -> String {
        extension_url(&self.base_url, secret)
    }
}

#[async_trait]
impl SecretResolver for ExtensionResolver {
    fn provider_name(&self) -> &'static str {
        "extension"
    }

    async fn resolve(&self, secret: &SecretRef) -> Result<String, SecretError> {
        let url = self.url_for(secret);
        tracing::debug!(secret_id = %secret.secret_id, "Requesting secret from extension");

        let response = self
            .client
            .get(&url)
            .header(SECRETS_TOKEN_HEADER, self.session_token.expose_secret())
            .send()
            .await
            .map_err(|source| SecretError::Transport {
                secret_id: secret.secret_id.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| SecretError::Transport {
                secret_id: secret.secret_id.clone(),
                source,
            })?;
        tracing::debug!(secret_id = %secret.secret_id, status = status.as_u16(), "Extension responded");

        if !status.is_success() {
            return Err(SecretError::UnexpectedStatus {
                secret_id: secret.secret_id.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let envelope =
            SecretEnvelope::from_body(&body).map_err(|source| SecretError::InvalidEnvelope {
                secret_id: secret.secret_id.clone(),
                source,
            })?;
        tracing::debug!(
            secret_id = %secret.secret_id,
            arn = envelope.arn.as_deref(),
            name = envelope.name.as_deref(),
            version_id = envelope.version_id.as_deref(),
            version_stages = ?envelope.version_stages,
            "Envelope received"
        );

        envelope
            .into_secret_string()
            .ok_or_else(|| SecretError::MissingSecretString {
                secret_id: secret.secret_id.clone(),
            })
    }
}
