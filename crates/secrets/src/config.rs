//! Extension configuration read from the function environment

use crate::{SecretError, SecretRef};
use secrecy::{ExposeSecret, SecretString};

/// Identifier of the secret to fetch
pub const SECRET_NAME_VAR: &str = "SECRET_NAME";
/// Loopback port the extension listens on
pub const PORT_VAR: &str = "PARAMETERS_SECRETS_EXTENSION_HTTP_PORT";
/// Session token that authorizes calls to the extension
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";
/// Optional version ID pin
pub const SECRET_VERSION_ID_VAR: &str = "SECRET_VERSION_ID";
/// Optional version stage pin
pub const SECRET_VERSION_STAGE_VAR: &str = "SECRET_VERSION_STAGE";

/// Everything needed to call the extension, read once at startup.
#[derive(Clone)]
pub struct ExtensionConfig {
    /// Secret ID - can be ARN or secret name
    pub secret_name: String,
    /// Extension HTTP port
    pub port: u16,
    /// Session token sent in the auth header
    pub session_token: SecretString,
    /// Version ID pin (optional)
    pub version_id: Option<String>,
    /// Version stage pin (optional)
    pub version_stage: Option<String>,
}

impl std::fmt::Debug for ExtensionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionConfig")
            .field("secret_name", &self.secret_name)
            .field("port", &self.port)
            .field("session_token", &"[REDACTED]")
            .field("version_id", &self.version_id)
            .field("version_stage", &self.version_stage)
            .finish()
    }
}

impl ExtensionConfig {
    /// Create a config for the current version of a secret
    #[must_use]
    pub fn new(secret_name: impl Into<String>, port: u16, session_token: impl Into<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            port,
            session_token: SecretString::from(session_token.into()),
            version_id: None,
            version_stage: None,
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`SecretError::MissingConfig`] if any required variable is unset
    /// or empty, and [`SecretError::InvalidConfig`] if the port is not a number.
    pub fn from_env() -> Result<Self, SecretError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary lookup function.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    /// Same as [`ExtensionConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SecretError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &'static str| lookup(var).filter(|v| !v.is_empty());
        let require = |var: &'static str| get(var).ok_or(SecretError::MissingConfig { var });

        let secret_name = require(SECRET_NAME_VAR)?;
        let port = parse_port(&require(PORT_VAR)?)?;
        let session_token = require(SESSION_TOKEN_VAR)?;

        Ok(Self {
            secret_name,
            port,
            session_token: SecretString::from(session_token),
            version_id: get(SECRET_VERSION_ID_VAR),
            version_stage: get(SECRET_VERSION_STAGE_VAR),
        })
    }

    /// The secret this config points at, including any version pin
    #[must_use]
    pub fn secret_ref(&self) -> SecretRef {
        SecretRef {
            secret_id: self.secret_name.clone(),
            version_id: self.version_id.clone(),
            version_stage: self.version_stage.clone(),
        }
    }

    /// Base URL of the extension on loopback
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Raw session token for the auth header
    #[must_use]
    pub fn session_token(&self) -> &str {
        self.session_token.expose_secret()
    }
}

fn parse_port(raw: &str) -> Result<u16, SecretError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|e| SecretError::InvalidConfig {
            var: PORT_VAR,
            message: format!("'{raw}' is not a valid port: {e}"),
        })
}
