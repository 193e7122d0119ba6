//! Function configuration, read once at cold start

use crate::telemetry::{Level, LogFormat, TracingConfig};
use sms_secrets::{
    ExtensionConfig, SECRET_NAME_VAR, SECRET_VERSION_ID_VAR, SECRET_VERSION_STAGE_VAR,
    SecretError, SecretRef,
};

/// Selects the backend: `extension` (default) or `sdk`
pub const SECRET_SOURCE_VAR: &str = "SECRET_SOURCE";
/// Region override for the `sdk` backend
pub const SECRETS_REGION_VAR: &str = "SECRETS_REGION";
/// Log output format
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";
/// Log level for this workspace's crates
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
/// Log the fetched secret value (never enable in production)
pub const ECHO_SECRET_VAR: &str = "ECHO_SECRET";
/// Full filter directive, overriding `LOG_LEVEL`
pub const RUST_LOG_VAR: &str = "RUST_LOG";

const LAMBDA_LOG_FORMAT_VAR: &str = "AWS_LAMBDA_LOG_FORMAT";
const LAMBDA_LOG_LEVEL_VAR: &str = "AWS_LAMBDA_LOG_LEVEL";

/// Where secrets are fetched from
#[derive(Debug, Clone)]
pub enum Backend {
    /// Secrets Manager extension on loopback
    Extension(ExtensionConfig),
    /// Secrets Manager API through the AWS SDK
    Sdk {
        /// Region override; `None` uses the SDK provider chain
        region: Option<String>,
    },
}

impl Backend {
    /// Short name for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Extension(_) => "extension",
            Self::Sdk { .. } => "sdk",
        }
    }
}

/// Everything the function needs, resolved before the first invocation
#[derive(Debug, Clone)]
pub struct FunctionConfig {
    /// Secret to fetch on every invocation
    pub secret: SecretRef,
    /// Backend to fetch it from
    pub backend: Backend,
    /// Log the secret value on each invocation
    pub echo_secret: bool,
    /// Logging setup
    pub tracing: TracingConfig,
}

impl FunctionConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`SecretError::MissingConfig`] or [`SecretError::InvalidConfig`]
    /// for missing or malformed variables.
    pub fn from_env() -> Result<Self, SecretError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary lookup function.
    ///
    /// # Errors
    /// Same as [`FunctionConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SecretError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.is_empty());

        let (secret, backend) = match get(SECRET_SOURCE_VAR).as_deref() {
            None | Some("extension") => {
                let extension = ExtensionConfig::from_lookup(&lookup)?;
                (extension.secret_ref(), Backend::Extension(extension))
            }
            Some("sdk") => {
                let secret_name = get(SECRET_NAME_VAR).ok_or(SecretError::MissingConfig {
                    var: SECRET_NAME_VAR,
                })?;
                let secret = SecretRef {
                    secret_id: secret_name,
                    version_id: get(SECRET_VERSION_ID_VAR),
                    version_stage: get(SECRET_VERSION_STAGE_VAR),
                };
                let region = get(SECRETS_REGION_VAR);
                (secret, Backend::Sdk { region })
            }
            Some(other) => {
                return Err(SecretError::InvalidConfig {
                    var: SECRET_SOURCE_VAR,
                    message: format!("expected 'extension' or 'sdk', got '{other}'"),
                });
            }
        };

        // Platform log controls are a fallback only: an unknown value there
        // must not stop the cold start
        let format = match get(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|message| SecretError::InvalidConfig {
                    var: LOG_FORMAT_VAR,
                    message,
                })?,
            None => get(LAMBDA_LOG_FORMAT_VAR)
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(LogFormat::Json),
        };

        let level = match get(LOG_LEVEL_VAR) {
            Some(raw) => raw
                .parse::<Level>()
                .map_err(|e| SecretError::InvalidConfig {
                    var: LOG_LEVEL_VAR,
                    message: e.to_string(),
                })?,
            None => get(LAMBDA_LOG_LEVEL_VAR)
                .as_deref()
                .map_or(Level::INFO, lambda_log_level),
        };

        let echo_secret = match get(ECHO_SECRET_VAR).as_deref() {
            None => false,
            Some(raw) => parse_flag(raw).ok_or_else(|| SecretError::InvalidConfig {
                var: ECHO_SECRET_VAR,
                message: format!("expected a boolean, got '{raw}'"),
            })?,
        };

        Ok(Self {
            secret,
            backend,
            echo_secret,
            tracing: TracingConfig {
                format,
                level,
                filter: get(RUST_LOG_VAR),
            },
        })
    }
}

/// Map an `AWS_LAMBDA_LOG_LEVEL` value onto a tracing level
fn lambda_log_level(raw: &str) -> Level {
    match raw.to_ascii_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" => Level::WARN,
        "ERROR" | "FATAL" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
