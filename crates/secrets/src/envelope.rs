//! Secret envelope returned by the extension's `/secretsmanager/get` route

use serde::Deserialize;

/// Body of a `GetSecretValue` response as relayed by the extension.
///
/// Only `SecretString` is returned downstream; the resolver logs the other
/// fields at debug level. All fields are optional.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SecretEnvelope {
    /// Secret ARN
    #[serde(rename = "ARN", default)]
    pub arn: Option<String>,

    /// Friendly name of the secret
    #[serde(default)]
    pub name: Option<String>,

    /// Version returned
    #[serde(default)]
    pub version_id: Option<String>,

    /// Stage labels attached to the version
    #[serde(default)]
    pub version_stages: Vec<String>,

    /// Plain string value; absent for binary secrets
    #[serde(default)]
    pub secret_string: Option<String>,
}

impl SecretEnvelope {
    /// Parse an envelope from a response body.
    ///
    /// # Errors
    /// Returns the parse error if the body is not a JSON object.
    pub fn from_body(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Take the secret string out of the envelope.
    #[must_use]
    pub fn into_secret_string(self) -> Option<String> {
        self.secret_string
    }
}
