//! AWS integration for sms-secrets
//!
//! Fetches secrets straight from AWS Secrets Manager, bypassing the local
//! extension. See the [`secrets`] module.

pub mod secrets;

pub use secrets::{AwsResolver, BoxError, SecretValueApi};
