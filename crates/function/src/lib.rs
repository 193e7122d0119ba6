//! Lambda function returning a Secrets Manager secret
//!
//! Each invocation fetches one configured secret, either from the Secrets
//! Manager extension on loopback (the default) or straight from the Secrets
//! Manager API, and answers `{"statusCode": 200, "body": "{\"secret\": ...}"}`.

pub mod config;
pub mod handler;
pub mod response;
pub mod telemetry;

pub use config::{Backend, FunctionConfig};
pub use handler::SecretFetchHandler;
pub use response::InvocationResult;
