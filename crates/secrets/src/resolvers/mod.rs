//! Secret resolver implementations
//!
//! - [`ExtensionResolver`] - Secrets Manager Lambda extension on loopback
//!
//! Direct Secrets Manager access through the AWS SDK lives in the `sms-aws`
//! crate so this crate stays free of the SDK.

mod extension;

pub use extension::{ExtensionResolver, SECRETS_TOKEN_HEADER, extension_url};
