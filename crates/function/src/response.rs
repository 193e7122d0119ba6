//! Invocation result and body encoding
//!
//! The body keeps the byte layout callers already parse: a space after `:`
//! and `,`, and every non-ASCII character (and DEL) written as a `\uXXXX`
//! escape.

use serde::Serialize;
use serde_json::ser::Formatter;
use sms_secrets::SecretError;
use std::io::{self, Write};

/// HTTP-style result handed back to the runtime
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    /// HTTP status code
    pub status_code: u16,
    /// JSON-encoded body
    pub body: String,
}

impl InvocationResult {
    /// A `200` result whose body is `{"secret": <value>}`
    ///
    /// # Errors
    /// Returns [`SecretError::Encode`] if the body cannot be serialized.
    pub fn secret(value: &str) -> Result<Self, SecretError> {
        Ok(Self {
            status_code: 200,
            body: encode_body(&SecretBody { secret: value }).map_err(SecretError::Encode)?,
        })
    }
}

#[derive(Serialize)]
struct SecretBody<'a> {
    secret: &'a str,
}

/// Serialize with [`SpacedAsciiFormatter`]
///
/// # Errors
/// Returns the serializer error, if any.
pub fn encode_body<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut out = Vec::with_capacity(64);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, SpacedAsciiFormatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|e| <serde_json::Error as serde::ser::Error>::custom(e))
}

/// JSON formatter emitting `", "` / `": "` separators and ASCII-only strings
#[derive(Debug, Default, Clone, Copy)]
pub struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if ch.is_ascii() && ch != '\x7f' {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..idx])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}
