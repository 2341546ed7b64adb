// Event fingerprint value object

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use sha2::{Digest, Sha256};

use crate::entities::UserEvent;
use crate::error::DomainError;

const FINGERPRINT_HEX_LEN: usize = 64;

/// Hex-encoded SHA-256 of an event's canonical JSON form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(event: &UserEvent) -> Result<Self, DomainError> {
        Ok(Self(hex::encode(Sha256::digest(canonical_json(event)?))))
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let valid = value.len() == FINGERPRINT_HEX_LEN
            && value
                .bytes()
                .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte));
        if !valid {
            return Err(DomainError::InvalidFingerprint(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.0
    }
}

/// Compact JSON with `<`, `>`, `&`, U+2028 and U+2029 written as `\uXXXX`
/// escapes, as HTML-safe encoders such as Go's `encoding/json` emit them, so
/// fingerprints match indexes those producers wrote.
fn canonical_json(event: &UserEvent) -> Result<Vec<u8>, DomainError> {
    let mut canonical = Vec::with_capacity(64);
    let mut serializer = serde_json::Serializer::with_formatter(&mut canonical, HtmlSafeFormatter);
    event.serialize(&mut serializer).map_err(DomainError::Hash)?;
    Ok(canonical)
}

struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (at, ch) in fragment.char_indices() {
            let escaped = match ch {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..at].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = at + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
