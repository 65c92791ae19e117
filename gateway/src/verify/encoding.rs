use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::error::ConfigurationError;

/// How the raw body bytes are interpreted before hashing.
///
/// `Utf8` hashes the bytes exactly as they arrived on the wire. `Base64` and
/// `Hex` treat the body as encoded text and hash the decoded bytes instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyEncoding {
    #[default]
    Utf8,
    Base64,
    Hex,
}

impl BodyEncoding {
    /// Resolve the bytes to feed into the digest.
    ///
    /// Borrows for `Utf8`; allocates only when decoding is actually needed.
    pub(crate) fn decode(self, raw: &[u8]) -> Result<Cow<'_, [u8]>, ConfigurationError> {
        match self {
            Self::Utf8 => Ok(Cow::Borrowed(raw)),
            Self::Base64 => {
                let text = std::str::from_utf8(raw).map_err(|_| self.malformed())?;
                BASE64
                    .decode(text)
                    .map(Cow::Owned)
                    .map_err(|_| self.malformed())
            }
            Self::Hex => {
                let text = std::str::from_utf8(raw).map_err(|_| self.malformed())?;
                hex::decode(text)
                    .map(Cow::Owned)
                    .map_err(|_| self.malformed())
            }
        }
    }

    fn malformed(self) -> ConfigurationError {
        ConfigurationError::MalformedBody { encoding: self }
    }
}

impl fmt::Display for BodyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => write!(f, "utf-8"),
            Self::Base64 => write!(f, "base64"),
            Self::Hex => write!(f, "hex"),
        }
    }
}

impl FromStr for BodyEncoding {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "base64" => Ok(Self::Base64),
            "hex" => Ok(Self::Hex),
            _ => Err(ConfigurationError::UnsupportedEncoding {
                name: s.to_string(),
            }),
        }
    }
}
