use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

use super::encoding::BodyEncoding;
use super::error::ConfigurationError;

/// Keyed-hash digest used to sign the webhook body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    HmacSha256,
    HmacSha384,
    HmacSha512,
}

impl Algorithm {
    /// Name as accepted in configuration.
    pub fn name(self) -> &'static str {
        match self {
            Self::HmacSha256 => "sha256",
            Self::HmacSha384 => "sha384",
            Self::HmacSha512 => "sha512",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_ascii_lowercase();
        match name.strip_prefix("hmac-").unwrap_or(&name) {
            "sha256" => Ok(Self::HmacSha256),
            "sha384" => Ok(Self::HmacSha384),
            "sha512" => Ok(Self::HmacSha512),
            _ => Err(ConfigurationError::UnsupportedAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

/// Compute the base64-encoded keyed digest of a webhook body.
///
/// The body is interpreted under `encoding`, then fed to an HMAC keyed by
/// `secret`. Deterministic and side-effect free: identical inputs always
/// yield the identical signature string.
pub fn compute_signature(
    secret: &str,
    raw_body: &[u8],
    algorithm: Algorithm,
    encoding: BodyEncoding,
) -> Result<String, ConfigurationError> {
    let payload = encoding.decode(raw_body)?;

    let digest = match algorithm {
        Algorithm::HmacSha256 => keyed_digest::<Hmac<Sha256>>(secret, &payload),
        Algorithm::HmacSha384 => keyed_digest::<Hmac<Sha384>>(secret, &payload),
        Algorithm::HmacSha512 => keyed_digest::<Hmac<Sha512>>(secret, &payload),
    };

    Ok(BASE64.encode(digest))
}

fn keyed_digest<M>(secret: &str, payload: &[u8]) -> Vec<u8>
where
    M: Mac + KeyInit,
{
    let mut mac =
        <M as Mac>::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "s3cr3t";
    const BODY: &[u8] = br#"{"id":1}"#;
    const BODY_SIGNATURE: &str = "z1PTSunFKhGV0B2iDV3egGE8TThlQMRrvLklMBTdxQU=";

    #[test]
    fn test_known_vector_sha256() {
        let sig =
            compute_signature(SECRET, BODY, Algorithm::HmacSha256, BodyEncoding::Utf8).unwrap();
        assert_eq!(sig, BODY_SIGNATURE);
    }

    #[test]
    fn test_bitbucket_docs_vector() {
        // Test data from Atlassian's Bitbucket Cloud webhook documentation,
        // re-rendered as base64
        let sig = compute_signature(
            "It's a Secret to Everybody",
            b"Hello World!",
            Algorithm::HmacSha256,
            BodyEncoding::Utf8,
        )
        .unwrap();
        assert_eq!(sig, "pHccOfvpDzF8eCToPd7zyq6cs9l2whSs4fKTfhMyY8k=");
    }

    #[test]
    fn test_deterministic() {
        let first =
            compute_signature(SECRET, BODY, Algorithm::HmacSha256, BodyEncoding::Utf8).unwrap();
        let second =
            compute_signature(SECRET, BODY, Algorithm::HmacSha256, BodyEncoding::Utf8).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_body() {
        let sig =
            compute_signature(SECRET, b"", Algorithm::HmacSha256, BodyEncoding::Utf8).unwrap();
        assert_eq!(sig, "PIHMlJbhwlJQ9sy4X2l8G7Yj40gNZTitjLamZIFCd30=");
    }

    #[test]
    fn test_sha512_vector() {
        let sig =
            compute_signature(SECRET, BODY, Algorithm::HmacSha512, BodyEncoding::Utf8).unwrap();
        assert_eq!(
            sig,
            "MKQdBEU65T5hGvm9ED9xmbbi4e+dy0sl8R9Fud1LWm9QqxpF3aGefn6U0pxJ+WcgE+U40hcaWzOiVi2jvG92sg=="
        );
        assert_ne!(sig, BODY_SIGNATURE);
    }

    #[test]
    fn test_tampered_body_changes_signature() {
        let tampered =
            compute_signature(SECRET, br#"{"id":2}"#, Algorithm::HmacSha256, BodyEncoding::Utf8)
                .unwrap();
        assert_ne!(tampered, BODY_SIGNATURE);
    }

    #[test]
    fn test_parse_algorithm_names() {
        assert_eq!("sha256".parse::<Algorithm>().unwrap(), Algorithm::HmacSha256);
        assert_eq!("SHA256".parse::<Algorithm>().unwrap(), Algorithm::HmacSha256);
        assert_eq!(
            "hmac-sha384".parse::<Algorithm>().unwrap(),
            Algorithm::HmacSha384
        );
        assert_eq!("sha512".parse::<Algorithm>().unwrap(), Algorithm::HmacSha512);
    }

    #[test]
    fn test_parse_rejects_unknown_algorithm() {
        let err = "md17".parse::<Algorithm>().unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnsupportedAlgorithm {
                name: "md17".to_string()
            }
        );
    }
}
