//! Webhook signature verification.
//!
//! Recomputes the HMAC over the raw request body and compares it, in
//! constant time, against the base64 signature presented in a request
//! header. The raw body must be captured upstream of any parsing
//! middleware; a re-encoded body would no longer match the signature.

mod algorithm;
mod encoding;
mod error;

pub use algorithm::{compute_signature, Algorithm};
pub use encoding::BodyEncoding;
pub use error::{AuthenticationError, ConfigurationError, VerifyError};

use std::net::IpAddr;

use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, HeaderName};
use subtle::ConstantTimeEq;
use tracing::debug;

/// Header the signature is looked up under when none is configured.
pub const DEFAULT_HMAC_HEADER: &str = "x-shopify-hmac-sha256";

/// Effective verification parameters, resolved once and reused per request.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    pub algorithm: Algorithm,
    pub encoding: BodyEncoding,
    /// Name of the header to look the signature up under, not its value.
    pub hmac_header: HeaderName,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            encoding: BodyEncoding::default(),
            hmac_header: HeaderName::from_static(DEFAULT_HMAC_HEADER),
        }
    }
}

impl VerifyConfig {
    /// Parse the string forms used in configuration, rejecting unknown
    /// algorithms, unknown encodings, and malformed header names up front.
    pub fn from_options(
        algorithm: &str,
        encoding: &str,
        hmac_header: &str,
    ) -> Result<Self, ConfigurationError> {
        let hmac_header = HeaderName::try_from(hmac_header).map_err(|_| {
            ConfigurationError::InvalidHeaderName {
                name: hmac_header.to_string(),
            }
        })?;

        Ok(Self {
            algorithm: algorithm.parse()?,
            encoding: encoding.parse()?,
            hmac_header,
        })
    }
}

/// Borrowed view of the parts of an inbound request the verifier reads.
///
/// `body` must be the exact bytes as received from the wire.
#[derive(Debug)]
pub struct WebhookRequest<'a> {
    pub headers: &'a HeaderMap,
    pub body: &'a [u8],
    pub client_ip: IpAddr,
}

impl WebhookRequest<'_> {
    /// Case-insensitive header lookup; non-UTF-8 values read as absent.
    fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    fn user_agent(&self) -> &str {
        self.header(&USER_AGENT).unwrap_or("unknown")
    }
}

/// Check the authenticity of an inbound webhook.
///
/// Recomputes the keyed digest over the raw body and compares it against
/// the signature presented in the configured header. Succeeds silently; a
/// mismatch, including an absent or empty header, fails with the client
/// address and user agent attached for audit logging.
pub fn verify(
    request: &WebhookRequest<'_>,
    secret: &str,
    config: &VerifyConfig,
) -> Result<(), VerifyError> {
    debug!(
        header = %config.hmac_header,
        algorithm = %config.algorithm,
        "validating incoming webhook"
    );

    let presented = request.header(&config.hmac_header);
    let expected = compute_signature(secret, request.body, config.algorithm, config.encoding)?;

    let authentic = presented.is_some_and(|value| constant_time_eq(&expected, value));
    if !authentic {
        return Err(VerifyError::Authentication(AuthenticationError {
            client_ip: request.client_ip.to_string(),
            user_agent: request.user_agent().to_string(),
        }));
    }

    Ok(())
}

/// Constant-time string equality, so mismatch timing does not reveal where
/// two signatures first differ. Length is checked separately; `subtle`
/// keeps the byte comparison from being optimized back into an early exit.
fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}
