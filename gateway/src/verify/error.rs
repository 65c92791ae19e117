use thiserror::Error;

use super::encoding::BodyEncoding;

/// Misconfiguration or undecodable input, detected by the digest layer
/// before any signature comparison happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unsupported digest algorithm `{name}`")]
    UnsupportedAlgorithm { name: String },

    #[error("unsupported body encoding `{name}`")]
    UnsupportedEncoding { name: String },

    #[error("request body is not valid {encoding} data")]
    MalformedBody { encoding: BodyEncoding },

    #[error("`{name}` is not a valid HTTP header name")]
    InvalidHeaderName { name: String },
}

/// The recomputed signature did not match the one the sender presented.
///
/// Carries the client address and user agent for audit logging. Neither the
/// secret nor either signature value appears here.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("webhook signature mismatch from {client_ip} ({user_agent})")]
pub struct AuthenticationError {
    pub client_ip: String,
    pub user_agent: String,
}

/// Failure outcome of a verification call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Authentication(#[from] AuthenticationError),
}
