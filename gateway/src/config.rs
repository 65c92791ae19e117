use anyhow::{ensure, Context, Result};

use crate::verify::VerifyConfig;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub secret: String,
    pub port: u16,
    pub max_body_bytes: usize,
    pub verify: VerifyConfig,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("WEBHOOK_SECRET").context("WEBHOOK_SECRET is required")?;
        ensure!(!secret.is_empty(), "WEBHOOK_SECRET must not be empty");

        let algorithm =
            std::env::var("WEBHOOK_ALGORITHM").unwrap_or_else(|_| "sha256".to_string());
        let encoding =
            std::env::var("WEBHOOK_BODY_ENCODING").unwrap_or_else(|_| "utf8".to_string());
        let hmac_header = std::env::var("WEBHOOK_HMAC_HEADER")
            .unwrap_or_else(|_| "X-Shopify-Hmac-Sha256".to_string());

        // Unknown algorithms or encodings abort startup, not the first delivery
        let verify = VerifyConfig::from_options(&algorithm, &encoding, &hmac_header)
            .context("invalid webhook verification options")?;

        Ok(Self {
            secret,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid u16")?,
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| "1048576".to_string())
                .parse()
                .context("MAX_BODY_BYTES must be a valid usize")?,
            verify,
        })
    }
}
