//! Container configuration and provider URL construction.

use relay_types::{Origin, OriginError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Container errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("Invalid provider URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid instance id: {0}")]
    InvalidInstanceId(String),

    #[error(transparent)]
    Origin(#[from] OriginError),
}

/// Where the provider is loaded from and which instance this is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Provider page, without query.
    pub provider_url_base: String,
    /// Distinguishes containers of the same client on one page.
    pub instance_id: String,
}

impl FrameConfig {
    pub fn new(provider_url_base: impl Into<String>, instance_id: impl Into<String>) -> Self {
        Self {
            provider_url_base: provider_url_base.into(),
            instance_id: instance_id.into(),
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), FrameError> {
        self.base_url()?;
        if self.instance_id.is_empty() || self.instance_id.chars().any(char::is_whitespace) {
            return Err(FrameError::InvalidInstanceId(format!(
                "'{}' must be non-empty and contain no whitespace",
                self.instance_id
            )));
        }
        Ok(())
    }

    /// Parsed `provider_url_base`. Must be http(s) and carry no query.
    pub fn base_url(&self) -> Result<Url, FrameError> {
        let invalid = |reason: &str| FrameError::InvalidUrl {
            url: self.provider_url_base.clone(),
            reason: reason.to_string(),
        };

        let url = Url::parse(&self.provider_url_base).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if url.query().is_some() {
            return Err(invalid("must not carry a query"));
        }
        Ok(url)
    }

    /// Origin the provider window will have.
    pub fn provider_origin(&self) -> Result<Origin, FrameError> {
        Ok(Origin::parse(&self.provider_url_base)?)
    }

    /// URL the container loads for `client_origin`.
    pub fn provider_url(&self, client_origin: &Origin) -> Result<Url, FrameError> {
        self.validate()?;
        Ok(provider_frame_url(
            &self.base_url()?,
            client_origin,
            &self.instance_id,
        ))
    }
}

/// `base?client=<client origin>&id=<instance id>`, both query-encoded.
pub fn provider_frame_url(base: &Url, client_origin: &Origin, instance_id: &str) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("client", client_origin.as_str())
        .append_pair("id", instance_id);
    url
}
