//! Endpoint URL configuration.
//!
//! Responses carry absolute URLs in `meta.location`. [`ScimServerConfig`]
//! holds the parts those URLs are built from; anything else that can supply
//! a base URL implements [`BaseUrlProvider`].

use crate::error::{ScimError, ScimResult};

use serde::{Deserialize, Serialize};

/// Supplies the base URL of the SCIM service.
pub trait BaseUrlProvider: Send + Sync {
    /// Base URL without a trailing slash, e.g. `https://scim.example.com/v2`.
    fn base_url(&self) -> String;
}

/// A base URL fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticBaseUrlProvider {
    base_url: String,
}

impl StaticBaseUrlProvider {
    /// Create a provider for a fixed base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is blank.
    pub fn new(base_url: impl Into<String>) -> ScimResult<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(ScimError::internal("Base URL cannot be empty"));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl BaseUrlProvider for StaticBaseUrlProvider {
    fn base_url(&self) -> String {
        self.base_url.clone()
    }
}

/// Configuration for SCIM endpoint URLs.
///
/// # Examples
///
/// ```rust
/// use scim_trim::config::ScimServerConfig;
///
/// let config: ScimServerConfig =
///     serde_json::from_str(r#"{"base_url": "https://scim.example.com"}"#).unwrap();
/// assert_eq!(config.scim_version, "v2");
/// assert_eq!(config.endpoint_url("/Users"), "https://scim.example.com/v2/Users");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScimServerConfig {
    /// Base URL for the SCIM server (without the version path segment).
    /// Examples: "https://scim.example.com", "https://api.company.com"
    pub base_url: String,

    /// SCIM protocol version used as a path segment. Defaults to "v2".
    pub scim_version: String,
}

impl Default for ScimServerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost".to_string(),
            scim_version: "v2".to_string(),
        }
    }
}

impl ScimServerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_scim_version(mut self, scim_version: impl Into<String>) -> Self {
        self.scim_version = scim_version.into();
        self
    }

    /// URL of a resource type endpoint such as `/Users`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.versioned_base_url(),
            endpoint.trim_start_matches('/')
        )
    }

    /// URL of a single resource, as used for `meta.location` and `$ref` values.
    pub fn resource_url(&self, endpoint: &str, resource_id: &str) -> String {
        format!("{}/{}", self.endpoint_url(endpoint), resource_id)
    }

    /// Validate the configuration.
    ///
    /// Ensures the base URL and other configuration parameters are valid.
    pub fn validate(&self) -> ScimResult<()> {
        if self.base_url.is_empty() {
            return Err(ScimError::internal("Base URL cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ScimError::internal(
                "Base URL must start with http:// or https://",
            ));
        }

        if self.scim_version.is_empty() {
            return Err(ScimError::internal("SCIM version cannot be empty"));
        }

        Ok(())
    }

    fn versioned_base_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let version = self.scim_version.trim_matches('/');
        if version.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, version)
        }
    }
}

impl BaseUrlProvider for ScimServerConfig {
    fn base_url(&self) -> String {
        self.versioned_base_url()
    }
}
