/// The backend address used when none is specified.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Builder for [`BackendConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BackendConfigBuilder {
    base_url: Option<String>,
}

impl BackendConfigBuilder {
    /// Creates a builder with the given base URL.
    #[inline]
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: Some(base_url.into()),
        }
    }

    /// Builds the configuration.
    ///
    /// Trailing slashes of the base URL are trimmed, so that endpoint paths
    /// can be appended directly.
    #[inline]
    pub fn build(self) -> BackendConfig {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        BackendConfig {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

/// Configuration for the chat backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BackendConfig {
    pub(crate) base_url: String,
}

impl BackendConfig {
    /// Returns the base URL of the backend.
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[inline]
    pub(crate) fn chat_url(&self) -> String {
        format!("{}{}", self.base_url, "/api/chat")
    }

    #[inline]
    pub(crate) fn health_url(&self) -> String {
        format!("{}{}", self.base_url, "/api/health")
    }
}

impl Default for BackendConfig {
    #[inline]
    fn default() -> Self {
        BackendConfigBuilder::default().build()
    }
}
