/// The authorizer claim that carries the encoded authentication data.
pub const DEFAULT_AUTH_CLAIM: &str = "janisAuth";

/// Configuration for a [`ServerlessHandler`](super::ServerlessHandler).
///
/// # Example
///
/// ```rust,ignore
/// let config = HandlerConfig::new()
///     .auth_claim("customAuth")
///     .require_request_path(true);
///
/// let handler = ServerlessHandler::with_config(config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Name of the authorizer claim holding the authentication data.
    pub auth_claim: String,
    /// Answer `500` to invocations without a `requestPath`.
    pub require_request_path: bool,
}

impl HandlerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the authorizer claim name. Defaults to `janisAuth`.
    pub fn auth_claim(mut self, claim: impl Into<String>) -> Self {
        self.auth_claim = claim.into();
        self
    }

    /// Require the `requestPath` mapping. Defaults to `false`.
    pub fn require_request_path(mut self, require: bool) -> Self {
        self.require_request_path = require;
        self
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            auth_claim: DEFAULT_AUTH_CLAIM.to_string(),
            require_request_path: false,
        }
    }
}
