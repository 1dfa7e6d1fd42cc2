//! Client configuration.
//!
//! Options are fixed once a `CommentsClient` is constructed from them.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://example.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1000);
pub const USER_AGENT: &str = "api-example-comments-client";

/// Supplies the `Authorization` header value for each request.
pub trait AuthorizationProvider: Send + Sync {
    fn authorization(&self) -> String;
}

impl<F> AuthorizationProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn authorization(&self) -> String {
        self()
    }
}

/// Provider that always yields an empty header value.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyAuthorization;

impl AuthorizationProvider for EmptyAuthorization {
    fn authorization(&self) -> String {
        String::new()
    }
}

#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) base_url: String,
    pub(crate) app_name: String,
    pub(crate) timeout: Duration,
    pub(crate) authorization: Arc<dyn AuthorizationProvider>,
}

impl ClientConfig {
    pub fn new(app_name: &str) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            app_name: app_name.to_string(),
            timeout: DEFAULT_TIMEOUT,
            authorization: Arc::new(EmptyAuthorization),
        }
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn authorization(mut self, provider: impl AuthorizationProvider + 'static) -> Self {
        self.authorization = Arc::new(provider);
        self
    }

    /// `User-Agent` header value: `<client-name>/<application-name>`.
    pub fn user_agent(&self) -> String {
        format!("{USER_AGENT}/{}", self.app_name)
    }

    pub fn request_timeout(&self) -> Duration {
        self.timeout
    }
}

// The provider is opaque and may hold credentials.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("app_name", &self.app_name)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
