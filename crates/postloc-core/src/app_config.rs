use std::net::SocketAddr;
use std::path::PathBuf;

/// Settings for the postcode proxy server.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Credential sent upstream as `auth-key`. `None` makes every lookup fail
    /// with a misconfiguration error instead of blocking startup.
    pub auspost_api_key: Option<String>,
    pub auspost_base_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "auspost_api_key",
                &self.auspost_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("auspost_base_url", &self.auspost_base_url)
            .finish()
    }
}

/// Settings for the price localizer client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizerConfig {
    /// Origin of the deployed postcode proxy, e.g. `https://spasdirect.vercel.app`.
    pub proxy_url: String,
    pub geocode_url: String,
    /// Cart endpoint that purchase links point at. Existing query parameters
    /// (such as `name`) are kept when links are rewritten.
    pub cart_url: String,
    pub cache_path: PathBuf,
    pub log_level: String,
}
