//! Client configuration options.

use std::time::Duration;

use url::Url;

use crate::{Error, Result};

/// Default API host.
pub const DEFAULT_API_HOST: &str = "api.domo.com";

/// Default OAuth scopes requested with the client-credentials grant.
pub const DEFAULT_SCOPE: &str = "data user";

/// Configuration for the Domo client.
///
/// # Example
///
/// ```
/// use domo_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_log_name("nightly-sync")
///     .with_proxy("http://proxy.internal:3128");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API host, without scheme
    pub api_host: String,
    /// Whether to talk to the host over HTTPS
    pub use_https: bool,
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Optional proxy URL applied to all requests
    pub proxy: Option<String>,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
    /// OAuth scopes requested with the token
    pub scope: Option<String>,
    /// Name attached to this client's log span
    pub log_name: Option<String>,
    /// Chunked upload tuning
    pub upload: UploadConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            use_https: true,
            timeout: Duration::from_secs(30),
            user_agent: format!("domo-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            proxy: None,
            accept_invalid_certs: false,
            scope: Some(DEFAULT_SCOPE.to_string()),
            log_name: None,
            upload: UploadConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API host (e.g. `api.domo.com`).
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    /// Choose between HTTPS and plain HTTP.
    pub fn with_https(mut self, enabled: bool) -> Self {
        self.use_https = enabled;
        self
    }

    /// Point the client at a full base URL such as `http://127.0.0.1:8080`.
    ///
    /// Sets both the host and the scheme.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        if let Some(host) = base_url.strip_prefix("https://") {
            self.use_https = true;
            self.api_host = host.trim_end_matches('/').to_string();
        } else if let Some(host) = base_url.strip_prefix("http://") {
            self.use_https = false;
            self.api_host = host.trim_end_matches('/').to_string();
        } else {
            self.api_host = base_url.trim_end_matches('/').to_string();
        }
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Route all requests through a proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Disable TLS certificate verification.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set the OAuth scopes requested with the token.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Request a token without an explicit scope.
    pub fn without_scope(mut self) -> Self {
        self.scope = None;
        self
    }

    /// Name this client in its log output.
    pub fn with_log_name(mut self, name: impl Into<String>) -> Self {
        self.log_name = Some(name.into());
        self
    }

    /// Set the chunked upload configuration.
    pub fn with_upload(mut self, upload: UploadConfig) -> Self {
        self.upload = upload;
        self
    }

    /// Base URL derived from the scheme and host.
    pub fn base_url(&self) -> Result<Url> {
        if self.api_host.is_empty() {
            return Err(Error::Config("api_host must not be empty".to_string()));
        }
        let scheme = if self.use_https { "https" } else { "http" };
        Ok(Url::parse(&format!("{}://{}", scheme, self.api_host))?)
    }

    pub(crate) fn build_http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .danger_accept_invalid_certs(self.accept_invalid_certs);

        if let Some(ref proxy) = self.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy '{proxy}': {e}")))?;
            builder = builder.proxy(proxy);
        }

        Ok(builder.build()?)
    }
}

/// Configuration for chunked stream uploads.
///
/// Chunk sizes are estimated, not measured: the in-memory footprint of a
/// table is divided by `compression_ratio` and compared against
/// `target_chunk_bytes`.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Target size of one uploaded part, in bytes
    pub target_chunk_bytes: u64,
    /// Assumed ratio between in-memory size and uploaded size
    pub compression_ratio: f64,
    /// Gzip each part and send it with `Content-Encoding: gzip`
    pub compress_parts: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            target_chunk_bytes: 10_000 * 1024,
            compression_ratio: 3.0,
            compress_parts: false,
        }
    }
}

impl UploadConfig {
    /// Set the target part size in kilobytes.
    pub fn with_target_chunk_kbytes(mut self, kbytes: u64) -> Self {
        self.target_chunk_bytes = kbytes * 1024;
        self
    }

    /// Set the target part size in bytes.
    pub fn with_target_chunk_bytes(mut self, bytes: u64) -> Self {
        self.target_chunk_bytes = bytes;
        self
    }

    /// Set the assumed compression ratio.
    pub fn with_compression_ratio(mut self, ratio: f64) -> Self {
        self.compression_ratio = ratio;
        self
    }

    /// Enable or disable gzip compression of parts.
    pub fn with_compressed_parts(mut self, enabled: bool) -> Self {
        self.compress_parts = enabled;
        self
    }

    /// Byte budget for one chunk measured in in-memory bytes.
    pub(crate) fn in_memory_budget(&self) -> f64 {
        self.target_chunk_bytes as f64 * self.compression_ratio
    }
}
