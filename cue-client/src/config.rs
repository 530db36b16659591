//! Client configuration

/// Client configuration for connecting to the persistence service
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | SERVER_URL | http://localhost:4000 | 持久化服务地址 |
/// | REQUEST_TIMEOUT_SECS | 30 | HTTP 请求超时(秒) |
/// | REFRESH_INTERVAL_SECS | 30 | 定时拉取间隔(秒) |
/// | DEBOUNCE_SECS | 3 | 桌台写入防抖窗口(秒) |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:4000")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Interval between background refresh pulls, in seconds
    pub refresh_interval_secs: u64,

    /// Quiescence window for debounced table writes, in seconds
    pub debounce_secs: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            refresh_interval_secs: 30,
            debounce_secs: 3,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:4000".into());
        let mut config = Self::new(base_url);
        if let Some(timeout) = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = timeout;
        }
        if let Some(interval) = std::env::var("REFRESH_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.refresh_interval_secs = interval;
        }
        if let Some(debounce) = std::env::var("DEBOUNCE_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.debounce_secs = debounce;
        }
        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the background refresh interval
    pub fn with_refresh_interval(mut self, seconds: u64) -> Self {
        self.refresh_interval_secs = seconds;
        self
    }

    /// Set the debounce window for table writes
    pub fn with_debounce(mut self, seconds: u64) -> Self {
        self.debounce_secs = seconds;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:4000")
    }
}
