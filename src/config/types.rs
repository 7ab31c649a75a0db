use serde::Deserialize;
use url::Url;

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("site-crawler/", env!("CARGO_PKG_VERSION"));

/// Complete, validated configuration for one crawl run
#[derive(Debug, Clone)]
pub struct Config {
    pub crawl: CrawlSettings,
    pub http: HttpConfig,
}

/// Crawl boundary and limits, taken from the command line
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Seed URL; its authority is the crawl boundary
    pub base_url: Url,

    /// Maximum number of distinct pages to register
    pub max_pages: usize,

    /// Maximum number of units of work executing at once
    pub max_concurrency: usize,
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// User-Agent header value
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Layout of the optional TOML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub http: HttpConfig,
}
