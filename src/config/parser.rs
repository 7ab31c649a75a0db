use crate::config::types::{Config, CrawlSettings, FileConfig, HttpConfig};
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use std::path::Path;
use url::Url;

/// Loads HTTP client settings from a TOML file
///
/// Every key is optional; missing keys keep their defaults.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(HttpConfig)` - Settings read from the file
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn load_http_config(path: &Path) -> ConfigResult<HttpConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_http_config(&content)
}

/// Parses HTTP client settings from TOML text
pub fn parse_http_config(content: &str) -> ConfigResult<HttpConfig> {
    let file: FileConfig = toml::from_str(content)?;
    Ok(file.http)
}

/// Assembles and validates the configuration for one run
///
/// # Arguments
///
/// * `base_url` - Seed URL as given on the command line
/// * `max_pages` - Page limit
/// * `max_concurrency` - Concurrency budget capacity
/// * `http` - HTTP client settings
///
/// # Returns
///
/// * `Ok(Config)` - A configuration that is safe to crawl with
/// * `Err(ConfigError)` - The seed URL or a limit is invalid
///
/// # Example
///
/// ```
/// use site_crawler::config::{build_config, HttpConfig};
///
/// let config = build_config("https://example.com", 10, 2, HttpConfig::default()).unwrap();
/// assert_eq!(config.crawl.base_url.host_str(), Some("example.com"));
/// ```
pub fn build_config(
    base_url: &str,
    max_pages: usize,
    max_concurrency: usize,
    http: HttpConfig,
) -> ConfigResult<Config> {
    let base_url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", base_url, e)))?;

    let config = Config {
        crawl: CrawlSettings {
            base_url,
            max_pages,
            max_concurrency,
        },
        http,
    };

    validate(&config)?;

    Ok(config)
}
