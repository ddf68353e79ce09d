use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Kumo
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Crawl stops once this many URLs have been visited
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Pages are only persisted while the visited count is below this ceiling
    #[serde(rename = "store-page-limit", default = "default_store_page_limit")]
    pub store_page_limit: usize,

    /// Maximum number of HTML tokens scanned per page
    #[serde(rename = "max-tokens", default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Maximum accumulated text length per page
    #[serde(rename = "max-content-length", default = "default_max_content_length")]
    pub max_content_length: usize,

    /// Timeout for a single page fetch (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Timeout for a robots.txt fetch (seconds)
    #[serde(rename = "robots-timeout-secs", default = "default_robots_timeout")]
    pub robots_timeout_secs: u64,

    /// How the visited set counts repeated additions
    #[serde(rename = "visited-counting", default)]
    pub visited_counting: VisitedCounting,
}

impl CrawlerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn robots_timeout(&self) -> Duration {
        Duration::from_secs(self.robots_timeout_secs)
    }
}

/// Counting policy for the visited set
///
/// `EveryAdd` increments the counter on every `add`, even when the URL hash is
/// already present, so the reported crawled count can exceed the number of
/// distinct URLs. `Distinct` only counts newly inserted hashes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisitedCounting {
    #[default]
    EveryAdd,
    Distinct,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the robots.txt group it obeys
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the HTTP `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Whether pages are written to SQLite; when false they are kept in memory
    #[serde(default)]
    pub enabled: bool,

    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Remove pages stored by a previous run when the database is opened
    #[serde(rename = "clear-on-start", default = "default_true")]
    pub clear_on_start: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_database_path(),
            clear_on_start: true,
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Stats sampling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// Interval between samples appended to the stats series (seconds)
    #[serde(rename = "sample-interval-secs", default = "default_sample_interval")]
    pub sample_interval_secs: u64,

    /// Interval between live snapshots pushed to subscribers (seconds)
    #[serde(rename = "publish-interval-secs", default = "default_publish_interval")]
    pub publish_interval_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: default_sample_interval(),
            publish_interval_secs: default_publish_interval(),
        }
    }
}

fn default_max_pages() -> usize {
    5000
}

fn default_store_page_limit() -> usize {
    1000
}

fn default_max_tokens() -> usize {
    25_000
}

fn default_max_content_length() -> usize {
    15_000
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_robots_timeout() -> u64 {
    10
}

fn default_database_path() -> String {
    "./kumo.db".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_sample_interval() -> u64 {
    60
}

fn default_publish_interval() -> u64 {
    5
}

fn default_true() -> bool {
    true
}
