//!
//! src/config.rs  Andrew Belles  Oct 18th, 2026
//!
//! Loads environment driven configuration for the spotify adapter,
//! http behaviour, the feature worker pool, output and logging
//!

use url::Url;
use std::time;
use std::path::PathBuf;
use crate::SbiError;

/// Constants for HTTP Config
pub const HTTP_TIMEOUT: u64 = 8000;
pub const HTTP_CONNECT_TIMEOUT: u64 = 2000;
pub const HTTP_POOL_MAX_IDLE: usize = 16;
pub const HTTP_POOL_IDLE_TIMEOUT: u64 = 90000;
pub const HTTP_MAX_REDIRECTS: u8 = 4;

pub const RETRY_MAX_ATTEMPTS: u8 = 4;
pub const RETRY_BASE_BACKOFF: u64 = 250;
pub const RETRY_JITTER: bool = true;
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

pub const SPOTIFY_MIN_INTERVAL: u64 = 50;
pub const SPOTIFY_PAGE_LIMIT: u32 = 50;

pub const FEATURE_CONCURRENCY: usize = 4;
pub const OUTPUT_DIR: &str = "./data/processed";

/// Wrapper over env::var to return an invalid enviroment var error
fn env_check(s: &str) -> Result<String, SbiError> {
    match std::env::var(s) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(SbiError::Config(format!("{s} was not set"))),
    }
}

/// Parses an optional numeric env var, falling back to default when unset
/// or unparsable
fn env_or<T: std::str::FromStr>(s: &str, default: T) -> T {
    match std::env::var(s) {
        Ok(v) => v.trim().parse::<T>().unwrap_or(default),
        Err(_) => default
    }
}

/// Ensures that url is https
fn ensure_https(url: &Url) -> Result<(), String> {
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(format!("URL must be https: {url}"))
    }
}

fn ensure_host(url: &Url, expected_host: &str) -> Result<(), String> {
    match url.host_str() {
        Some(h) if h.eq_ignore_ascii_case(expected_host) => Ok(()),
        Some(h) => Err(
            format!("Unexpected host for {url} (got {h}, expected {expected_host})")
        ),
        None => Err(format!("URL missing host: {url}"))
    }
}

fn ensure_trailing_slash(url: &mut Url) {
    if !url.path().ends_with('/') {
        let mut path = url.path().to_string();
        path.push('/');
        url.set_path(&path);
    }
}

/// Parses and validates an endpoint url against its expected host
fn parse_endpoint(var: &str, raw: &str, host: &str) -> Result<Url, SbiError> {
    let url = Url::parse(raw)
        .map_err(|e| SbiError::Config(format!("{var} invalid {e}")))?;
    ensure_https(&url).map_err(SbiError::Config)?;
    ensure_host(&url, host).map_err(SbiError::Config)?;
    Ok(url)
}

/// Configuration that Spotify expects when hitting endpoints
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: Url,
    pub api_base: Url,
    pub market: Option<String>,
    pub min_interval: time::Duration,
    pub page_limit: u32
}

fn build_spotify() -> Result<SpotifyConfig, SbiError> {
    let client_id     = env_check("SPOTIFY_CLIENT_ID")?;
    let client_secret = env_check("SPOTIFY_CLIENT_SECRET")?;

    // form urls
    let token_url = std::env::var("SPOTIFY_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string());
    let api_base  = std::env::var("SPOTIFY_API_BASE")
        .unwrap_or_else(|_| "https://api.spotify.com/v1/".to_string());

    let token_url = parse_endpoint(
        "SPOTIFY_TOKEN_URL", &token_url, "accounts.spotify.com")?;
    let mut api_base = parse_endpoint(
        "SPOTIFY_API_BASE", &api_base, "api.spotify.com")?;
    ensure_trailing_slash(&mut api_base);

    let market = std::env::var("SPOTIFY_MARKET")
        .ok()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    let min_interval = time::Duration::from_millis(
        env_or("SPOTIFY_MIN_INTERVAL_MS", SPOTIFY_MIN_INTERVAL)
    );

    Ok( SpotifyConfig {
        client_id,
        client_secret,
        token_url,
        api_base,
        market,
        min_interval,
        page_limit: SPOTIFY_PAGE_LIMIT
    })
}

///
/// Configuration for Http timeouts, retries, etc.
///
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u8,
    pub base_backoff: time::Duration,
    pub jitter: bool,
    pub retryable_statuses: Vec<u16>
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            base_backoff: time::Duration::from_millis(RETRY_BASE_BACKOFF),
            jitter: RETRY_JITTER,
            retryable_statuses: RETRYABLE_STATUSES.to_vec()
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: time::Duration,
    pub connect_timeout: time::Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: time::Duration,
    pub max_redirects: u8,
    pub retry: RetryConfig
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: time::Duration::from_millis(HTTP_TIMEOUT),
            connect_timeout: time::Duration::from_millis(HTTP_CONNECT_TIMEOUT),
            pool_max_idle_per_host: HTTP_POOL_MAX_IDLE,
            pool_idle_timeout: time::Duration::from_millis(HTTP_POOL_IDLE_TIMEOUT),
            max_redirects: HTTP_MAX_REDIRECTS,
            retry: RetryConfig::default()
        }
    }
}

///
/// Configuration for the joiner's bounded worker pool. A single worker
/// keeps feature lookups strictly sequential.
///
#[derive(Debug, Clone)]
pub struct ConcurrencyConfig {
    pub feature_concurrency: usize,
    pub fetch_duration: bool
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            feature_concurrency: FEATURE_CONCURRENCY,
            fetch_duration: true
        }
    }
}

fn build_concurrency() -> ConcurrencyConfig {
    let feature_concurrency = env_or("SBI_FEATURE_CONCURRENCY", FEATURE_CONCURRENCY)
        .max(1);
    ConcurrencyConfig { feature_concurrency, ..ConcurrencyConfig::default() }
}

///
/// Configuration for the tabular output sink
///
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from(OUTPUT_DIR) }
    }
}

fn build_output() -> OutputConfig {
    match std::env::var("SBI_OUTPUT_DIR") {
        Ok(dir) if !dir.trim().is_empty() => OutputConfig { dir: PathBuf::from(dir) },
        _ => OutputConfig::default()
    }
}

///
/// Configuration for Logger
///

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<LogFormat> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json"   => Some(LogFormat::Json),
            _ => None
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub include_file_line: bool,
    pub include_target: bool
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: "info,sbi_crawler=debug,reqwest=warn".to_string(),
            format: LogFormat::Pretty,
            with_ansi: true,
            include_file_line: false,
            include_target: true
        }
    }
}

fn build_logging() -> LoggingConfig {
    let format = std::env::var("SBI_LOG_FORMAT")
        .ok()
        .and_then(|f| LogFormat::parse(&f))
        .unwrap_or(LogFormat::Pretty);

    // json is meant for collectors, keep it free of escape codes
    let json = format == LogFormat::Json;
    LoggingConfig {
        format,
        with_ansi: !json,
        include_file_line: json,
        ..LoggingConfig::default()
    }
}

///
/// AppConfig which holds everything the adapter and pipeline need
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spotify: SpotifyConfig,
    pub http: HttpConfig,
    pub concurrency: ConcurrencyConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig
}

///
/// Return all environment variables to caller at program start.
///
pub fn load_config() -> Result<AppConfig, SbiError> {
    dotenvy::dotenv().ok();

    let spotify     = build_spotify()?;
    let http        = HttpConfig::default();
    let concurrency = build_concurrency();
    let output      = build_output();
    let logging     = build_logging();

    Ok( AppConfig { spotify, http, concurrency, output, logging } )
}
