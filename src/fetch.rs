//!
//! src/fetch.rs  Andrew Belles  Oct 18th, 2026
//!
//! Spotify Web API adapter. Builds requests, handles retries, bearer
//! tokens, paging and request spacing, and exposes the result through
//! the CatalogLookup trait
//!

use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use reqwest::{Client, header, redirect, RequestBuilder, StatusCode};
use serde_json::Value;
use tokio::{sync::Mutex, time::sleep};
use tracing::{debug, warn};
use url::Url;

use crate::config::{HttpConfig, RetryConfig, SpotifyConfig};
use crate::lookup::CatalogLookup;
use crate::types::{
    AlbumCategory, AlbumId, AlbumRef, ArtistId, ArtistRef, AudioFeatures,
    TrackId, TrackMeta, TrackRef
};
use crate::SbiError;

const ARTIST_SEARCH_LIMIT: u32 = 10;
const TOKEN_EXPIRY_MARGIN: u64 = 60;

/// Client building functionality
fn client_helper(http: &HttpConfig) -> reqwest::ClientBuilder  {
    Client::builder()
        .timeout(http.timeout)
        .connect_timeout(http.connect_timeout)
        .pool_max_idle_per_host(http.pool_max_idle_per_host)
        .pool_idle_timeout(Some(http.pool_idle_timeout))
        .redirect(redirect::Policy::limited(http.max_redirects as usize))
}

pub fn base_client(http: &HttpConfig) -> Result<Client, SbiError> {
    let mut h = header::HeaderMap::new();
    h.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
    client_helper(http)
        .default_headers(h)
        .build()
        .map_err(|e| SbiError::Http(format!("build client: {e}")))
}

/// Enforces a minimum spacing between consecutive requests
#[derive(Debug)]
struct RateGate {
    min_interval: Duration,
    state: Mutex<Option<Instant>>
}

impl RateGate {
    fn new(min_interval: Duration) -> Self {
        Self { min_interval, state: Mutex::new(None) }
    }

    async fn wait(&self) {
        let mut last = self.state.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Exponential backoff, optionally with 50..=200ms of jitter
fn generate_backoff(retry: &RetryConfig, attempt: u8, rng: &mut SmallRng) -> Duration {
    let base = retry.base_backoff.as_millis() as u64;
    let exp = (1_u64 << attempt.min(6)) * base;
    let jitter = if retry.jitter { rng.gen_range(50..=200) } else { 0 };
    Duration::from_millis(exp + jitter)
}

/// Seconds from a Retry-After header, capped at the longest backoff
fn retry_after(headers: &header::HeaderMap, retry: &RetryConfig) -> Option<Duration> {
    let cap = retry.base_backoff * (1_u32 << 6);
    headers
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| Duration::from_secs(secs).min(cap))
}

async fn http_with_retry(
    request: RequestBuilder,
    retry: &RetryConfig
) -> Result<Value, SbiError> {
    let mut rng = SmallRng::from_entropy();
    let mut attempt = 0_u8;
    loop {
        let response = request.try_clone()
            .ok_or_else(|| SbiError::Http("non-cloneable request".to_string()))?
            .send()
            .await;
        match response {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    let v = resp.json::<Value>().await?;
                    return Ok(v);
                }
                if status == StatusCode::NOT_FOUND {
                    return Err(SbiError::NotFound(resp.url().path().to_string()));
                }
                let retryable = retry.retryable_statuses.contains(&status.as_u16());
                if !retryable || attempt + 1 >= retry.max_attempts {
                    let url = resp.url().path().to_string();
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        return Err(SbiError::RateLimited(url));
                    }
                    let body = resp.text().await.unwrap_or_default();
                    return Err(SbiError::Http(
                        format!("status {status} for {url} after {attempt} retries: {body}")
                    ));
                }
                let backoff = retry_after(resp.headers(), retry)
                    .unwrap_or_else(|| generate_backoff(retry, attempt, &mut rng));
                warn!(status = %status, backoff = ?backoff.as_millis(), "http.retry");
                sleep(backoff).await;
                attempt += 1;
            },
            Err(e) => {
                if attempt + 1 >= retry.max_attempts {
                    return Err(e.into());
                }
                let backoff = generate_backoff(retry, attempt, &mut rng);
                warn!(error = %e, backoff = ?backoff.as_millis(), "http.retry.error");
                sleep(backoff).await;
                attempt += 1;
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct SpotifyClient {
    pub http: Client,
    pub cfg: SpotifyConfig
}

impl SpotifyClient {
    pub fn new(http_config: &HttpConfig, cfg: &SpotifyConfig) ->
        Result<Self, SbiError> {

        let http = base_client(http_config)?;
        Ok( Self {
            http,
            cfg: cfg.clone()
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SbiError> {
        self.cfg.api_base.join(path)
            .map_err(|e| SbiError::Config(format!("bad endpoint {path}: {e}")))
    }

    fn with_market(&self, rb: RequestBuilder) -> RequestBuilder {
        match self.cfg.market.as_deref() {
            Some(market) => rb.query(&[("market", market)]),
            None => rb
        }
    }

    pub fn token_request(&self) -> RequestBuilder {
        self.http
            .post(self.cfg.token_url.clone())
            .basic_auth(&self.cfg.client_id, Some(&self.cfg.client_secret))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
    }

    /// GET /v1/search?type=artist&q=artist:...&limit=
    pub fn search_artist(&self, name: &str, limit: u32, bearer: &str) ->
        Result<RequestBuilder, SbiError> {
        let url = self.endpoint("search")?;
        let q = format!("artist:{name}");
        let limit = limit.to_string();
        Ok(self.http.get(url).bearer_auth(bearer).query(&[
            ("type", "artist"),
            ("q", q.as_str()),
            ("limit", limit.as_str())
        ]))
    }

    /// GET /v1/artists/{id}/albums?include_groups=&limit=&offset=
    pub fn artist_albums(&self, artist_id: &str, include_groups: &str, bearer: &str) ->
        Result<RequestBuilder, SbiError> {
        let url = self.endpoint(&format!("artists/{artist_id}/albums"))?;
        let limit = self.cfg.page_limit.to_string();
        let rb = self.http.get(url).bearer_auth(bearer).query(&[
            ("include_groups", include_groups),
            ("limit", limit.as_str()),
            ("offset", "0")
        ]);
        Ok(self.with_market(rb))
    }

    /// GET /v1/albums/{id}/tracks?limit=&offset=
    pub fn album_tracks(&self, album_id: &str, bearer: &str) ->
        Result<RequestBuilder, SbiError> {
        let url = self.endpoint(&format!("albums/{album_id}/tracks"))?;
        let limit = self.cfg.page_limit.to_string();
        let rb = self.http.get(url).bearer_auth(bearer).query(&[
            ("limit", limit.as_str()),
            ("offset", "0")
        ]);
        Ok(self.with_market(rb))
    }

    /// GET /v1/audio-features/{id}
    pub fn audio_features(&self, track_id: &str, bearer: &str) ->
        Result<RequestBuilder, SbiError> {
        let url = self.endpoint(&format!("audio-features/{track_id}"))?;
        Ok(self.http.get(url).bearer_auth(bearer))
    }

    /// GET /v1/tracks/{id}
    pub fn track(&self, track_id: &str, bearer: &str) -> Result<RequestBuilder, SbiError> {
        let url = self.endpoint(&format!("tracks/{track_id}"))?;
        Ok(self.with_market(self.http.get(url).bearer_auth(bearer)))
    }

    /// Follows a paging object's `next` link, which must stay on the api host
    pub fn next_page(&self, next: &str, bearer: &str) -> Result<RequestBuilder, SbiError> {
        let url = Url::parse(next)
            .map_err(|e| SbiError::Parse(format!("next page url {next}: {e}")))?;
        if url.host_str() != self.cfg.api_base.host_str() {
            return Err(SbiError::Parse(format!("next page left api host: {next}")));
        }
        Ok(self.http.get(url).bearer_auth(bearer))
    }
}

#[derive(Debug)]
struct BearerToken {
    value: String,
    expires: Instant
}

///
/// CatalogLookup over the Spotify Web API. One instance is one authenticated
/// session; construct it per run and hand it to the pipeline.
///
pub struct SpotifyCatalog {
    client: SpotifyClient,
    retry: RetryConfig,
    gate: RateGate,
    token: Mutex<Option<BearerToken>>
}

impl SpotifyCatalog {
    pub fn new(http: &HttpConfig, cfg: &SpotifyConfig) -> Result<Self, SbiError> {
        Ok(Self {
            client: SpotifyClient::new(http, cfg)?,
            retry: http.retry.clone(),
            gate: RateGate::new(cfg.min_interval),
            token: Mutex::new(None)
        })
    }

    /// Cached client-credentials token, refreshed shortly before expiry
    async fn bearer(&self) -> Result<String, SbiError> {
        let mut token = self.token.lock().await;
        if let Some(current) = token.as_ref() {
            if Instant::now() < current.expires {
                return Ok(current.value.clone());
            }
        }

        self.gate.wait().await;
        let response = http_with_retry(self.client.token_request(), &self.retry).await?;
        let value = response["access_token"].as_str()
            .ok_or_else(|| SbiError::Http("no access_token in response".into()))?
            .to_string();
        let expires_in = response["expires_in"].as_u64().unwrap_or(3600);
        let expires = Instant::now()
            + Duration::from_secs(expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN));
        debug!(expires_in, "spotify.token.refresh");

        *token = Some(BearerToken { value: value.clone(), expires });
        Ok(value)
    }

    async fn get(&self, request: RequestBuilder) -> Result<Value, SbiError> {
        self.gate.wait().await;
        http_with_retry(request, &self.retry).await
    }

    /// Collects `items` of a paging object across all pages
    async fn paged(&self, first: RequestBuilder, bearer: &str)
        -> Result<Vec<Value>, SbiError> {
        let mut items = Vec::new();
        let mut page = self.get(first).await?;
        loop {
            if let Some(batch) = page.get("items").and_then(Value::as_array) {
                items.extend(batch.iter().cloned());
            }
            let next = match page.get("next").and_then(Value::as_str) {
                Some(next) => next.to_string(),
                None => break
            };
            page = self.get(self.client.next_page(&next, bearer)?).await?;
        }
        Ok(items)
    }
}

fn str_field(item: &Value, key: &str) -> Result<String, SbiError> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SbiError::Parse(format!("missing `{key}` in {item}")))
}

fn unit_field(item: &Value, key: &str) -> Result<f64, SbiError> {
    item.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| SbiError::Parse(format!("missing `{key}` in audio features")))
}

fn parse_artists(search: &Value) -> Result<Vec<ArtistRef>, SbiError> {
    search.pointer("/artists/items")
        .and_then(Value::as_array)
        .map(|items| items.iter()
            .map(|item| -> Result<ArtistRef, SbiError> {
                Ok(ArtistRef {
                    id: ArtistId(str_field(item, "id")?),
                    name: str_field(item, "name")?
                })
            })
            .collect())
        .unwrap_or_else(|| Ok(Vec::new()))
}

/// Duration, album of origin and preview link of a track object
fn parse_track_meta(v: &Value) -> TrackMeta {
    TrackMeta {
        duration_ms: v.get("duration_ms").and_then(Value::as_u64),
        album: v.pointer("/album/name").and_then(Value::as_str).map(str::to_string),
        preview_url: v.get("preview_url").and_then(Value::as_str).map(str::to_string)
    }
}

fn parse_audio_features(track_id: &str, v: &Value) -> Result<AudioFeatures, SbiError> {
    if v.is_null() {
        return Err(SbiError::FeatureNotFound(track_id.to_string()));
    }
    Ok(AudioFeatures {
        energy: unit_field(v, "energy")?,
        valence: unit_field(v, "valence")?,
        danceability: unit_field(v, "danceability")?
    })
}

#[async_trait]
impl CatalogLookup for SpotifyCatalog {
    async fn search_artist(&self, name: &str) -> Result<Vec<ArtistRef>, SbiError> {
        let bearer = self.bearer().await?;
        let search = self.get(
            self.client.search_artist(name, ARTIST_SEARCH_LIMIT, &bearer)?
        ).await?;
        parse_artists(&search)
    }

    async fn list_albums(&self, artist: &ArtistId, category: AlbumCategory)
        -> Result<Vec<AlbumRef>, SbiError> {
        let bearer = self.bearer().await?;
        let first = self.client.artist_albums(&artist.0, category.as_str(), &bearer)?;
        self.paged(first, &bearer).await?
            .iter()
            .map(|item| -> Result<AlbumRef, SbiError> {
                Ok(AlbumRef {
                    id: AlbumId(str_field(item, "id")?),
                    title: str_field(item, "name")?
                })
            })
            .collect()
    }

    async fn list_tracks(&self, album: &AlbumId) -> Result<Vec<TrackRef>, SbiError> {
        let bearer = self.bearer().await?;
        let first = self.client.album_tracks(&album.0, &bearer)?;
        self.paged(first, &bearer).await?
            .iter()
            .map(|item| -> Result<TrackRef, SbiError> {
                Ok(TrackRef {
                    id: TrackId(str_field(item, "id")?),
                    title: str_field(item, "name")?
                })
            })
            .collect()
    }

    async fn get_audio_features(&self, track: &TrackId) -> Result<AudioFeatures, SbiError> {
        let bearer = self.bearer().await?;
        match self.get(self.client.audio_features(&track.0, &bearer)?).await {
            Ok(v) => parse_audio_features(&track.0, &v),
            Err(SbiError::NotFound(_)) => Err(SbiError::FeatureNotFound(track.0.clone())),
            Err(e) => Err(e)
        }
    }

    async fn get_track_meta(&self, track: &TrackId) -> Result<Option<TrackMeta>, SbiError> {
        let bearer = self.bearer().await?;
        match self.get(self.client.track(&track.0, &bearer)?).await {
            Ok(v) => Ok(Some(parse_track_meta(&v))),
            Err(SbiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e)
        }
    }
}

/// Unit Tests
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Loopback http server answering every request through `route`, which
    /// maps the request target to a status and json body. `{base}` in a
    /// body is replaced with the server's own origin.
    async fn fixture<F>(route: F) -> Result<SocketAddr, SbiError>
    where
        F: Fn(&str) -> (u16, String) + Send + Sync + 'static
    {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let route = Arc::new(route);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let route = route.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0_u8; 8192];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();
                    let target = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let (status, body) = route(&target);
                    let body = body.replace("{base}", &format!("http://{addr}"));
                    let response = format!(
                        "HTTP/1.1 {status} Fixture\r\ncontent-type: application/json\r\n\
                         content-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        Ok(addr)
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_attempts: 2,
            base_backoff: Duration::from_millis(1),
            jitter: false,
            ..RetryConfig::default()
        }
    }

    /// Catalog against the fixture with a token already cached
    async fn fixture_catalog(addr: SocketAddr) -> Result<SpotifyCatalog, SbiError> {
        let cfg = SpotifyConfig {
            token_url: Url::parse(&format!("http://{addr}/api/token"))
                .map_err(|e| SbiError::Config(e.to_string()))?,
            api_base: Url::parse(&format!("http://{addr}/v1/"))
                .map_err(|e| SbiError::Config(e.to_string()))?,
            market: None,
            page_limit: 2,
            ..test_config()?
        };
        let http = HttpConfig { retry: fast_retry(), ..HttpConfig::default() };
        let catalog = SpotifyCatalog::new(&http, &cfg)?;
        *catalog.token.lock().await = Some(BearerToken {
            value: "tok".into(),
            expires: Instant::now() + Duration::from_secs(600)
        });
        Ok(catalog)
    }

    fn live() -> bool {
        std::env::var("LIVE_HTTP").ok().as_deref() == Some("1")
    }

    fn test_config() -> Result<SpotifyConfig, SbiError> {
        Ok(SpotifyConfig {
            client_id: "id".into(),
            client_secret: "secret".into(),
            token_url: Url::parse("https://accounts.spotify.com/api/token")
                .map_err(|e| SbiError::Config(e.to_string()))?,
            api_base: Url::parse("https://api.spotify.com/v1/")
                .map_err(|e| SbiError::Config(e.to_string()))?,
            market: Some("DE".into()),
            min_interval: Duration::from_millis(0),
            page_limit: 50
        })
    }

    #[test]
    fn backoff_grows_and_is_capped() {
        let mut rng = SmallRng::seed_from_u64(7);
        let retry = RetryConfig { jitter: false, ..RetryConfig::default() };
        assert_eq!(generate_backoff(&retry, 0, &mut rng), Duration::from_millis(250));
        assert_eq!(generate_backoff(&retry, 2, &mut rng), Duration::from_millis(1000));
        assert_eq!(generate_backoff(&retry, 9, &mut rng), generate_backoff(&retry, 6, &mut rng));

        let jittered = generate_backoff(&RetryConfig::default(), 0, &mut rng);
        assert!(jittered >= Duration::from_millis(300) && jittered <= Duration::from_millis(450));
    }

    #[test]
    fn requests_target_expected_endpoints() -> Result<(), SbiError> {
        let client = SpotifyClient::new(&HttpConfig::default(), &test_config()?)?;

        let req = client.artist_albums("abc", "album", "tok")?.build()?;
        assert_eq!(req.url().path(), "/v1/artists/abc/albums");
        let query = req.url().query().unwrap_or_default().to_string();
        assert!(query.contains("include_groups=album"));
        assert!(query.contains("market=DE"));

        let req = client.search_artist("Cannibal Corpse", 10, "tok")?.build()?;
        assert_eq!(req.url().path(), "/v1/search");
        assert!(req.url().query_pairs().any(|(k, v)| k == "q" && v == "artist:Cannibal Corpse"));

        let req = client.audio_features("t1", "tok")?.build()?;
        assert_eq!(req.url().path(), "/v1/audio-features/t1");
        assert_eq!(
            req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer tok")
        );
        Ok(())
    }

    #[test]
    fn next_page_must_stay_on_api_host() -> Result<(), SbiError> {
        let client = SpotifyClient::new(&HttpConfig::default(), &test_config()?)?;
        assert!(client.next_page("https://api.spotify.com/v1/albums/x/tracks?offset=50", "t").is_ok());
        assert!(matches!(
            client.next_page("https://elsewhere.example/x", "t"),
            Err(SbiError::Parse(_))
        ));
        Ok(())
    }

    #[test]
    fn artist_search_keeps_provider_ranking() -> Result<(), SbiError> {
        let search = json!({ "artists": { "items": [
            { "id": "2", "name": "Cannabis Corpse" },
            { "id": "1", "name": "Cannibal Corpse" }
        ]}});
        let artists = parse_artists(&search)?;
        let ids: Vec<&str> = artists.iter().map(|a| a.id.0.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert!(parse_artists(&json!({}))?.is_empty());
        Ok(())
    }

    #[test]
    fn null_features_mean_not_found() {
        assert!(matches!(parse_audio_features("t", &Value::Null),
            Err(SbiError::FeatureNotFound(id)) if id == "t"));
        assert!(matches!(parse_audio_features("t", &json!({ "energy": 0.5 })),
            Err(SbiError::Parse(_))));
    }

    #[test]
    fn features_are_read_from_body() -> Result<(), SbiError> {
        let f = parse_audio_features("t", &json!({
            "energy": 0.97, "valence": 0.12, "danceability": 0.31, "tempo": 190.2
        }))?;
        assert_eq!(f, AudioFeatures { energy: 0.97, valence: 0.12, danceability: 0.31 });
        Ok(())
    }

    #[tokio::test]
    async fn rate_gate_spaces_requests() {
        let gate = RateGate::new(Duration::from_millis(40));
        let start = Instant::now();
        gate.wait().await;
        gate.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn retry_after_is_capped() {
        let retry = RetryConfig::default();
        let mut headers = header::HeaderMap::new();
        assert_eq!(retry_after(&headers, &retry), None);

        headers.insert(header::RETRY_AFTER, header::HeaderValue::from_static("3"));
        assert_eq!(retry_after(&headers, &retry), Some(Duration::from_secs(3)));

        headers.insert(header::RETRY_AFTER, header::HeaderValue::from_static("7200"));
        assert_eq!(retry_after(&headers, &retry), Some(retry.base_backoff * 64));
    }

    #[test]
    fn track_meta_carries_album_and_preview() {
        let meta = parse_track_meta(&json!({
            "duration_ms": 219_000,
            "album": { "name": "The Wretched Spawn" },
            "preview_url": "https://p.scdn.co/mp3-preview/xyz"
        }));
        assert_eq!(meta, TrackMeta {
            duration_ms: Some(219_000),
            album: Some("The Wretched Spawn".into()),
            preview_url: Some("https://p.scdn.co/mp3-preview/xyz".into())
        });

        let meta = parse_track_meta(&json!({ "duration_ms": 1000, "preview_url": null }));
        assert_eq!(meta.album, None);
        assert_eq!(meta.preview_url, None);
    }

    #[tokio::test]
    async fn missing_resource_maps_to_not_found() -> Result<(), SbiError> {
        let addr = fixture(|_| (404, r#"{"error":"missing"}"#.to_string())).await?;
        let client = base_client(&HttpConfig::default())?;
        let r = http_with_retry(client.get(format!("http://{addr}/v1/tracks/x")), &fast_retry()).await;
        assert!(matches!(r, Err(SbiError::NotFound(path)) if path == "/v1/tracks/x"));
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_rate_limit_maps_to_rate_limited() -> Result<(), SbiError> {
        let hits = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = hits.clone();
        let addr = fixture(move |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            (429, "{}".to_string())
        }).await?;
        let client = base_client(&HttpConfig::default())?;
        let r = http_with_retry(client.get(format!("http://{addr}/v1/search")), &fast_retry()).await;
        assert!(matches!(r, Err(SbiError::RateLimited(_))));
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn paging_follows_next_links() -> Result<(), SbiError> {
        let addr = fixture(|target| {
            if target.contains("offset=2") {
                (200, r#"{"items":[{"id":"t3","name":"Three"}],"next":null}"#.to_string())
            } else {
                (200, r#"{"items":[{"id":"t1","name":"One"},{"id":"t2","name":"Two"}],
                    "next":"{base}/v1/albums/a/tracks?offset=2&limit=2"}"#.to_string())
            }
        }).await?;
        let catalog = fixture_catalog(addr).await?;

        let tracks = catalog.list_tracks(&AlbumId("a".into())).await?;
        let ids: Vec<&str> = tracks.iter().map(|t| t.id.0.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
        Ok(())
    }

    #[tokio::test]
    async fn adapter_maps_missing_features_and_meta() -> Result<(), SbiError> {
        let addr = fixture(|target| {
            if target.starts_with("/v1/tracks/known") {
                (200, r#"{"duration_ms":1000,"album":{"name":"Kill"},"preview_url":null}"#.to_string())
            } else {
                (404, "{}".to_string())
            }
        }).await?;
        let catalog = fixture_catalog(addr).await?;

        let r = catalog.get_audio_features(&TrackId("gone".into())).await;
        assert!(matches!(r, Err(SbiError::FeatureNotFound(id)) if id == "gone"));
        assert_eq!(catalog.get_track_meta(&TrackId("gone".into())).await?, None);

        let meta = catalog.get_track_meta(&TrackId("known".into())).await?;
        assert_eq!(meta.and_then(|m| m.album).as_deref(), Some("Kill"));
        Ok(())
    }

    #[tokio::test]
    async fn spotify_catalog_testbench() -> Result<(), SbiError> {
        dotenvy::dotenv().ok();

        if !live() {
            eprintln!("Set LIVE_HTTP=1 to run");
            return Ok(())
        }

        let cfgs = crate::config::load_config()?;
        let catalog = SpotifyCatalog::new(&cfgs.http, &cfgs.spotify)?;

        let artists = catalog.search_artist("Cannibal Corpse").await?;
        let artist = artists.first()
            .ok_or_else(|| SbiError::ArtistNotFound("Cannibal Corpse".into()))?;
        println!("artist: {artist:?}");

        let albums = catalog.list_albums(&artist.id, AlbumCategory::Album).await?;
        assert!(!albums.is_empty());

        let tracks = catalog.list_tracks(&albums[0].id).await?;
        assert!(!tracks.is_empty());

        let meta = catalog.get_track_meta(&tracks[0].id).await?;
        println!("track meta: {meta:?}");
        Ok(())
    }
}
