//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use url::Url;

use crate::api::{AssistantsApi, CronsApi, RunsApi, StoreApi, ThreadsApi};
use crate::config::{
    API_KEY_HEADER, ClientConfig, DEFAULT_BASE_URL, DEFAULT_CONNECT_RETRIES,
    DEFAULT_CONNECT_RETRY_INTERVAL, DEFAULT_STREAM_BUFFER, DEFAULT_TIMEOUT,
    check_reserved_headers, resolve_api_key,
};
use crate::error::{Error, Result};
use crate::stream::{self, EventStream, FrameMode, StreamRequest};

/// LangGraph API client.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Example
///
/// ```no_run
/// use langgraph_client::LangGraphClient;
///
/// # async fn example() -> langgraph_client::Result<()> {
/// let client = LangGraphClient::builder()
///     .base_url("http://localhost:8123")
///     .api_key("secret")
///     .build()?;
///
/// let thread = client.threads().create(Default::default()).await?;
/// println!("Created thread: {}", thread.thread_id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LangGraphClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for API requests.
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
    /// Streaming timeout.
    pub(crate) stream_timeout: Option<Duration>,
    /// How stream lines are grouped into events.
    pub(crate) frame_mode: FrameMode,
    /// Event channel capacity per stream.
    pub(crate) stream_buffer: usize,
}

impl std::fmt::Debug for LangGraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LangGraphClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("frame_mode", &self.inner.frame_mode)
            .finish()
    }
}

impl LangGraphClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with default settings pointing to a local server.
    pub fn localhost() -> Result<Self> {
        Self::builder().build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// How this client groups stream lines into events.
    pub fn frame_mode(&self) -> FrameMode {
        self.inner.frame_mode
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the assistants API.
    pub fn assistants(&self) -> AssistantsApi {
        AssistantsApi::new(self.clone())
    }

    /// Access the threads API.
    pub fn threads(&self) -> ThreadsApi {
        ThreadsApi::new(self.clone())
    }

    /// Access the runs API.
    pub fn runs(&self) -> RunsApi {
        RunsApi::new(self.clone())
    }

    /// Access the crons API.
    pub fn crons(&self) -> CronsApi {
        CronsApi::new(self.clone())
    }

    /// Access the store API.
    pub fn store(&self) -> StoreApi {
        StoreApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Connectivity & streaming
    // ─────────────────────────────────────────────────────────────────────────

    /// Check that the server is reachable.
    ///
    /// Any HTTP response counts as reachable; only transport failures error.
    pub async fn check_connection(&self) -> Result<()> {
        self.inner
            .http
            .get(self.url("/")?)
            .timeout(self.inner.timeout)
            .send()
            .await
            .map_err(Error::Connection)?;
        Ok(())
    }

    /// Open an event stream and start decoding it in the background.
    ///
    /// Returns once the response headers have been validated. Connection
    /// failures, error statuses and non-event-stream responses are returned
    /// here; nothing is spawned in those cases.
    pub async fn stream(&self, request: StreamRequest) -> Result<EventStream> {
        request.validate_method()?;
        let url = self.url(&request.path)?;

        let mut builder = self.inner.http.request(request.method.clone(), url);
        if let Some(timeout) = self.inner.stream_timeout {
            builder = builder.timeout(timeout);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        for (name, value) in &request.headers {
            let (name, value) = header_pair(name, value)?;
            builder = builder.header(name, value);
        }

        let cancel = request.cancel.unwrap_or_default();
        let connection = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            opened = stream::transport::open(builder, &request.path) => opened?,
        };

        Ok(stream::spawn_decoder(
            connection,
            self.inner.frame_mode,
            self.inner.stream_buffer,
            cancel,
        ))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.inner.http.get(self.url(path)?);
        self.send_json(request).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let request = self.inner.http.get(self.url(path)?).query(query);
        self.send_json(request).await
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let request = self.inner.http.post(self.url(path)?).json(body);
        self.send_json(request).await
    }

    /// Make a POST request, ignoring the response body.
    pub(crate) async fn post_unit<B>(&self, path: &str, body: Option<&B>) -> Result<()>
    where
        B: serde::Serialize + ?Sized,
    {
        let mut request = self.inner.http.post(self.url(path)?);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await?;
        Ok(())
    }

    /// Make a PATCH request.
    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let request = self.inner.http.patch(self.url(path)?).json(body);
        self.send_json(request).await
    }

    /// Make a PUT request, ignoring the response body.
    pub(crate) async fn put_unit<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: serde::Serialize + ?Sized,
    {
        let request = self.inner.http.put(self.url(path)?).json(body);
        self.send(request).await?;
        Ok(())
    }

    /// Make a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let request = self.inner.http.delete(self.url(path)?);
        self.send(request).await?;
        Ok(())
    }

    /// Make a DELETE request with a JSON body.
    pub(crate) async fn delete_with_body<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: serde::Serialize + ?Sized,
    {
        let request = self.inner.http.delete(self.url(path)?).json(body);
        self.send(request).await?;
        Ok(())
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// Send a request, turning error statuses into [`Error::HttpStatus`].
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .timeout(self.inner.timeout)
            .send()
            .await
            .map_err(Error::Connection)?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let url = response.url().path().to_string();
            let body = stream::transport::read_error_body(response).await;
            tracing::error!(path = %url, status = status.as_u16(), body = %body, "Error from langgraph-api");
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| Error::Config(format!("Invalid header name '{name}'")))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|_| Error::Config(format!("Invalid value for header '{name}'")))?;
    Ok((header_name, header_value))
}

/// Builder for creating a [`LangGraphClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    headers: Vec<(String, String)>,
    timeout: Duration,
    stream_timeout: Option<Duration>,
    user_agent: Option<String>,
    connect_retries: u32,
    connect_retry_interval: Duration,
    frame_mode: FrameMode,
    stream_buffer: usize,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            stream_timeout: None,
            user_agent: None,
            connect_retries: DEFAULT_CONNECT_RETRIES,
            connect_retry_interval: DEFAULT_CONNECT_RETRY_INTERVAL,
            frame_mode: FrameMode::default(),
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }

    /// Start from a loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut builder = Self::new()
            .base_url(&config.base_url)
            .timeout(config.timeout())
            .connect_retries(config.connect_retries)
            .connect_retry_interval(config.connect_retry_interval())
            .frame_mode(config.frame_mode)
            .stream_buffer(config.stream_buffer);
        builder.stream_timeout = config.stream_timeout();
        builder.api_key = config.api_key.clone();
        for (name, value) in &config.headers {
            builder = builder.header(name, value);
        }
        builder
    }

    /// Set the base URL for the server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key. Without one, the environment is consulted.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a timeout covering a whole streaming request, body included.
    pub fn stream_timeout(mut self, timeout: Duration) -> Self {
        self.stream_timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set how many connectivity checks `connect` makes.
    pub fn connect_retries(mut self, retries: u32) -> Self {
        self.connect_retries = retries;
        self
    }

    /// Set the pause between connectivity checks.
    pub fn connect_retry_interval(mut self, interval: Duration) -> Self {
        self.connect_retry_interval = interval;
        self
    }

    /// Set how stream lines are grouped into events.
    pub fn frame_mode(mut self, mode: FrameMode) -> Self {
        self.frame_mode = mode;
        self
    }

    /// Set the event channel capacity per stream.
    pub fn stream_buffer(mut self, capacity: usize) -> Self {
        self.stream_buffer = capacity.max(1);
        self
    }

    /// Build the client without touching the network.
    pub fn build(self) -> Result<LangGraphClient> {
        let base_url = self
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        check_reserved_headers(self.headers.iter().map(|(name, _)| name.as_str()))?;

        // Build default headers; custom headers override the defaults
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("langgraph-client/{}", env!("CARGO_PKG_VERSION")));
        let user_agent = HeaderValue::from_str(&user_agent)
            .map_err(|_| Error::Config("Invalid user agent".to_string()))?;
        headers.insert(USER_AGENT, user_agent);

        for (name, value) in &self.headers {
            let (name, value) = header_pair(name, value)?;
            headers.insert(name, value);
        }

        if let Some(key) = resolve_api_key(self.api_key.as_deref()) {
            let value = HeaderValue::from_str(&key)
                .map_err(|_| Error::Config("Invalid API key".to_string()))?;
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(Error::Http)?;

        Ok(LangGraphClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                stream_timeout: self.stream_timeout,
                frame_mode: self.frame_mode,
                stream_buffer: self.stream_buffer,
            }),
        })
    }

    /// Build the client and wait until the server is reachable.
    ///
    /// Makes up to `connect_retries` checks, pausing between them, and
    /// returns the last connection error if none succeed.
    pub async fn connect(self) -> Result<LangGraphClient> {
        let attempts = self.connect_retries.max(1);
        let interval = self.connect_retry_interval;
        let client = self.build()?;

        let mut last_error = None;
        for attempt in 1..=attempts {
            match client.check_connection().await {
                Ok(()) => return Ok(client),
                Err(e) => {
                    tracing::warn!(
                        url = %client.base_url(),
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "Server not reachable"
                    );
                    last_error = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(interval).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::Config(format!("failed to connect after {attempts} attempts"))
        }))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_localhost() {
        let client = ClientBuilder::new().build().unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8123/");
        assert_eq!(client.frame_mode(), FrameMode::Batched);
    }

    #[test]
    fn test_builder_with_base_url() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:2024")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:2024/");
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:2024/")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:2024/");
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        let err = ClientBuilder::new().base_url("not a url").build().unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_builder_rejects_reserved_header() {
        let err = ClientBuilder::new()
            .header("x-api-key", "sneaky")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_builder_rejects_invalid_header() {
        let err = ClientBuilder::new()
            .header("bad header", "v")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("bad header"));
    }

    #[test]
    fn test_url_building() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:2024")
            .build()
            .unwrap();

        let url = client.url("threads").unwrap();
        assert_eq!(url.as_str(), "http://localhost:2024/threads");

        let url = client.url("/threads/t1/runs/stream").unwrap();
        assert_eq!(url.as_str(), "http://localhost:2024/threads/t1/runs/stream");
    }

    #[test]
    fn test_url_building_keeps_base_path() {
        let client = ClientBuilder::new()
            .base_url("https://example.com/deployments/abc")
            .build()
            .unwrap();

        let url = client.url("/runs/stream").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/deployments/abc/runs/stream"
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = ClientConfig::default();
        config.base_url = "http://graph.internal:9000".to_string();
        config.frame_mode = FrameMode::Eager;
        config.stream_buffer = 4;

        let client = ClientBuilder::from_config(&config).build().unwrap();
        assert_eq!(client.base_url().as_str(), "http://graph.internal:9000/");
        assert_eq!(client.frame_mode(), FrameMode::Eager);
        assert_eq!(client.inner.stream_buffer, 4);
    }
}
