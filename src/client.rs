//! Authenticated Graph REST client

use crate::auth::{AccessToken, ClientSecretCredential};
use crate::config::{BenchmarkConfig, HttpConfig};
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::redirect;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Read-only request/response exchange against a service root.
///
/// The walker only depends on this trait, so anything that can turn
/// a path into a JSON document can drive a traversal.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// GET `path`, relative to [`service_root`](Self::service_root),
    /// and parse the body as JSON.
    async fn get(&self, path: &str) -> Result<Value>;

    /// Base URL every relative path is resolved against.
    fn service_root(&self) -> &str;
}

/// Graph client using app-only client-credentials authentication
pub struct GraphClient {
    http: reqwest::Client,
    credential: ClientSecretCredential,
    token: Mutex<AccessToken>,
    service_root: String,
    retry: RetryPolicy,
}

impl GraphClient {
    /// Build the HTTP client and acquire the first access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the HTTP
    /// client cannot be built, or authentication fails.
    pub async fn connect(config: &BenchmarkConfig) -> Result<Self> {
        config.validate()?;
        let http = build_http(&config.http)?;
        let credential = ClientSecretCredential::from_config(config);
        let token = credential.request_token(&http).await?;

        info!("Connected to {} as {}", config.service_root, config.user_id);
        Ok(Self {
            http,
            credential,
            token: Mutex::new(token),
            service_root: config.service_root.clone(),
            retry: RetryPolicy::from_config(&config.http),
        })
    }

    /// Absolute URL for `path`. Already-absolute URLs pass through.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.service_root)
        } else {
            format!("{}/{path}", self.service_root)
        }
    }

    async fn bearer(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if token.is_expired() {
            info!("Access token expired, refreshing");
            *token = self.credential.request_token(&self.http).await?;
        }
        Ok(token.bearer())
    }
}

#[async_trait]
impl ApiClient for GraphClient {
    async fn get(&self, path: &str) -> Result<Value> {
        let url = self.url_for(path);
        let mut attempt = 0;

        loop {
            debug!("GET {}", url);
            let mut request = self
                .http
                .get(&url)
                .header(AUTHORIZATION, self.bearer().await?)
                .header(ACCEPT, "application/json");
            if attempt > 0 {
                request = request.header("Retry-Attempt", attempt.to_string());
            }

            let response = request.send().await?;
            let status = response.status();

            if status.is_success() {
                let body = response.bytes().await?;
                return Ok(serde_json::from_slice(&body)?);
            }

            if self.retry.should_retry(status, attempt) {
                let delay = self.retry.delay(attempt, response.headers().get(RETRY_AFTER));
                warn!("{} for {}, retrying in {:?}", status, path, delay);
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return Err(Error::Http {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }
    }

    fn service_root(&self) -> &str {
        &self.service_root
    }
}

fn build_http(config: &HttpConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .redirect(redirect::Policy::limited(config.max_redirects));
    if !config.use_system_proxy {
        builder = builder.no_proxy();
    }
    Ok(builder.build()?)
}
