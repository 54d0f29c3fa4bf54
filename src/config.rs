//! Benchmark configuration

use crate::error::{Error, Result};
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_SERVICE_ROOT: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_ROOT_FOLDER: &str = "inbox";

/// Everything one benchmark run needs, passed explicitly to the
/// client and walker.
#[derive(Clone)]
pub struct BenchmarkConfig {
    pub user_id: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub root_folder: String,
    pub service_root: String,
    pub authority_host: String,
    pub http: HttpConfig,
}

impl fmt::Debug for BenchmarkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchmarkConfig")
            .field("user_id", &self.user_id)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("root_folder", &self.root_folder)
            .field("service_root", &self.service_root)
            .field("authority_host", &self.authority_host)
            .field("http", &self.http)
            .finish()
    }
}

/// Knobs of the HTTP client: timeouts, retries, redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub max_redirects: usize,
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(60),
            read_timeout: Duration::from_secs(60),
            max_retries: 3,
            retry_delay: Duration::from_secs(3),
            max_redirects: 5,
            use_system_proxy: true,
        }
    }
}

impl BenchmarkConfig {
    /// Build a configuration for `user_id`, deriving the tenant from
    /// the domain part of the address. Endpoints and HTTP settings
    /// take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `user_id` has no domain part or a
    /// field is empty.
    pub fn new(
        user_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        let user_id = user_id.into();
        let tenant_id = tenant_from_user_id(&user_id)?.to_string();
        let config = Self {
            user_id,
            tenant_id,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            root_folder: DEFAULT_ROOT_FOLDER.to_string(),
            service_root: DEFAULT_SERVICE_ROOT.to_string(),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            http: HttpConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from environment variables
    ///
    /// Reads from `.env` file if present. Required variables:
    /// - `GRAPH_USER_ID`
    /// - `GRAPH_CLIENT_ID`
    /// - `GRAPH_CLIENT_SECRET`
    ///
    /// Optional (with defaults):
    /// - `GRAPH_TENANT_ID` (default: domain of `GRAPH_USER_ID`)
    /// - `GRAPH_ROOT_FOLDER` (default: `inbox`)
    /// - `GRAPH_SERVICE_ROOT` (default: `https://graph.microsoft.com/v1.0`)
    /// - `GRAPH_AUTHORITY_HOST` (default: `https://login.microsoftonline.com`)
    /// - `GRAPH_MAX_RETRIES` (default: `3`)
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value
    /// is invalid.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an arbitrary
    /// variable source.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("{key} not set")))
        };

        let mut config = Self::new(
            require("GRAPH_USER_ID")?,
            require("GRAPH_CLIENT_ID")?,
            require("GRAPH_CLIENT_SECRET")?,
        )?;

        if let Some(tenant) = lookup("GRAPH_TENANT_ID").filter(|v| !v.is_empty()) {
            config.tenant_id = tenant;
        }
        if let Some(folder) = lookup("GRAPH_ROOT_FOLDER").filter(|v| !v.is_empty()) {
            config.root_folder = folder;
        }
        if let Some(root) = lookup("GRAPH_SERVICE_ROOT") {
            config = config.with_service_root(root);
        }
        if let Some(host) = lookup("GRAPH_AUTHORITY_HOST") {
            config = config.with_authority_host(host);
        }
        if let Some(retries) = lookup("GRAPH_MAX_RETRIES") {
            config.http.max_retries = retries
                .parse()
                .map_err(|e| Error::Config(format!("Invalid GRAPH_MAX_RETRIES: {e}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_root_folder(mut self, folder: impl Into<String>) -> Self {
        self.root_folder = folder.into();
        self
    }

    #[must_use]
    pub fn with_service_root(mut self, root: impl Into<String>) -> Self {
        self.service_root = trim_slash(root.into());
        self
    }

    #[must_use]
    pub fn with_authority_host(mut self, host: impl Into<String>) -> Self {
        self.authority_host = trim_slash(host.into());
        self
    }

    #[must_use]
    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Check that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first blank field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("user id", &self.user_id),
            ("tenant id", &self.tenant_id),
            ("client id", &self.client_id),
            ("client secret", &self.client_secret),
            ("root folder", &self.root_folder),
            ("service root", &self.service_root),
            ("authority host", &self.authority_host),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{name} is empty")));
            }
        }
        Ok(())
    }
}

/// The tenant is the domain part of the mailbox owner's address.
///
/// # Errors
///
/// Returns [`Error::Config`] unless `user_id` looks like `local@domain`.
pub fn tenant_from_user_id(user_id: &str) -> Result<&str> {
    match user_id.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(domain),
        _ => Err(Error::Config(format!(
            "user id '{user_id}' has no domain to derive the tenant from"
        ))),
    }
}

fn trim_slash(mut s: String) -> String {
    while s.ends_with('/') {
        s.pop();
    }
    s
}
