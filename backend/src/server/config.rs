//! Application settings and the assembled server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use taskboard::domain::{EMAIL_CODE_TTL_SECS, EXCHANGE_CODE_TTL_SECS};
use taskboard::outbound::github::GitHubOAuthSettings;
use taskboard::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_GITHUB_CALLBACK_URL: &str = "http://localhost:8080/api/v1/auth/github/callback";

/// Runtime settings loaded from CLI flags, `TASKBOARD_*` variables and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TASKBOARD")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server keeps state in memory.
    pub database_url: Option<String>,
    /// Browser-facing frontend base URL used for OAuth redirects.
    pub frontend_url: Option<String>,
    pub github_client_id: Option<String>,
    pub github_client_secret: Option<String>,
    /// OAuth callback URL registered with the GitHub app.
    pub github_callback_url: Option<String>,
    /// Lifetime of emailed verification codes, in seconds.
    pub code_ttl_secs: Option<i64>,
    /// Lifetime of GitHub exchange codes, in seconds.
    pub exchange_ttl_secs: Option<i64>,
    /// Timeout for outbound HTTP calls, in seconds.
    #[ortho_config(default = 10)]
    pub http_timeout_secs: u64,
}

impl AppSettings {
    /// Parsed bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn frontend_url(&self) -> &str {
        self.frontend_url.as_deref().unwrap_or(DEFAULT_FRONTEND_URL)
    }

    /// GitHub OAuth credentials. Missing values stay empty, which GitHub
    /// rejects at callback time.
    pub fn github(&self) -> GitHubOAuthSettings {
        GitHubOAuthSettings {
            client_id: self.github_client_id.clone().unwrap_or_default(),
            client_secret: self.github_client_secret.clone().unwrap_or_default(),
            redirect_uri: self
                .github_callback_url
                .clone()
                .unwrap_or_else(|| DEFAULT_GITHUB_CALLBACK_URL.to_owned()),
        }
    }

    /// Whether both GitHub credentials are present.
    pub fn github_configured(&self) -> bool {
        [&self.github_client_id, &self.github_client_secret]
            .iter()
            .all(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }

    pub fn code_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.code_ttl_secs.unwrap_or(EMAIL_CODE_TTL_SECS))
    }

    pub fn exchange_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.exchange_ttl_secs.unwrap_or(EXCHANGE_CODE_TTL_SECS))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Everything the server needs once settings and secrets are resolved.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) settings: AppSettings,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        settings: AppSettings,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            settings,
            db_pool: None,
        }
    }

    /// Attach a database pool; repositories switch to Diesel adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
