//! Reqwest-backed GitHub identity adapter.
//!
//! Owns transport only: the authorize URL, the code-for-token exchange, and
//! decoding the `/user` profile.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{TokenRequestDto, TokenResponseDto, UserDto};
use crate::domain::GitHubProfile;
use crate::domain::ports::{GitHubIdentityError, GitHubIdentityProvider};

const DEFAULT_OAUTH_BASE: &str = "https://github.com/login/oauth/";
const DEFAULT_API_BASE: &str = "https://api.github.com/";
const OAUTH_SCOPE: &str = "read:user user:email";
const USER_AGENT: &str = "taskboard-backend/0.1";

/// Failure building a [`GitHubHttpClient`].
#[derive(Debug, thiserror::Error)]
pub enum GitHubClientError {
    /// The HTTP client could not be constructed.
    #[error("failed to build GitHub HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// A base URL was malformed.
    #[error("invalid GitHub endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// OAuth application credentials.
#[derive(Debug, Clone)]
pub struct GitHubOAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    /// Callback URL registered with the OAuth app.
    pub redirect_uri: String,
}

/// GitHub identity provider performing real HTTP calls.
pub struct GitHubHttpClient {
    client: Client,
    oauth_base: Url,
    api_base: Url,
    settings: GitHubOAuthSettings,
}

impl GitHubHttpClient {
    /// Build a client against the public GitHub endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: GitHubOAuthSettings, timeout: Duration) -> Result<Self, GitHubClientError> {
        Self::with_endpoints(
            settings,
            timeout,
            Url::parse(DEFAULT_OAUTH_BASE)?,
            Url::parse(DEFAULT_API_BASE)?,
        )
    }

    /// Build a client against explicit OAuth and API base URLs.
    ///
    /// Both bases should end in `/` so relative joins keep their path.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_endpoints(
        settings: GitHubOAuthSettings,
        timeout: Duration,
        oauth_base: Url,
        api_base: Url,
    ) -> Result<Self, GitHubClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            oauth_base,
            api_base,
            settings,
        })
    }

    fn endpoint(base: &Url, path: &str) -> Result<Url, GitHubIdentityError> {
        base.join(path)
            .map_err(|error| GitHubIdentityError::transport(format!("bad endpoint {path}: {error}")))
    }

    async fn exchange_code(&self, code: &str) -> Result<String, GitHubIdentityError> {
        let response = self
            .client
            .post(Self::endpoint(&self.oauth_base, "access_token")?)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&TokenRequestDto {
                client_id: &self.settings.client_id,
                client_secret: &self.settings.client_secret,
                code,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_token(body.as_ref())
    }

    async fn fetch_user(&self, token: &str) -> Result<GitHubProfile, GitHubIdentityError> {
        let response = self
            .client
            .get(Self::endpoint(&self.api_base, "user")?)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_profile(body.as_ref())
    }
}

#[async_trait]
impl GitHubIdentityProvider for GitHubHttpClient {
    fn authorization_url(&self) -> String {
        let mut url = self
            .oauth_base
            .join("authorize")
            .unwrap_or_else(|_| self.oauth_base.clone());
        url.query_pairs_mut()
            .append_pair("client_id", &self.settings.client_id)
            .append_pair("redirect_uri", &self.settings.redirect_uri)
            .append_pair("scope", OAUTH_SCOPE);
        url.into()
    }

    async fn fetch_profile(&self, code: &str) -> Result<GitHubProfile, GitHubIdentityError> {
        let token = self.exchange_code(code).await?;
        self.fetch_user(&token).await
    }
}

fn parse_token(body: &[u8]) -> Result<String, GitHubIdentityError> {
    let decoded: TokenResponseDto = serde_json::from_slice(body).map_err(|error| {
        GitHubIdentityError::decode(format!("invalid token response: {error}"))
    })?;
    decoded.into_token().map_err(GitHubIdentityError::rejected)
}

fn parse_profile(body: &[u8]) -> Result<GitHubProfile, GitHubIdentityError> {
    let decoded: UserDto = serde_json::from_slice(body).map_err(|error| {
        GitHubIdentityError::decode(format!("invalid user payload: {error}"))
    })?;
    Ok(decoded.into())
}

fn map_transport_error(error: reqwest::Error) -> GitHubIdentityError {
    GitHubIdentityError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GitHubIdentityError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let preview: String = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_CHAR_LIMIT)
        .collect();
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };
    if status.is_client_error() {
        GitHubIdentityError::rejected(message)
    } else {
        GitHubIdentityError::transport(message)
    }
}
