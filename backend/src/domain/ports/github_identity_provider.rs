//! Port for the GitHub OAuth authorization-code flow.

use async_trait::async_trait;

use crate::domain::GitHubProfile;

use super::define_port_error;

define_port_error! {
    /// Errors raised by GitHub identity adapters.
    pub enum GitHubIdentityError {
        /// The request never produced a response.
        Transport { message: String } => "github request failed: {message}",
        /// GitHub answered with an error status or an OAuth error body.
        Rejected { message: String } => "github rejected the request: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "github response could not be decoded: {message}",
    }
}

/// Exchanges authorization codes for GitHub profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubIdentityProvider: Send + Sync {
    /// URL the browser is redirected to in order to start the flow.
    fn authorization_url(&self) -> String;

    /// Exchange an authorization code and fetch the account profile.
    async fn fetch_profile(&self, code: &str) -> Result<GitHubProfile, GitHubIdentityError>;
}
