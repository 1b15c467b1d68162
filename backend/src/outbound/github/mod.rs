//! GitHub OAuth outbound adapter.
//!
//! Implements the `GitHubIdentityProvider` port over the public OAuth and
//! REST endpoints.

mod dto;
mod http_client;

pub use http_client::{GitHubClientError, GitHubHttpClient, GitHubOAuthSettings};
