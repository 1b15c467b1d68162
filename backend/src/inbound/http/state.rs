//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised against any store.

use std::sync::Arc;

use crate::domain::ports::{
    BoardCommand, BoardQuery, CardCommand, CardQuery, EmailAuthCommand, GitHubAuthCommand,
    TaskCommand, TaskQuery, UserProfileQuery,
};

/// Port implementations backing the handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub email_auth: Arc<dyn EmailAuthCommand>,
    pub github_auth: Arc<dyn GitHubAuthCommand>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub boards: Arc<dyn BoardCommand>,
    pub boards_query: Arc<dyn BoardQuery>,
    pub cards: Arc<dyn CardCommand>,
    pub cards_query: Arc<dyn CardQuery>,
    pub tasks: Arc<dyn TaskCommand>,
    pub tasks_query: Arc<dyn TaskQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub email_auth: Arc<dyn EmailAuthCommand>,
    pub github_auth: Arc<dyn GitHubAuthCommand>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub boards: Arc<dyn BoardCommand>,
    pub boards_query: Arc<dyn BoardQuery>,
    pub cards: Arc<dyn CardCommand>,
    pub cards_query: Arc<dyn CardQuery>,
    pub tasks: Arc<dyn TaskCommand>,
    pub tasks_query: Arc<dyn TaskQuery>,
    /// Base URL the GitHub callback redirects back to, without a trailing
    /// slash.
    pub frontend_url: Arc<str>,
}

impl HttpState {
    /// Bundle `ports` with the frontend origin used for OAuth redirects.
    pub fn new(ports: HttpStatePorts, frontend_url: &str) -> Self {
        let HttpStatePorts {
            email_auth,
            github_auth,
            profile,
            boards,
            boards_query,
            cards,
            cards_query,
            tasks,
            tasks_query,
        } = ports;
        Self {
            email_auth,
            github_auth,
            profile,
            boards,
            boards_query,
            cards,
            cards_query,
            tasks,
            tasks_query,
            frontend_url: Arc::from(frontend_url.trim_end_matches('/')),
        }
    }

    /// Frontend URL for `path`, which must start with `/`.
    pub fn frontend_link(&self, path: &str) -> String {
        format!("{}{path}", self.frontend_url)
    }
}
