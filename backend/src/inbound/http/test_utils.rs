//! Test helpers for inbound HTTP components.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{Mailer, MailerError, MockGitHubIdentityProvider, UserRepository};
use crate::domain::{
    BoardService, CardOrderingService, EmailAddress, EmailAuthService, Error, GitHubAuthService,
    TaskOrderingService, User, UserId, UserProfileService,
};
use crate::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;

/// Frontend origin used by test state.
pub const FRONTEND_URL: &str = "http://frontend.test";
/// Authorization URL returned by the default GitHub mock.
pub const GITHUB_AUTHORIZE_URL: &str = "https://github.test/login/oauth/authorize?client_id=test";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("response sets a session cookie")
}

/// Mailer keeping the last code sent to each address.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<HashMap<String, String>>,
}

impl RecordingMailer {
    pub fn last_code(&self, email: &str) -> Option<String> {
        self.sent.lock().expect("mailer lock").get(email).cloned()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification_code(
        &self,
        recipient: &EmailAddress,
        code: &str,
    ) -> Result<(), MailerError> {
        self.sent
            .lock()
            .map_err(|_| MailerError::delivery("mailer lock poisoned"))?
            .insert(recipient.to_string(), code.to_owned());
        Ok(())
    }
}

/// Handler state wired to real services over an in-memory store.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub state: HttpState,
}

impl Harness {
    /// Harness whose GitHub provider only answers `authorization_url`.
    pub fn new() -> Self {
        let mut github = MockGitHubIdentityProvider::new();
        github
            .expect_authorization_url()
            .return_const(GITHUB_AUTHORIZE_URL.to_owned());
        Self::with_github(github)
    }

    pub fn with_github(github: MockGitHubIdentityProvider) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let clock: Arc<dyn mockable::Clock> = Arc::new(mockable::DefaultClock);
        let cards = Arc::new(CardOrderingService::new(
            store.clone(),
            store.clone(),
            clock.clone(),
        ));
        let tasks = Arc::new(TaskOrderingService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
        ));
        let boards = Arc::new(BoardService::new(store.clone(), store.clone(), clock.clone()));
        let ports = HttpStatePorts {
            email_auth: Arc::new(EmailAuthService::new(
                store.clone(),
                store.clone(),
                mailer.clone(),
                clock.clone(),
            )),
            github_auth: Arc::new(GitHubAuthService::new(
                Arc::new(github),
                store.clone(),
                store.clone(),
                clock,
            )),
            profile: Arc::new(UserProfileService::new(store.clone())),
            boards: boards.clone(),
            boards_query: boards,
            cards: cards.clone(),
            cards_query: cards,
            tasks: tasks.clone(),
            tasks_query: tasks,
        };
        Self {
            store,
            mailer,
            state: HttpState::new(ports, FRONTEND_URL),
        }
    }

    /// Register a user directly in the store.
    pub async fn user(&self, email: &str) -> User {
        let user = User::from_email(EmailAddress::new(email).expect("valid email"), Utc::now());
        UserRepository::insert(self.store.as_ref(), &user)
            .await
            .expect("insert user");
        user
    }

    /// App mounting `configure` under `/api/v1` next to a test sign-in route.
    pub fn app<F>(
        &self,
        configure: F,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<F>,
    >
    where
        F: FnOnce(&mut web::ServiceConfig),
    {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .service(
                web::scope("/api/v1")
                    .wrap(test_session_middleware())
                    .route("/test/sign-in/{id}", web::post().to(sign_in_as))
                    .configure(configure),
            )
    }
}

async fn sign_in_as(session: SessionContext, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let id = UserId::new(path.into_inner()).map_err(|err| Error::invalid_input(err.to_string()))?;
    session.persist_user(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Request hitting the test sign-in route for `user`.
pub fn sign_in_request(user: &UserId) -> test::TestRequest {
    test::TestRequest::post().uri(&format!("/api/v1/test/sign-in/{user}"))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[actix_web::test]
    async fn app_does_not_borrow_the_harness() {
        let (app, user) = {
            let harness = Harness::new();
            let user = harness.user("ada@example.com").await;
            (test::init_service(harness.app(|_| {})).await, user)
        };

        let response = test::call_service(&app, sign_in_request(&user.id).to_request()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(session_cookie(&response).name(), "session");
    }
}
