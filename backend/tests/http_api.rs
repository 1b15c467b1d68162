//! End-to-end HTTP flows through the full route table and middleware stack.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use rstest::rstest;
use serde_json::{Value, json};
use taskboard::Trace;
use taskboard::domain::ports::{GitHubIdentityError, GitHubIdentityProvider, Mailer, MailerError};
use taskboard::domain::{
    BoardService, CardOrderingService, EmailAddress, EmailAuthService, GitHubAuthService,
    GitHubProfile, TRACE_ID_HEADER, TaskOrderingService, UserProfileService,
};
use taskboard::inbound::http::state::{HttpState, HttpStatePorts};
use taskboard::inbound::http::{configure, extractor_configs};
use taskboard::outbound::memory::InMemoryStore;

#[derive(Default)]
struct Inbox {
    codes: Mutex<HashMap<String, String>>,
}

impl Inbox {
    fn code_for(&self, email: &str) -> String {
        self.codes
            .lock()
            .expect("inbox lock")
            .get(email)
            .cloned()
            .expect("code delivered")
    }
}

#[async_trait]
impl Mailer for Inbox {
    async fn send_verification_code(
        &self,
        recipient: &EmailAddress,
        code: &str,
    ) -> Result<(), MailerError> {
        self.codes
            .lock()
            .map_err(|_| MailerError::delivery("inbox lock poisoned"))?
            .insert(recipient.to_string(), code.to_owned());
        Ok(())
    }
}

struct NoGitHub;

#[async_trait]
impl GitHubIdentityProvider for NoGitHub {
    fn authorization_url(&self) -> String {
        "https://github.test/login/oauth/authorize".to_owned()
    }

    async fn fetch_profile(&self, _code: &str) -> Result<GitHubProfile, GitHubIdentityError> {
        Err(GitHubIdentityError::rejected("bad_verification_code"))
    }
}

fn http_state(inbox: Arc<Inbox>) -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let boards = Arc::new(BoardService::new(store.clone(), store.clone(), clock.clone()));
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
    let ports = HttpStatePorts {
        email_auth: Arc::new(EmailAuthService::new(
            store.clone(),
            store.clone(),
            inbox,
            clock.clone(),
        )),
        github_auth: Arc::new(GitHubAuthService::new(
            Arc::new(NoGitHub),
            store.clone(),
            store.clone(),
            clock,
        )),
        profile: Arc::new(UserProfileService::new(store)),
        boards: boards.clone(),
        boards_query: boards,
        cards: cards.clone(),
        cards_query: cards,
        tasks: tasks.clone(),
        tasks_query: tasks,
    };
    HttpState::new(ports, "http://frontend.test/")
}

async fn app(
    inbox: Arc<Inbox>,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(web::Data::new(http_state(inbox)))
            .configure(extractor_configs)
            .wrap(Trace)
            .service(web::scope("/api/v1").wrap(session).configure(configure)),
    )
    .await
}

fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

async fn sign_up<S>(app: &S, inbox: &Inbox, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(json!({ "email": email }));
    let response = test::call_service(app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(json!({ "email": email, "verificationCode": inbox.code_for(email) }));
    let response = test::call_service(app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    session_cookie(&response)
}

async fn send<S>(app: &S, request: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    (status, body)
}

fn id_of(body: &Value) -> String {
    body["data"]["id"].as_str().expect("id").to_owned()
}

#[rstest]
#[actix_web::test]
async fn board_card_and_task_flow() {
    let inbox = Arc::new(Inbox::default());
    let app = app(inbox.clone()).await;
    let cookie = sign_up(&app, &inbox, "ada@example.com").await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/boards")
            .cookie(cookie.clone())
            .set_json(json!({ "name": "Launch" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let board_id = id_of(&body);

    let mut card_ids = Vec::new();
    for name in ["design", "build", "ship"] {
        let (status, body) = send(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/boards/{board_id}/cards"))
                .cookie(cookie.clone())
                .set_json(json!({ "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "backlog");
        card_ids.push(id_of(&body));
    }

    let (status, body) = send(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/boards/{board_id}/cards/{}/move", card_ids[2]))
            .cookie(cookie.clone())
            .set_json(json!({ "status": "ongoing", "index": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["position"], 0.5);
    assert_eq!(body["data"]["status"], "ongoing");

    let (_, body) = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/boards/{board_id}/cards"))
            .cookie(cookie.clone()),
    )
    .await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("cards")
        .iter()
        .filter_map(|card| card["name"].as_str())
        .collect();
    assert_eq!(names, vec!["ship", "design", "build"]);

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/boards/{board_id}/cards/{}/tasks", card_ids[0]))
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Sketch" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["priority"], "medium");
    let task_id = id_of(&body);

    let (status, body) = send(
        &app,
        test::TestRequest::patch()
            .uri(&format!(
                "/api/v1/boards/{board_id}/cards/{}/tasks/{task_id}/move",
                card_ids[0]
            ))
            .cookie(cookie.clone())
            .set_json(json!({ "toCardId": card_ids[1], "index": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cardId"], card_ids[1].as_str());

    let (_, body) = send(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/boards/{board_id}/cards/{}", card_ids[1]))
            .cookie(cookie.clone()),
    )
    .await;
    assert_eq!(body["data"]["tasksCount"], 1);

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/boards/{board_id}/cards/rebalance"))
            .cookie(cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["renumbered"], 0);
}

#[rstest]
#[actix_web::test]
async fn outsiders_get_forbidden_with_trace_id() {
    let inbox = Arc::new(Inbox::default());
    let app = app(inbox.clone()).await;
    let owner = sign_up(&app, &inbox, "owner@example.com").await;
    let outsider = sign_up(&app, &inbox, "outsider@example.com").await;

    let (_, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/boards")
            .cookie(owner)
            .set_json(json!({ "name": "Private" })),
    )
    .await;
    let board_id = id_of(&body);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/boards/{board_id}/cards"))
            .cookie(outsider)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "FORBIDDEN");
    assert_eq!(body["error"], "Not a board member");
    assert_eq!(body["traceId"], header.as_str());
}

#[rstest]
#[case("/api/v1/boards")]
#[case("/api/v1/users/me")]
#[actix_web::test]
async fn anonymous_requests_are_unauthorized(#[case] uri: &str) {
    let app = app(Arc::new(Inbox::default())).await;
    let (status, body) = send(&app, test::TestRequest::get().uri(uri)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_invalid_input() {
    let inbox = Arc::new(Inbox::default());
    let app = app(inbox.clone()).await;
    let cookie = sign_up(&app, &inbox, "ada@example.com").await;

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/boards")
            .cookie(cookie)
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[rstest]
#[actix_web::test]
async fn failed_github_callback_redirects_with_error() {
    let app = app(Arc::new(Inbox::default())).await;
    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/auth/github/callback?code=nope")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .expect("location header");
    assert_eq!(location, "http://frontend.test/auth?error=github_auth_failed");
}
