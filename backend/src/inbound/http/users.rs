//! Profile of the signed-in user.
//!
//! ```text
//! GET /api/v1/users/me
//! ```

use actix_web::{HttpResponse, get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::ok;
use crate::inbound::http::schemas::{Envelope, ErrorSchema, UserBody};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Return the signed-in user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = Envelope<UserBody>),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("SessionCookie" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let user = state.profile.me(user_id).await?;
    Ok(ok(&Envelope::data(UserBody::from(user)).with_message("User retrieved")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;

    use crate::domain::UserId;
    use crate::inbound::http::test_utils::{Harness, session_cookie, sign_in_request};

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(current_user);
    }

    #[actix_web::test]
    async fn requires_a_session() {
        let harness = Harness::new();
        let app = test::init_service(harness.app(routes)).await;

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/api/v1/users/me").to_request())
                .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "Authentication required");
    }

    #[actix_web::test]
    async fn returns_the_signed_in_profile() {
        let harness = Harness::new();
        let user = harness.user("ada@example.com").await;
        let app = test::init_service(harness.app(routes)).await;
        let cookie = session_cookie(
            &test::call_service(&app, sign_in_request(&user.id).to_request()).await,
        );

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["data"]["id"], user.id.to_string());
        assert_eq!(body["data"]["displayName"], "ada");
    }

    #[actix_web::test]
    async fn stale_session_is_not_found() {
        let harness = Harness::new();
        let app = test::init_service(harness.app(routes)).await;
        let cookie = session_cookie(
            &test::call_service(&app, sign_in_request(&UserId::random()).to_request()).await,
        );

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/me")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
