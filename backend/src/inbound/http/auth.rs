//! Sign-up, sign-in, sign-out, and the GitHub OAuth round trip.
//!
//! ```text
//! POST /api/v1/auth/signup {"email":"ada@example.com"}
//! POST /api/v1/auth/signup {"email":"ada@example.com","verificationCode":"123456"}
//! GET  /api/v1/auth/github/callback?code=...
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

use crate::domain::User;
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::{created, ok};
use crate::inbound::http::schemas::{Envelope, ErrorSchema, MessageSchema, UserBody};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, optional_text, required_text};

const EMAIL: FieldName = FieldName::new("email");
const VERIFICATION_CODE: FieldName = FieldName::new("verificationCode");
const CODE: FieldName = FieldName::new("code");

/// Body for `POST /auth/signup` and `POST /auth/signin`.
///
/// Without `verificationCode` a code is mailed; with it the code is redeemed.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailAuthRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "123456")]
    pub verification_code: Option<String>,
}

impl EmailAuthRequest {
    fn into_parts(self) -> ApiResult<(String, Option<String>)> {
        let email = required_text(self.email, EMAIL, "Email")?;
        let code = optional_text(self.verification_code, VERIFICATION_CODE, "Verification code")?;
        Ok((email, code))
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeSentBody {
    pub is_existing_user: bool,
}

/// Body for `POST /auth/github/exchange`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ExchangeRequest {
    pub code: Option<String>,
}

/// Query string GitHub appends to the callback.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

fn signed_in(session: &SessionContext, user: User, message: &str) -> ApiResult<Envelope<UserBody>> {
    session.persist_user(&user.id)?;
    Ok(Envelope::data(UserBody::from(user)).with_message(message))
}

/// Request a sign-up code, or redeem one to create the account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = EmailAuthRequest,
    responses(
        (status = 200, description = "Verification code sent", body = Envelope<CodeSentBody>),
        (status = 201, description = "Account created and signed in", body = Envelope<UserBody>,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid or expired code", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signUp",
    security([])
)]
#[post("/auth/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<EmailAuthRequest>,
) -> ApiResult<HttpResponse> {
    let (email, code) = payload.into_inner().into_parts()?;
    match code {
        Some(code) => {
            let user = state.email_auth.sign_up(&email, &code).await?;
            Ok(created(&signed_in(&session, user, "User created")?))
        }
        None => {
            let sent = state.email_auth.request_sign_up_code(&email).await?;
            let message = if sent.is_existing_user {
                "User exists. Verification code sent for sign in."
            } else {
                "Verification code sent"
            };
            let body = CodeSentBody {
                is_existing_user: sent.is_existing_user,
            };
            Ok(ok(&Envelope::data(body).with_message(message)))
        }
    }
}

/// Request a sign-in code, or redeem one to sign in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    request_body = EmailAuthRequest,
    responses(
        (status = 200, description = "Code sent, or signed in when a code was supplied",
            body = Envelope<UserBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid or expired code", body = ErrorSchema),
        (status = 404, description = "No account for this email", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signIn",
    security([])
)]
#[post("/auth/signin")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<EmailAuthRequest>,
) -> ApiResult<HttpResponse> {
    let (email, code) = payload.into_inner().into_parts()?;
    match code {
        Some(code) => {
            let user = state.email_auth.sign_in(&email, &code).await?;
            Ok(ok(&signed_in(&session, user, "Login successful")?))
        }
        None => {
            state.email_auth.request_sign_in_code(&email).await?;
            Ok(ok(&Envelope::message("Verification code sent")))
        }
    }
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signout",
    responses((status = 200, description = "Signed out", body = MessageSchema)),
    tags = ["auth"],
    operation_id = "signOut",
    security([])
)]
#[post("/auth/signout")]
pub async fn sign_out(session: SessionContext) -> HttpResponse {
    session.sign_out();
    ok(&Envelope::message("Signed out successfully"))
}

/// Redirect the browser to GitHub's consent screen.
#[utoipa::path(
    get,
    path = "/api/v1/auth/github",
    responses((status = 302, description = "Redirect to GitHub")),
    tags = ["auth"],
    operation_id = "githubAuthorize",
    security([])
)]
#[get("/auth/github")]
pub async fn github_authorize(state: web::Data<HttpState>) -> HttpResponse {
    redirect(&state.github_auth.authorization_url())
}

/// GitHub redirect target; forwards an exchange code to the frontend.
#[utoipa::path(
    get,
    path = "/api/v1/auth/github/callback",
    params(CallbackQuery),
    responses((status = 302, description = "Redirect to the frontend")),
    tags = ["auth"],
    operation_id = "githubCallback",
    security([])
)]
#[get("/auth/github/callback")]
pub async fn github_callback(
    state: web::Data<HttpState>,
    query: web::Query<CallbackQuery>,
) -> HttpResponse {
    let CallbackQuery { code, error } = query.into_inner();
    if let Some(error) = error {
        warn!(%error, "github denied the authorization request");
        return redirect(&state.frontend_link("/auth?error=github_auth_failed"));
    }
    let outcome = state
        .github_auth
        .complete_callback(code.as_deref().unwrap_or_default())
        .await;
    match outcome {
        Ok(exchange) => redirect(&state.frontend_link(&format!("/auth/github?code={exchange}"))),
        Err(err) => {
            warn!(error = %err, "github callback failed");
            redirect(&state.frontend_link("/auth?error=github_auth_failed"))
        }
    }
}

/// Trade an exchange code for a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/github/exchange",
    request_body = ExchangeRequest,
    responses(
        (status = 200, description = "Signed in", body = Envelope<UserBody>,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing code", body = ErrorSchema),
        (status = 401, description = "Invalid or expired code", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "githubExchange",
    security([])
)]
#[post("/auth/github/exchange")]
pub async fn github_exchange(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ExchangeRequest>,
) -> ApiResult<HttpResponse> {
    let code = required_text(payload.into_inner().code, CODE, "Code")?;
    let user = state.github_auth.exchange(&code).await?;
    Ok(ok(&signed_in(&session, user, "Login successful")?))
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
