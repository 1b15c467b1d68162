//! OpenAPI documentation for the REST API.
//!
//! Registers every handler path, the response and request schemas, and the
//! session cookie security scheme. Swagger UI serves it in debug builds and
//! `openapi-dump` prints it for tooling.

use crate::inbound::http::auth::{CodeSentBody, EmailAuthRequest, ExchangeRequest};
use crate::inbound::http::boards::{AddMemberRequest, CreateBoardRequest, UpdateBoardRequest};
use crate::inbound::http::cards::{CreateCardRequest, MoveCardBody, UpdateCardRequest};
use crate::inbound::http::schemas::{
    BoardBody, CardBody, ErrorCodeSchema, ErrorSchema, MessageSchema, RebalanceBody, TaskBody,
    UserBody,
};
use crate::inbound::http::tasks::{
    AssignTaskRequest, CreateTaskRequest, MoveTaskBody, UpdateTaskRequest,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the sign-up, sign-in and GitHub exchange endpoints.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Taskboard API",
        description = "Collaborative boards with ordered cards and tasks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::sign_in,
        crate::inbound::http::auth::sign_out,
        crate::inbound::http::auth::github_authorize,
        crate::inbound::http::auth::github_callback,
        crate::inbound::http::auth::github_exchange,
        crate::inbound::http::users::current_user,
        crate::inbound::http::boards::create_board,
        crate::inbound::http::boards::list_boards,
        crate::inbound::http::boards::get_board,
        crate::inbound::http::boards::update_board,
        crate::inbound::http::boards::delete_board,
        crate::inbound::http::boards::add_member,
        crate::inbound::http::cards::create_card,
        crate::inbound::http::cards::list_cards,
        crate::inbound::http::cards::list_cards_for_member,
        crate::inbound::http::cards::rebalance_cards,
        crate::inbound::http::cards::get_card,
        crate::inbound::http::cards::update_card,
        crate::inbound::http::cards::delete_card,
        crate::inbound::http::cards::move_card,
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::rebalance_tasks,
        crate::inbound::http::tasks::get_task,
        crate::inbound::http::tasks::update_task,
        crate::inbound::http::tasks::delete_task,
        crate::inbound::http::tasks::assign_task,
        crate::inbound::http::tasks::move_task,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MessageSchema,
        UserBody,
        BoardBody,
        CardBody,
        TaskBody,
        RebalanceBody,
        CodeSentBody,
        EmailAuthRequest,
        ExchangeRequest,
        CreateBoardRequest,
        UpdateBoardRequest,
        AddMemberRequest,
        CreateCardRequest,
        UpdateCardRequest,
        MoveCardBody,
        CreateTaskRequest,
        UpdateTaskRequest,
        AssignTaskRequest,
        MoveTaskBody,
    )),
    tags(
        (name = "auth", description = "Email and GitHub sign-in"),
        (name = "users", description = "The signed-in account"),
        (name = "boards", description = "Boards and membership"),
        (name = "cards", description = "Cards and their lane ordering"),
        (name = "tasks", description = "Tasks and their per-card ordering"),
        (name = "health", description = "Readiness and liveness probes")
    )
)]
pub struct ApiDoc;
