//! Board CRUD and membership handlers.
//!
//! ```text
//! POST /api/v1/boards {"name":"Launch"}
//! POST /api/v1/boards/{boardId}/members {"memberId":"..."}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BoardDraft, BoardPatch, Clearable, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::{created, ok};
use crate::inbound::http::schemas::{BoardBody, Envelope, ErrorSchema, MessageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    BOARD_ID, FieldName, nullable, optional_text, parse_id, required_id, required_text,
};

const NAME: FieldName = FieldName::new("name");
const MEMBER_ID: FieldName = FieldName::new("memberId");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateBoardRequest {
    #[schema(example = "Launch")]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<CreateBoardRequest> for BoardDraft {
    type Error = crate::domain::Error;

    fn try_from(value: CreateBoardRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required_text(value.name, NAME, "Board name")?,
            description: value.description,
        })
    }
}

/// Partial update; `"description": null` clears the description.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBoardRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl TryFrom<UpdateBoardRequest> for BoardPatch {
    type Error = crate::domain::Error;

    fn try_from(value: UpdateBoardRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: optional_text(value.name, NAME, "Board name")?,
            description: Clearable::from_nullable(value.description),
        })
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    #[schema(format = "uuid")]
    pub member_id: Option<String>,
}

/// Create a board owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/boards",
    request_body = CreateBoardRequest,
    responses(
        (status = 201, description = "Board created", body = Envelope<BoardBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["boards"],
    operation_id = "createBoard",
    security(("SessionCookie" = []))
)]
#[post("/boards")]
pub async fn create_board(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateBoardRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let draft = BoardDraft::try_from(payload.into_inner())?;
    let board = state.boards.create(draft, actor).await?;
    Ok(created(
        &Envelope::data(BoardBody::from(board)).with_message("Board created"),
    ))
}

/// Boards the caller belongs to, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/boards",
    responses(
        (status = 200, description = "Boards", body = Envelope<Vec<BoardBody>>),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["boards"],
    operation_id = "listBoards",
    security(("SessionCookie" = []))
)]
#[get("/boards")]
pub async fn list_boards(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let boards = state.boards_query.list(actor).await?;
    let body: Vec<BoardBody> = boards.into_iter().map(BoardBody::from).collect();
    Ok(ok(&Envelope::data(body)))
}

#[utoipa::path(
    get,
    path = "/api/v1/boards/{boardId}",
    params(("boardId" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Board", body = Envelope<BoardBody>),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board", body = ErrorSchema)
    ),
    tags = ["boards"],
    operation_id = "getBoard",
    security(("SessionCookie" = []))
)]
#[get("/boards/{board_id}")]
pub async fn get_board(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let board_id = parse_id(&path, BOARD_ID)?;
    let board = state.boards_query.get(board_id, actor).await?;
    Ok(ok(&Envelope::data(BoardBody::from(board))))
}

/// Rename or re-describe a board. Owner only.
#[utoipa::path(
    put,
    path = "/api/v1/boards/{boardId}",
    params(("boardId" = String, Path, format = "uuid")),
    request_body = UpdateBoardRequest,
    responses(
        (status = 200, description = "Board updated", body = Envelope<BoardBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown board", body = ErrorSchema)
    ),
    tags = ["boards"],
    operation_id = "updateBoard",
    security(("SessionCookie" = []))
)]
#[put("/boards/{board_id}")]
pub async fn update_board(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateBoardRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let board_id = parse_id(&path, BOARD_ID)?;
    let patch = BoardPatch::try_from(payload.into_inner())?;
    let board = state.boards.update(board_id, patch, actor).await?;
    Ok(ok(
        &Envelope::data(BoardBody::from(board)).with_message("Board updated"),
    ))
}

/// Delete a board with its cards and tasks. Owner only.
#[utoipa::path(
    delete,
    path = "/api/v1/boards/{boardId}",
    params(("boardId" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Board deleted", body = MessageSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown board", body = ErrorSchema)
    ),
    tags = ["boards"],
    operation_id = "deleteBoard",
    security(("SessionCookie" = []))
)]
#[delete("/boards/{board_id}")]
pub async fn delete_board(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let board_id = parse_id(&path, BOARD_ID)?;
    state.boards.delete(board_id, actor).await?;
    Ok(ok(&Envelope::message("Board deleted successfully")))
}

/// Add a registered user to the board. Owner only; repeats are no-ops.
#[utoipa::path(
    post,
    path = "/api/v1/boards/{boardId}/members",
    params(("boardId" = String, Path, format = "uuid")),
    request_body = AddMemberRequest,
    responses(
        (status = 200, description = "Member added", body = Envelope<BoardBody>),
        (status = 400, description = "Invalid or unknown member", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown board", body = ErrorSchema)
    ),
    tags = ["boards"],
    operation_id = "addBoardMember",
    security(("SessionCookie" = []))
)]
#[post("/boards/{board_id}/members")]
pub async fn add_member(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AddMemberRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let board_id = parse_id(&path, BOARD_ID)?;
    let member: UserId = required_id(payload.member_id.as_deref(), MEMBER_ID)?;
    let board = state.boards.add_member(board_id, member, actor).await?;
    Ok(ok(
        &Envelope::data(BoardBody::from(board)).with_message("Member added"),
    ))
}

#[cfg(test)]
#[path = "boards_tests.rs"]
mod tests;
