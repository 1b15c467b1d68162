//! Card handlers: CRUD, moves between lanes, and rebalancing.
//!
//! ```text
//! POST  /api/v1/boards/{boardId}/cards {"name":"Write docs"}
//! PATCH /api/v1/boards/{boardId}/cards/{id}/move {"status":"ongoing","index":0}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::MoveCardRequest;
use crate::domain::{CardDraft, CardPatch, Clearable, Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::{created, ok};
use crate::inbound::http::schemas::{CardBody, Envelope, ErrorSchema, MessageSchema, RebalanceBody};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    BOARD_ID, FieldName, card_ref, nullable, optional_text, parse_card_status, parse_id,
    parse_index, required_text,
};

const NAME: FieldName = FieldName::new("name");
const STATUS: FieldName = FieldName::new("status");
const INDEX: FieldName = FieldName::new("index");
const USER_ID: FieldName = FieldName::new("userId");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCardRequest {
    #[schema(example = "Write docs")]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<CreateCardRequest> for CardDraft {
    type Error = Error;

    fn try_from(value: CreateCardRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required_text(value.name, NAME, "Card name")?,
            description: value.description,
        })
    }
}

/// Partial update; `"description": null` clears the description.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCardRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl TryFrom<UpdateCardRequest> for CardPatch {
    type Error = Error;

    fn try_from(value: UpdateCardRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: optional_text(value.name, NAME, "Card name")?,
            description: Clearable::from_nullable(value.description),
        })
    }
}

/// Target lane and slot for a card move.
///
/// `index` is the zero-based slot among the other cards of the board, as a
/// number or numeric string. Indices past the end append.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MoveCardBody {
    #[schema(example = "ongoing")]
    pub status: Option<String>,
    #[schema(value_type = u64, example = 0)]
    pub index: Option<Value>,
}

/// Create a card at the end of the backlog lane.
#[utoipa::path(
    post,
    path = "/api/v1/boards/{boardId}/cards",
    params(("boardId" = String, Path, format = "uuid")),
    request_body = CreateCardRequest,
    responses(
        (status = 201, description = "Card created", body = Envelope<CardBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "createCard",
    security(("SessionCookie" = []))
)]
#[post("/boards/{board_id}/cards")]
pub async fn create_card(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CreateCardRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let board_id = parse_id(&path, BOARD_ID)?;
    let draft = CardDraft::try_from(payload.into_inner())?;
    let card = state.cards.create(board_id, draft, actor).await?;
    Ok(created(
        &Envelope::data(CardBody::from(card)).with_message("Card created"),
    ))
}

/// Cards of a board in position order.
#[utoipa::path(
    get,
    path = "/api/v1/boards/{boardId}/cards",
    params(("boardId" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Cards", body = Envelope<Vec<CardBody>>),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "listCards",
    security(("SessionCookie" = []))
)]
#[get("/boards/{board_id}/cards")]
pub async fn list_cards(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let board_id = parse_id(&path, BOARD_ID)?;
    let cards = state.cards_query.list(board_id, actor).await?;
    Ok(ok(&Envelope::data(bodies(cards))))
}

/// Cards of a board that list `userId` as a member.
#[utoipa::path(
    get,
    path = "/api/v1/boards/{boardId}/cards/user/{userId}",
    params(
        ("boardId" = String, Path, format = "uuid"),
        ("userId" = String, Path, format = "uuid")
    ),
    responses(
        (status = 200, description = "Cards", body = Envelope<Vec<CardBody>>),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "listCardsForMember",
    security(("SessionCookie" = []))
)]
#[get("/boards/{board_id}/cards/user/{user_id}")]
pub async fn list_cards_for_member(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let (board_id, user_id) = path.into_inner();
    let board_id = parse_id(&board_id, BOARD_ID)?;
    let member: UserId = parse_id(&user_id, USER_ID)?;
    let cards = state
        .cards_query
        .list_for_member(board_id, member, actor)
        .await?;
    Ok(ok(&Envelope::data(bodies(cards))))
}

/// Renumber every card on the board to `1..n`, keeping their order.
#[utoipa::path(
    post,
    path = "/api/v1/boards/{boardId}/cards/rebalance",
    params(("boardId" = String, Path, format = "uuid")),
    responses(
        (status = 200, description = "Cards rebalanced", body = Envelope<RebalanceBody>),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "rebalanceCards",
    security(("SessionCookie" = []))
)]
#[post("/boards/{board_id}/cards/rebalance")]
pub async fn rebalance_cards(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let board_id = parse_id(&path, BOARD_ID)?;
    let outcome = state.cards.rebalance(board_id, actor).await?;
    Ok(ok(
        &Envelope::data(RebalanceBody::from(outcome)).with_message("Cards rebalanced"),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/boards/{boardId}/cards/{id}",
    params(
        ("boardId" = String, Path, format = "uuid"),
        ("id" = String, Path, format = "uuid")
    ),
    responses(
        (status = 200, description = "Card", body = Envelope<CardBody>),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board or card", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "getCard",
    security(("SessionCookie" = []))
)]
#[get("/boards/{board_id}/cards/{card_id}")]
pub async fn get_card(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let card = card_ref(&path.0, &path.1)?;
    let card = state.cards_query.get(card, actor).await?;
    Ok(ok(&Envelope::data(CardBody::from(card))))
}

/// Rename or re-describe a card. Position and lane are untouched.
#[utoipa::path(
    put,
    path = "/api/v1/boards/{boardId}/cards/{id}",
    params(
        ("boardId" = String, Path, format = "uuid"),
        ("id" = String, Path, format = "uuid")
    ),
    request_body = UpdateCardRequest,
    responses(
        (status = 200, description = "Card updated", body = Envelope<CardBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board or card", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "updateCard",
    security(("SessionCookie" = []))
)]
#[put("/boards/{board_id}/cards/{card_id}")]
pub async fn update_card(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateCardRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let card = card_ref(&path.0, &path.1)?;
    let patch = CardPatch::try_from(payload.into_inner())?;
    let card = state.cards.update(card, patch, actor).await?;
    Ok(ok(
        &Envelope::data(CardBody::from(card)).with_message("Card updated"),
    ))
}

/// Delete a card and its tasks.
#[utoipa::path(
    delete,
    path = "/api/v1/boards/{boardId}/cards/{id}",
    params(
        ("boardId" = String, Path, format = "uuid"),
        ("id" = String, Path, format = "uuid")
    ),
    responses(
        (status = 200, description = "Card deleted", body = MessageSchema),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board or card", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "deleteCard",
    security(("SessionCookie" = []))
)]
#[delete("/boards/{board_id}/cards/{card_id}")]
pub async fn delete_card(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let card = card_ref(&path.0, &path.1)?;
    state.cards.delete(card, actor).await?;
    Ok(ok(&Envelope::message("Card deleted successfully")))
}

/// Move a card to slot `index`, optionally changing its lane.
#[utoipa::path(
    patch,
    path = "/api/v1/boards/{boardId}/cards/{id}/move",
    params(
        ("boardId" = String, Path, format = "uuid"),
        ("id" = String, Path, format = "uuid")
    ),
    request_body = MoveCardBody,
    responses(
        (status = 200, description = "Card moved", body = Envelope<CardBody>),
        (status = 400, description = "Invalid status or index", body = ErrorSchema),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board or card", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "moveCard",
    security(("SessionCookie" = []))
)]
#[patch("/boards/{board_id}/cards/{card_id}/move")]
pub async fn move_card(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<MoveCardBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let card = card_ref(&path.0, &path.1)?;
    let MoveCardBody { status, index } = payload.into_inner();
    let status = status
        .as_deref()
        .map(|raw| parse_card_status(raw, STATUS))
        .transpose()?;
    let index = parse_index(index.as_ref(), INDEX)?;
    let moved = state
        .cards
        .move_card(MoveCardRequest {
            card,
            status,
            index,
            actor,
        })
        .await?;
    Ok(ok(
        &Envelope::data(CardBody::from(moved)).with_message("Card moved"),
    ))
}

fn bodies(cards: Vec<crate::domain::Card>) -> Vec<CardBody> {
    cards.into_iter().map(CardBody::from).collect()
}

#[cfg(test)]
#[path = "cards_tests.rs"]
mod tests;
