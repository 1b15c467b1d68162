//! Task handlers: CRUD, assignment, moves between cards, and rebalancing.
//!
//! ```text
//! POST  /api/v1/boards/{boardId}/cards/{id}/tasks {"title":"Draft outline"}
//! PATCH /api/v1/boards/{boardId}/cards/{id}/tasks/{taskId}/move {"toCardId":"...","index":2}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::MoveTaskRequest;
use crate::domain::{CardId, Clearable, Error, Task, TaskDraft, TaskPatch, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::{created, ok};
use crate::inbound::http::schemas::{Envelope, ErrorSchema, MessageSchema, RebalanceBody, TaskBody};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, card_ref, nullable, optional_text, parse_index, parse_priority, parse_rfc3339,
    parse_task_status, required_id, required_text, task_ref,
};

const TITLE: FieldName = FieldName::new("title");
const PRIORITY: FieldName = FieldName::new("priority");
const STATUS: FieldName = FieldName::new("status");
const DEADLINE: FieldName = FieldName::new("deadline");
const MEMBER_ID: FieldName = FieldName::new("memberId");
const TO_CARD_ID: FieldName = FieldName::new("toCardId");
const INDEX: FieldName = FieldName::new("index");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTaskRequest {
    #[schema(example = "Draft outline")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "high")]
    pub priority: Option<String>,
    #[schema(format = "date-time")]
    pub deadline: Option<String>,
    #[schema(example = "todo")]
    pub status: Option<String>,
}

impl TryFrom<CreateTaskRequest> for TaskDraft {
    type Error = Error;

    fn try_from(value: CreateTaskRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: required_text(value.title, TITLE, "Task title")?,
            description: value.description,
            priority: value
                .priority
                .as_deref()
                .map(|raw| parse_priority(raw, PRIORITY))
                .transpose()?,
            deadline: value
                .deadline
                .as_deref()
                .map(|raw| parse_rfc3339(raw, DEADLINE))
                .transpose()?,
            status: value
                .status
                .as_deref()
                .map(|raw| parse_task_status(raw, STATUS))
                .transpose()?,
        })
    }
}

/// Partial update. `description` and `deadline` accept `null` to clear.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub priority: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub deadline: Option<Option<String>>,
}

impl TryFrom<UpdateTaskRequest> for TaskPatch {
    type Error = Error;

    fn try_from(value: UpdateTaskRequest) -> Result<Self, Self::Error> {
        let deadline = match value.deadline {
            None => Clearable::Unchanged,
            Some(None) => Clearable::Clear,
            Some(Some(raw)) => Clearable::Set(parse_rfc3339(&raw, DEADLINE)?),
        };
        Ok(Self {
            title: optional_text(value.title, TITLE, "Task title")?,
            description: Clearable::from_nullable(value.description),
            priority: value
                .priority
                .as_deref()
                .map(|raw| parse_priority(raw, PRIORITY))
                .transpose()?,
            status: value
                .status
                .as_deref()
                .map(|raw| parse_task_status(raw, STATUS))
                .transpose()?,
            deadline,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskRequest {
    #[schema(format = "uuid")]
    pub member_id: Option<String>,
}

/// Destination card and slot for a task move.
///
/// `index` is the zero-based slot among the destination's other tasks, as a
/// number or numeric string. Indices past the end append.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskBody {
    #[schema(format = "uuid")]
    pub to_card_id: Option<String>,
    #[schema(value_type = u64, example = 0)]
    pub index: Option<Value>,
}

/// Append a task to a card.
#[utoipa::path(
    post,
    path = "/api/v1/boards/{boardId}/cards/{id}/tasks",
    params(
        ("boardId" = String, Path, format = "uuid"),
        ("id" = String, Path, format = "uuid")
    ),
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Envelope<TaskBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board or card", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "createTask",
    security(("SessionCookie" = []))
)]
#[post("/boards/{board_id}/cards/{card_id}/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    payload: web::Json<CreateTaskRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let card = card_ref(&path.0, &path.1)?;
    let draft = TaskDraft::try_from(payload.into_inner())?;
    let task = state.tasks.create(card, draft, actor).await?;
    Ok(created(
        &Envelope::data(TaskBody::from(task)).with_message("Task created"),
    ))
}

/// Tasks of a card in position order.
#[utoipa::path(
    get,
    path = "/api/v1/boards/{boardId}/cards/{id}/tasks",
    params(
        ("boardId" = String, Path, format = "uuid"),
        ("id" = String, Path, format = "uuid")
    ),
    responses(
        (status = 200, description = "Tasks", body = Envelope<Vec<TaskBody>>),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board or card", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "listTasks",
    security(("SessionCookie" = []))
)]
#[get("/boards/{board_id}/cards/{card_id}/tasks")]
pub async fn list_tasks(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let card = card_ref(&path.0, &path.1)?;
    let tasks = state.tasks_query.list(card, actor).await?;
    let body: Vec<TaskBody> = tasks.into_iter().map(TaskBody::from).collect();
    Ok(ok(&Envelope::data(body)))
}

/// Renumber the card's tasks to `1..n`, keeping their order.
#[utoipa::path(
    post,
    path = "/api/v1/boards/{boardId}/cards/{id}/tasks/rebalance",
    params(
        ("boardId" = String, Path, format = "uuid"),
        ("id" = String, Path, format = "uuid")
    ),
    responses(
        (status = 200, description = "Tasks rebalanced", body = Envelope<RebalanceBody>),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board or card", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "rebalanceTasks",
    security(("SessionCookie" = []))
)]
#[post("/boards/{board_id}/cards/{card_id}/tasks/rebalance")]
pub async fn rebalance_tasks(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let card = card_ref(&path.0, &path.1)?;
    let outcome = state.tasks.rebalance(card, actor).await?;
    Ok(ok(
        &Envelope::data(RebalanceBody::from(outcome)).with_message("Tasks rebalanced"),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/boards/{boardId}/cards/{id}/tasks/{taskId}",
    params(
        ("boardId" = String, Path, format = "uuid"),
        ("id" = String, Path, format = "uuid"),
        ("taskId" = String, Path, format = "uuid")
    ),
    responses(
        (status = 200, description = "Task", body = Envelope<TaskBody>),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board, card, or task", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "getTask",
    security(("SessionCookie" = []))
)]
#[get("/boards/{board_id}/cards/{card_id}/tasks/{task_id}")]
pub async fn get_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String, String)>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let task = task_ref(&path.0, &path.1, &path.2)?;
    let task = state.tasks_query.get(task, actor).await?;
    Ok(ok(&Envelope::data(TaskBody::from(task))))
}

/// Change task fields. Card and position are untouched.
#[utoipa::path(
    put,
    path = "/api/v1/boards/{boardId}/cards/{id}/tasks/{taskId}",
    params(
        ("boardId" = String, Path, format = "uuid"),
        ("id" = String, Path, format = "uuid"),
        ("taskId" = String, Path, format = "uuid")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = Envelope<TaskBody>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board, card, or task", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "updateTask",
    security(("SessionCookie" = []))
)]
#[put("/boards/{board_id}/cards/{card_id}/tasks/{task_id}")]
pub async fn update_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String, String)>,
    payload: web::Json<UpdateTaskRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let task = task_ref(&path.0, &path.1, &path.2)?;
    let patch = TaskPatch::try_from(payload.into_inner())?;
    let task = state.tasks.update(task, patch, actor).await?;
    Ok(ok(
        &Envelope::data(TaskBody::from(task)).with_message("Task updated"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/boards/{boardId}/cards/{id}/tasks/{taskId}",
    params(
        ("boardId" = String, Path, format = "uuid"),
        ("id" = String, Path, format = "uuid"),
        ("taskId" = String, Path, format = "uuid")
    ),
    responses(
        (status = 200, description = "Task deleted", body = MessageSchema),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board, card, or task", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask",
    security(("SessionCookie" = []))
)]
#[delete("/boards/{board_id}/cards/{card_id}/tasks/{task_id}")]
pub async fn delete_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String, String)>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let task = task_ref(&path.0, &path.1, &path.2)?;
    state.tasks.delete(task, actor).await?;
    Ok(ok(&Envelope::message("Task deleted successfully")))
}

/// Assign the task to a board member.
#[utoipa::path(
    post,
    path = "/api/v1/boards/{boardId}/cards/{id}/tasks/{taskId}/assign",
    params(
        ("boardId" = String, Path, format = "uuid"),
        ("id" = String, Path, format = "uuid"),
        ("taskId" = String, Path, format = "uuid")
    ),
    request_body = AssignTaskRequest,
    responses(
        (status = 201, description = "Task assigned", body = Envelope<TaskBody>),
        (status = 400, description = "Assignee is not a board member", body = ErrorSchema),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board, card, or task", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "assignTask",
    security(("SessionCookie" = []))
)]
#[post("/boards/{board_id}/cards/{card_id}/tasks/{task_id}/assign")]
pub async fn assign_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String, String)>,
    payload: web::Json<AssignTaskRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let task = task_ref(&path.0, &path.1, &path.2)?;
    let member: UserId = required_id(payload.member_id.as_deref(), MEMBER_ID)?;
    let task = state.tasks.assign(task, member, actor).await?;
    Ok(created(
        &Envelope::data(TaskBody::from(task)).with_message("Task assigned"),
    ))
}

/// Move a task to slot `index` of `toCardId`, which may be its own card.
#[utoipa::path(
    patch,
    path = "/api/v1/boards/{boardId}/cards/{id}/tasks/{taskId}/move",
    params(
        ("boardId" = String, Path, format = "uuid"),
        ("id" = String, Path, format = "uuid"),
        ("taskId" = String, Path, format = "uuid")
    ),
    request_body = MoveTaskBody,
    responses(
        (status = 200, description = "Task moved", body = Envelope<TaskBody>),
        (status = 400, description = "Invalid destination or index", body = ErrorSchema),
        (status = 403, description = "Not a member", body = ErrorSchema),
        (status = 404, description = "Unknown board, card, or task", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "moveTask",
    security(("SessionCookie" = []))
)]
#[patch("/boards/{board_id}/cards/{card_id}/tasks/{task_id}/move")]
pub async fn move_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String, String)>,
    payload: web::Json<MoveTaskBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let task = task_ref(&path.0, &path.1, &path.2)?;
    let MoveTaskBody { to_card_id, index } = payload.into_inner();
    let to_card_id: CardId = required_id(to_card_id.as_deref(), TO_CARD_ID)?;
    let index = parse_index(index.as_ref(), INDEX)?;
    let moved: Task = state
        .tasks
        .move_task(MoveTaskRequest {
            task,
            to_card_id,
            index,
            actor,
        })
        .await?;
    Ok(ok(
        &Envelope::data(TaskBody::from(moved)).with_message("Task moved"),
    ))
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
