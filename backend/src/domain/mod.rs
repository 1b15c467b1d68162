//! Domain primitives, ordering engine, and services.
//!
//! Purpose: define the board, card, and task aggregates, the fractional
//! position allocator that orders them, and the services implementing the
//! driving ports. Nothing here depends on HTTP or a particular store.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure with a stable code.
//! - Board, Card, Task, User: aggregates and their drafts and patches.
//! - ordering: position allocation and sibling scope resolution.
//! - *Service: driving-port implementations generic over driven ports.

pub mod auth;
pub mod authorization;
pub mod board;
pub mod board_service;
pub mod card;
pub mod card_service;
pub mod email_auth_service;
pub mod error;
pub mod github_auth_service;
pub mod ids;
mod lookups;
pub mod ordering;
pub mod patch;
mod port_errors;
pub mod ports;
pub mod task;
pub mod task_service;
pub mod trace_id;
pub mod user;
pub mod user_profile_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::auth::{
    CodePurpose, GitHubLink, GitHubProfile, InvalidVerificationCode, OneTimeCode,
    VERIFICATION_CODE_MAX, VERIFICATION_CODE_MIN, VerificationCode, code_digest,
    generate_exchange_code,
};
pub use self::board::{Board, BoardDraft, BoardPatch};
pub use self::board_service::BoardService;
pub use self::card::{Card, CardDraft, CardPatch, CardStatus, ParseCardStatusError};
pub use self::card_service::CardOrderingService;
pub use self::email_auth_service::{EMAIL_CODE_TTL_SECS, EmailAuthService};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::github_auth_service::{EXCHANGE_CODE_TTL_SECS, GitHubAuthService};
pub use self::ids::{BoardId, CardId, IdError, TaskId, UserId};
pub use self::patch::Clearable;
pub use self::task::{ParseTaskFieldError, Task, TaskDraft, TaskPatch, TaskPriority, TaskStatus};
pub use self::task_service::TaskOrderingService;
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, User, UserValidationError};
pub use self::user_profile_service::UserProfileService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use taskboard::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
