//! Domain ports.
//!
//! Driven ports (`*Repository`, [`Mailer`], [`GitHubIdentityProvider`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;

mod auth_command;
mod board_command;
mod board_repository;
mod card_command;
mod card_repository;
mod github_identity_provider;
mod mailer;
mod task_command;
mod task_repository;
mod user_repository;
mod verification_code_repository;

pub(crate) use macros::define_port_error;

pub use auth_command::{EmailAuthCommand, GitHubAuthCommand, SignUpCodeSent, UserProfileQuery};
pub use board_command::{BoardCommand, BoardQuery};
pub use board_repository::{BoardRepository, BoardRepositoryError};
pub use card_command::{CardCommand, CardQuery, CardRef, MoveCardRequest, RebalanceOutcome};
pub use card_repository::{CardRepository, CardRepositoryError};
pub use github_identity_provider::{GitHubIdentityError, GitHubIdentityProvider};
pub use mailer::{Mailer, MailerError};
pub use task_command::{MoveTaskRequest, TaskCommand, TaskQuery, TaskRef};
pub use task_repository::{TaskRelocation, TaskRepository, TaskRepositoryError};
pub use user_repository::{UserRepository, UserRepositoryError};
pub use verification_code_repository::{
    VerificationCodeRepository, VerificationCodeRepositoryError,
};

#[cfg(test)]
pub use board_repository::MockBoardRepository;
#[cfg(test)]
pub use card_repository::MockCardRepository;
#[cfg(test)]
pub use github_identity_provider::MockGitHubIdentityProvider;
#[cfg(test)]
pub use mailer::MockMailer;
#[cfg(test)]
pub use task_repository::MockTaskRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use verification_code_repository::MockVerificationCodeRepository;
