//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel rows (`models.rs`) and domain types;
//! no ordering or authorization logic lives here. Connections come from a
//! `bb8` pool through `diesel-async`.
//!
//! ```ignore
//! use taskboard::outbound::persistence::{DbPool, DieselCardRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/taskboard")).await?;
//! let cards = DieselCardRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_board_repository;
mod diesel_card_repository;
mod diesel_task_repository;
mod diesel_user_repository;
mod diesel_verification_code_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_board_repository::DieselBoardRepository;
pub use diesel_card_repository::DieselCardRepository;
pub use diesel_task_repository::DieselTaskRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_verification_code_repository::DieselVerificationCodeRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
