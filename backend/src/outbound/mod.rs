//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: process-local store for database-less runs and tests
//! - **github**: reqwest client for the GitHub OAuth flow
//! - **mail**: verification-code delivery
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod github;
pub mod mail;
pub mod memory;
pub mod persistence;
