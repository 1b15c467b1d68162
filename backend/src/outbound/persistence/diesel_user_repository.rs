//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, GitHubLink, User, UserId};

use super::diesel_basic_error_mapping::{StorageError, is_unique_violation};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_user(row: Option<UserRow>) -> Result<Option<User>, UserRepositoryError> {
    row.map(UserRow::into_user)
        .transpose()
        .map_err(UserRepositoryError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(UserRepositoryError::from_pool)?;
        let row = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(UserRepositoryError::from_diesel)?;
        into_user(row)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(UserRepositoryError::from_pool)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(UserRepositoryError::from_diesel)?;
        into_user(row)
    }

    async fn find_by_github_id(
        &self,
        github_id: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(UserRepositoryError::from_pool)?;
        let row = users::table
            .filter(users::github_id.eq(github_id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(UserRepositoryError::from_diesel)?;
        into_user(row)
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(UserRepositoryError::from_pool)?;
        diesel::insert_into(users::table)
            .values(NewUserRow::from(user))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| {
                if is_unique_violation(&error, EMAIL_CONSTRAINT) {
                    UserRepositoryError::duplicate_email(user.email.as_ref())
                } else {
                    UserRepositoryError::from_diesel(error)
                }
            })
    }

    async fn link_github(
        &self,
        id: &UserId,
        link: &GitHubLink,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(UserRepositoryError::from_pool)?;
        let row = diesel::update(users::table.find(*id.as_uuid()))
            .set((
                users::github_id.eq(Some(link.github_id.as_str())),
                users::avatar_url.eq(link.avatar_url.as_deref()),
                users::updated_at.eq(at),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(UserRepositoryError::from_diesel)?;
        into_user(row)
    }
}
