//! PostgreSQL-backed `VerificationCodeRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{VerificationCodeRepository, VerificationCodeRepositoryError};
use crate::domain::{CodePurpose, OneTimeCode};

use super::diesel_basic_error_mapping::StorageError;
use super::models::{NewOneTimeCodeRow, OneTimeCodeRow};
use super::pool::DbPool;
use super::schema::one_time_codes;

/// Diesel implementation of [`VerificationCodeRepository`].
#[derive(Clone)]
pub struct DieselVerificationCodeRepository {
    pool: DbPool,
}

impl DieselVerificationCodeRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationCodeRepository for DieselVerificationCodeRepository {
    async fn store(&self, code: &OneTimeCode) -> Result<(), VerificationCodeRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(VerificationCodeRepositoryError::from_pool)?;
        diesel::insert_into(one_time_codes::table)
            .values(NewOneTimeCodeRow::from(code))
            .on_conflict((one_time_codes::purpose, one_time_codes::subject))
            .do_update()
            .set((
                one_time_codes::digest.eq(excluded(one_time_codes::digest)),
                one_time_codes::expires_at.eq(excluded(one_time_codes::expires_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(VerificationCodeRepositoryError::from_diesel)
    }

    async fn consume(
        &self,
        purpose: CodePurpose,
        digest: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OneTimeCode>, VerificationCodeRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(VerificationCodeRepositoryError::from_pool)?;
        // Expired rows are deleted too so a stale code cannot linger.
        let row: Option<OneTimeCodeRow> = diesel::delete(
            one_time_codes::table
                .filter(one_time_codes::purpose.eq(purpose.as_str()))
                .filter(one_time_codes::digest.eq(digest)),
        )
        .returning(OneTimeCodeRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(VerificationCodeRepositoryError::from_diesel)?;

        let code = row
            .map(OneTimeCodeRow::into_code)
            .transpose()
            .map_err(VerificationCodeRepositoryError::query)?;
        Ok(code.filter(|code| code.is_live(now)))
    }
}
