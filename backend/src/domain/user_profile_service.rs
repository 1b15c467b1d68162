//! Signed-in user profile lookups.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{UserProfileQuery, UserRepository};
use crate::domain::{Error, User, UserId};

/// Profile service implementing [`UserProfileQuery`].
#[derive(Clone)]
pub struct UserProfileService<U> {
    users: Arc<U>,
}

impl<U> UserProfileService<U> {
    /// Create a service over the user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U: UserRepository> UserProfileQuery for UserProfileService<U> {
    async fn me(&self, user_id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}
