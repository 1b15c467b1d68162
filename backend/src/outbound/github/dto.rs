//! Wire shapes for GitHub OAuth and REST responses.

use serde::{Deserialize, Serialize};

use crate::domain::GitHubProfile;

#[derive(Debug, Serialize)]
pub(super) struct TokenRequestDto<'a> {
    pub(super) client_id: &'a str,
    pub(super) client_secret: &'a str,
    pub(super) code: &'a str,
}

/// Token endpoint body. GitHub reports OAuth failures with status 200 and an
/// `error` field instead of a token.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) access_token: Option<String>,
    pub(super) error: Option<String>,
    pub(super) error_description: Option<String>,
}

impl TokenResponseDto {
    pub(super) fn into_token(self) -> Result<String, String> {
        match self.access_token.filter(|token| !token.is_empty()) {
            Some(token) => Ok(token),
            None => Err(self
                .error_description
                .or(self.error)
                .unwrap_or_else(|| "no access token issued".to_owned())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: u64,
    pub(super) login: String,
    pub(super) name: Option<String>,
    pub(super) email: Option<String>,
    pub(super) avatar_url: Option<String>,
}

impl From<UserDto> for GitHubProfile {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id.to_string(),
            login: dto.login,
            name: dto.name,
            email: dto.email,
            avatar_url: dto.avatar_url,
        }
    }
}
