use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for login; the identifier may be a username or an email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "usernameOrEmail", alias = "username_or_email")]
    pub username_or_email: String,
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: OffsetDateTime,
}

impl From<crate::store::types::User> for PublicUser {
    fn from(u: crate::store::types::User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

/// Response returned after signup or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: PublicUser,
    pub token: String,
}
