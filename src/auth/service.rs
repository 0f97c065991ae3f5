use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{ApiError, StoreError};
use crate::store::types::User;
use crate::store::CatalogStore;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Registers a user and issues a token for the fresh session.
///
/// The `user_exists` call is a fast-path check only; the unique
/// constraints on username and email are the real guard, and a
/// `Duplicate` from the insert maps to the same error.
pub async fn signup(
    store: &dyn CatalogStore,
    keys: &JwtKeys,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(User, String), ApiError> {
    let username = username.trim();
    let email = email.trim().to_lowercase();

    if username.is_empty() {
        return Err(ApiError::InvalidInput("username must not be empty"));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::InvalidInput("invalid email"));
    }
    if password.len() < 8 {
        return Err(ApiError::InvalidInput("password too short"));
    }

    if store.user_exists(username, &email).await? {
        warn!(username, "signup rejected: identity taken");
        return Err(ApiError::DuplicateIdentity);
    }

    let hash = hash_password(password)?;
    let user = match store.create_user(username, &email, &hash).await {
        Ok(u) => u,
        Err(StoreError::Duplicate) => return Err(ApiError::DuplicateIdentity),
        Err(e) => return Err(e.into()),
    };

    let token = keys.sign(user.id)?;
    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((user, token))
}

/// Authenticates by username or email. Unknown identity and wrong
/// password collapse into the same `InvalidCredentials` so callers
/// cannot enumerate accounts.
pub async fn login(
    store: &dyn CatalogStore,
    keys: &JwtKeys,
    username_or_email: &str,
    password: &str,
) -> Result<(User, String), ApiError> {
    let ident = username_or_email.trim();

    let Some(user) = store.find_user(ident).await? else {
        warn!("login failed: unknown identity");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.id, "login failed: bad password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = keys.sign(user.id)?;
    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((user, token))
}
