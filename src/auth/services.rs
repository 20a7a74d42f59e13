use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use super::dto::{AuthResponse, Credentials, PublicUser};
use super::repo_types::User;
use super::tokens::{JwtKeys, TokenKind};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Password too short")]
    WeakPassword,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("User not found")]
    UserNotFound,
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for (StatusCode, String) {
    fn from(e: AuthError) -> Self {
        let status = match &e {
            AuthError::InvalidEmail | AuthError::WeakPassword => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::UserNotFound => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Internal(inner) => {
                error!(error = %inner, "auth internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, e.to_string())
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("argon2 hash: {e}"))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("argon2 parse: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

fn respond(keys: &JwtKeys, user: User) -> Result<AuthResponse, AuthError> {
    let pair = keys.issue_pair(user.id)?;
    Ok(AuthResponse {
        access_token: pair.access,
        refresh_token: pair.refresh,
        token_type: "Bearer",
        expires_in: keys.access_ttl.as_secs(),
        user: PublicUser::from(user),
    })
}

pub async fn register(
    db: &PgPool,
    keys: &JwtKeys,
    creds: Credentials,
) -> Result<AuthResponse, AuthError> {
    let creds = creds.normalized();
    if !is_valid_email(&creds.email) {
        return Err(AuthError::InvalidEmail);
    }
    if creds.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }

    let hash = hash_password(&creds.password)?;
    let user = User::create(db, &creds.email, &hash)
        .await?
        .ok_or(AuthError::EmailTaken)?;
    respond(keys, user)
}

pub async fn login(
    db: &PgPool,
    keys: &JwtKeys,
    creds: Credentials,
) -> Result<AuthResponse, AuthError> {
    let creds = creds.normalized();
    if !is_valid_email(&creds.email) {
        return Err(AuthError::InvalidCredentials);
    }

    let Some(user) = User::find_by_email(db, &creds.email).await? else {
        warn!(email = %creds.email, "login unknown email");
        return Err(AuthError::InvalidCredentials);
    };
    if !verify_password(&creds.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }
    respond(keys, user)
}

pub async fn refresh(
    db: &PgPool,
    keys: &JwtKeys,
    refresh_token: &str,
) -> Result<AuthResponse, AuthError> {
    let claims = keys
        .verify(refresh_token, TokenKind::Refresh)
        .map_err(|_| AuthError::InvalidToken)?;
    let user = User::find_by_id(db, claims.sub)
        .await?
        .ok_or(AuthError::UserNotFound)?;
    respond(keys, user)
}

/// Id of the caller, taken from a valid `Authorization: Bearer <access token>`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            ))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header".to_string(),
            ))?;

        let claims = JwtKeys::from_ref(state)
            .verify(token, TokenKind::Access)
            .map_err(|e| {
                warn!(error = %e, "rejected bearer token");
                (
                    StatusCode::UNAUTHORIZED,
                    AuthError::InvalidToken.to_string(),
                )
            })?;

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("Secur3P@ssw0rd!").expect("hashing should succeed");
        assert!(verify_password("Secur3P@ssw0rd!", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        assert!(verify_password("anything", "not-a-valid-hash").is_err());
    }

    #[test]
    fn error_statuses() {
        let status = |e: AuthError| <(StatusCode, String)>::from(e).0;
        assert_eq!(status(AuthError::WeakPassword), StatusCode::BAD_REQUEST);
        assert_eq!(status(AuthError::EmailTaken), StatusCode::CONFLICT);
        assert_eq!(status(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(AuthError::Internal(anyhow::anyhow!("db down"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn register_validates_before_touching_the_database() {
        let state = crate::state::AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let bad_email = Credentials {
            email: "nope".into(),
            password: "long-enough".into(),
        };
        assert!(matches!(
            register(&state.db, &keys, bad_email).await,
            Err(AuthError::InvalidEmail)
        ));
        let short = Credentials {
            email: "a@b.co".into(),
            password: "short".into(),
        };
        assert!(matches!(
            register(&state.db, &keys, short).await,
            Err(AuthError::WeakPassword)
        ));
    }

    #[tokio::test]
    async fn refresh_rejects_access_tokens() {
        let state = crate::state::AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let access = keys.issue_pair(Uuid::new_v4()).unwrap().access;
        assert!(matches!(
            refresh(&state.db, &keys, &access).await,
            Err(AuthError::InvalidToken)
        ));
    }
}
