use std::sync::Arc;

use axum::extract::FromRef;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    auth::{
        claims::TokenKind,
        jwt::JwtKeys,
        password::{hash_password, is_valid_email, normalize_email, verify_password, MIN_PASSWORD_LEN},
        repo::{DuplicateEmail, UserRepository},
        repo_types::{Identity, User},
    },
    error::AppError,
    state::AppState,
};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Password should be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid login credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidEmail | AuthError::PasswordTooShort => {
                AppError::BadRequest(e.to_string())
            }
            AuthError::EmailTaken => AppError::Conflict(e.to_string()),
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                AppError::Unauthorized(e.to_string())
            }
            AuthError::Internal(e) => AppError::Internal(e),
        }
    }
}

/// Result of a successful sign-up, sign-in or refresh.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub identity: Identity,
    pub access_token: String,
    pub refresh_token: String,
    pub session_token: String,
}

/// Identity provider backed by the `users` table.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone(), JwtKeys::from_ref(state))
    }
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            warn!(%email, "invalid email");
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            warn!("password too short");
            return Err(AuthError::PasswordTooShort);
        }
        if self.users.find_by_email(&email).await?.is_some() {
            warn!(%email, "email already registered");
            return Err(AuthError::EmailTaken);
        }

        let hash = hash_password(password)?;
        let user = self.users.create(&email, &hash).await.map_err(|e| {
            if e.downcast_ref::<DuplicateEmail>().is_some() {
                warn!(%email, "email registered concurrently");
                AuthError::EmailTaken
            } else {
                AuthError::Internal(e)
            }
        })?;
        info!(user_id = %user.id, email = %user.email, "user registered");
        self.issue(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidCredentials);
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!(%email, "login unknown email");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &user.password_hash)? {
            warn!(%email, user_id = %user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %user.id, "user logged in");
        self.issue(user)
    }

    /// Exchange a refresh token for a fresh token set.
    pub async fn refresh(&self, refresh_token: &str) -> Result<SignedIn, AuthError> {
        let claims = self
            .keys
            .verify_kind(refresh_token, TokenKind::Refresh)
            .map_err(|e| {
                warn!(error = %e, "refresh rejected");
                AuthError::InvalidToken
            })?;
        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        self.issue(user)
    }

    /// The user behind a token of the given kind. Invalid, expired or orphaned
    /// tokens yield `None`; only store failures are errors.
    pub async fn current_user(
        &self,
        token: &str,
        kind: TokenKind,
    ) -> anyhow::Result<Option<Identity>> {
        let claims = match self.keys.verify_kind(token, kind) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "ignoring invalid session token");
                return Ok(None);
            }
        };
        let user = self.users.find_by_id(claims.sub).await?;
        Ok(user.map(Identity::from))
    }

    fn issue(&self, user: User) -> Result<SignedIn, AuthError> {
        Ok(SignedIn {
            access_token: self.keys.sign_access(user.id)?,
            refresh_token: self.keys.sign_refresh(user.id)?,
            session_token: self.keys.sign_session(user.id)?,
            identity: user.into(),
        })
    }
}
