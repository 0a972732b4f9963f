//! Authentication service - registration, login and bearer resolution.
//!
//! Passwords are hashed through the domain `Password` value object; tokens
//! come from `TokenService`. Registration never grants an elevated role.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::TokenService;
use crate::config::{TOKEN_TTL_SECONDS, TOKEN_TYPE_BEARER};
use crate::domain::{Caller, NewUser, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Token response returned after registration or login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account with role `user`.
    ///
    /// `requested_role`, when present, must be `user`: anything else valid is
    /// refused with `Forbidden`, anything unknown with `InvalidRole`.
    async fn register(
        &self,
        username: String,
        password: String,
        requested_role: Option<String>,
    ) -> AppResult<AuthResponse>;

    /// Login and return a fresh token
    async fn login(&self, username: String, password: String) -> AppResult<AuthResponse>;

    /// Resolve a bearer token to the caller it belongs to.
    ///
    /// Role and divisions come from the store, not from the token, so
    /// grants and role changes apply on the caller's next request.
    async fn authenticate(&self, token: &str) -> AppResult<Caller>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: TokenService,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, tokens: TokenService) -> Self {
        Self { uow, tokens }
    }

    fn token_response(&self, user: &User) -> AppResult<AuthResponse> {
        let token = self.tokens.issue(user.id, Some(user.role))?;

        Ok(AuthResponse {
            token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: TOKEN_TTL_SECONDS,
            user_id: user.id,
            role: user.role,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        username: String,
        password: String,
        requested_role: Option<String>,
    ) -> AppResult<AuthResponse> {
        if let Some(requested) = requested_role {
            let role: UserRole = requested.parse()?;
            if role != UserRole::User {
                tracing::warn!(%username, %role, "Registration with elevated role refused");
                return Err(AppError::forbidden(
                    "Access denied. Roles can only be changed by an admin.",
                ));
            }
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                username,
                password_hash,
                role: UserRole::User,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        self.token_response(&user)
    }

    async fn login(&self, username: String, password: String) -> AppResult<AuthResponse> {
        let user = self.uow.users().find_by_username(&username).await?;

        // Verify against a dummy hash for unknown users so both paths cost the same
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::dummy(),
        };
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => {
                tracing::info!(user_id = %user.id, "User logged in");
                self.token_response(&user)
            }
            _ => {
                tracing::debug!(%username, "Login failed");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn authenticate(&self, token: &str) -> AppResult<Caller> {
        let claims = self.tokens.verify(token)?;

        let user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid token. User no longer exists."))?;

        Ok(Caller::from(user))
    }
}
