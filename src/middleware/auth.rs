// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token authentication for write endpoints.

use crate::error::AppError;
use crate::models::AuthenticatedUser;
use crate::services::TokenError;
use crate::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;

/// Authenticated caller, extracted from `Authorization: Bearer <Firebase ID token>`.
///
/// Taking this as a handler argument makes the route require auth; the
/// token is verified on every request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts.headers.get(header::AUTHORIZATION);

        let user = state
            .token_verifier
            .verify(auth_header)
            .await
            .map_err(|err| match err {
                TokenError::Missing => AppError::Unauthorized,
                TokenError::Invalid(reason) => {
                    tracing::debug!(reason = %reason, "Rejected bearer token");
                    AppError::InvalidToken
                }
                TokenError::Transient(reason) => {
                    tracing::error!(reason = %reason, "Token verification transient failure");
                    AppError::Internal(anyhow::anyhow!("token verification unavailable"))
                }
            })?;

        Ok(AuthUser(user))
    }
}
