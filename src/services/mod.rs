// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod firebase_auth;
pub mod ownership;

pub use firebase_auth::{FirebaseTokenVerifier, TokenError};
pub use ownership::{authorize, Decision, DenyReason};
