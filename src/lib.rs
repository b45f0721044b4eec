// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Cookbook: a personal recipe collection.
//!
//! This crate provides the REST API over the recipe store (Firestore), with
//! Firebase ID tokens gating writes, and the client-side core the web front
//! end is built on: list filtering and sorting, debounced search, local
//! favorites and kitchen-mode progress, and the authentication context.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::RecipeDb;
use services::FirebaseTokenVerifier;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: RecipeDb,
    pub token_verifier: FirebaseTokenVerifier,
}
