// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cookbook API Server
//!
//! Serves the recipe collection over REST, backed by Firestore, with
//! Firebase Authentication guarding writes.

use anyhow::Context;
use cookbook::{config::Config, db::RecipeDb, services::FirebaseTokenVerifier, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, "Starting Cookbook API");

    let db = if config.in_memory_db {
        tracing::warn!("Using in-memory recipe store; data is lost on restart");
        RecipeDb::new_in_memory()
    } else {
        RecipeDb::new(&config.firebase_project_id)
            .await
            .context("Failed to connect to Firestore")?
    };

    let token_verifier =
        FirebaseTokenVerifier::new(&config).context("Failed to initialize token verifier")?;

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        token_verifier,
    });

    let app = cookbook::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cookbook=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();

    Ok(())
}
