// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;

/// Origin of the Vite dev server, always allowed by CORS.
pub const DEV_CLIENT_URL: &str = "http://localhost:5173";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase project ID. Doubles as the Firestore project and the
    /// expected audience of ID tokens.
    pub firebase_project_id: String,
    /// Deployed front end origin (optional, for CORS)
    pub client_url: Option<String>,
    /// Server port
    pub port: u16,
    /// Keep recipes in process memory instead of Firestore (local runs)
    pub in_memory_db: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .map(|v| v.trim().to_string())
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing("FIREBASE_PROJECT_ID"))?,
            client_url: env::var("CLIENT_URL")
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .unwrap_or(4000),
            in_memory_db: env::var("COOKBOOK_IN_MEMORY_DB")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }

    /// Config for tests: no deployed client, fixed project.
    pub fn test_default() -> Self {
        Self {
            firebase_project_id: "cookbook-test".to_string(),
            client_url: None,
            port: 4000,
            in_memory_db: true,
        }
    }

    /// Issuer Firebase stamps on ID tokens for this project.
    pub fn token_issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.firebase_project_id)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
