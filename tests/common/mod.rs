// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use cookbook::config::Config;
use cookbook::db::RecipeDb;
use cookbook::routes::create_router;
use cookbook::services::FirebaseTokenVerifier;
use cookbook::AppState;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub const TEST_KID: &str = "test-kid";

const PRIVATE_KEY_PEM: &[u8] = include_bytes!("../fixtures/test_rsa_private.pem");
const PUBLIC_KEY_PEM: &[u8] = include_bytes!("../fixtures/test_rsa_public.pem");

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection against the emulator.
#[allow(dead_code)]
pub async fn test_db() -> RecipeDb {
    RecipeDb::new("cookbook-test")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Token verifier that trusts only the fixture key.
#[allow(dead_code)]
pub fn test_verifier(config: &Config) -> FirebaseTokenVerifier {
    let key = DecodingKey::from_rsa_pem(PUBLIC_KEY_PEM).expect("fixture public key");
    FirebaseTokenVerifier::new_with_static_key(config, TEST_KID, key)
        .expect("Failed to build test verifier")
}

/// Create a test app over `db`. Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app_with_db(db: RecipeDb) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let token_verifier = test_verifier(&config);

    let state = Arc::new(AppState {
        config,
        db,
        token_verifier,
    });

    (create_router(state.clone()), state)
}

/// Create a test app with an empty in-memory recipe store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_db(RecipeDb::new_in_memory())
}

#[derive(Serialize)]
struct TestClaims<'a> {
    iss: String,
    aud: &'a str,
    sub: &'a str,
    iat: u64,
    auth_time: u64,
    exp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Sign a Firebase-shaped ID token for `uid` with the fixture key.
#[allow(dead_code)]
pub fn create_test_token(uid: &str, email: Option<&str>, name: Option<&str>) -> String {
    let config = Config::test_default();
    let now = now_secs();
    sign_claims(&TestClaims {
        iss: config.token_issuer(),
        aud: "cookbook-test",
        sub: uid,
        iat: now,
        auth_time: now,
        exp: now + 3600,
        email,
        name,
    })
}

/// Same as [`create_test_token`] but already expired.
#[allow(dead_code)]
pub fn create_expired_token(uid: &str) -> String {
    let config = Config::test_default();
    let now = now_secs();
    sign_claims(&TestClaims {
        iss: config.token_issuer(),
        aud: "cookbook-test",
        sub: uid,
        iat: now - 7200,
        auth_time: now - 7200,
        exp: now - 3600,
        email: None,
        name: None,
    })
}

/// Token for a different Firebase project.
#[allow(dead_code)]
pub fn create_foreign_project_token(uid: &str) -> String {
    let now = now_secs();
    sign_claims(&TestClaims {
        iss: "https://securetoken.google.com/someone-else".to_string(),
        aud: "someone-else",
        sub: uid,
        iat: now,
        auth_time: now,
        exp: now + 3600,
        email: None,
        name: None,
    })
}

fn sign_claims(claims: &TestClaims<'_>) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(TEST_KID.to_string());
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM).expect("fixture private key");
    encode(&header, claims, &key).expect("Failed to sign test token")
}

/// Build a JSON request, optionally with a bearer token.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
