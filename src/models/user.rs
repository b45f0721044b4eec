//! Caller identity extracted from a verified Firebase ID token.

use serde::{Deserialize, Serialize};

/// Identity of a signed-in user.
///
/// Lives only as long as the request (server) or session (client) that
/// produced it; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Firebase UID (token `sub`)
    pub uid: String,
    pub email: Option<String>,
    /// Display name, if the account has one
    pub name: Option<String>,
}
