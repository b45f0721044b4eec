// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Row-level ownership rule for recipe mutations.

/// Why a mutation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The recipe predates ownership and is locked against every caller.
    LegacyRecord,
    /// The recipe belongs to someone else.
    NotOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl DenyReason {
    pub fn message(self) -> &'static str {
        match self {
            DenyReason::LegacyRecord => "This recipe has no owner and cannot be modified",
            DenyReason::NotOwner => "You can only modify your own recipes",
        }
    }
}

/// Decide whether `caller_uid` may update or delete a recipe owned by `owner_id`.
///
/// Allowed only when both are present and equal. There is no way to claim a
/// legacy recipe.
pub fn authorize(owner_id: Option<&str>, caller_uid: &str) -> Decision {
    match owner_id.filter(|id| !id.is_empty()) {
        None => Decision::Deny(DenyReason::LegacyRecord),
        Some(owner) if !caller_uid.is_empty() && owner == caller_uid => Decision::Allow,
        Some(_) => Decision::Deny(DenyReason::NotOwner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_allowed() {
        assert_eq!(authorize(Some("u1"), "u1"), Decision::Allow);
    }

    #[test]
    fn test_other_user_denied() {
        assert_eq!(
            authorize(Some("u1"), "u2"),
            Decision::Deny(DenyReason::NotOwner)
        );
    }

    #[test]
    fn test_legacy_record_denied_for_everyone() {
        assert_eq!(
            authorize(Some(""), "u1"),
            Decision::Deny(DenyReason::LegacyRecord)
        );
        assert_eq!(
            authorize(None, "u1"),
            Decision::Deny(DenyReason::LegacyRecord)
        );
        assert_eq!(authorize(None, ""), Decision::Deny(DenyReason::LegacyRecord));
    }

    #[test]
    fn test_empty_caller_never_matches() {
        assert_eq!(
            authorize(Some("u1"), ""),
            Decision::Deny(DenyReason::NotOwner)
        );
    }
}
