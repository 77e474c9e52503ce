//! Caller identity
//!
//! Authentication itself lives in an opaque external identity provider; the
//! core only needs a resolved user id threaded through every write. The
//! provider is a trait so tests and embedders can substitute their own.

use serde::{Deserialize, Serialize};

use crate::error::{FarmError, FarmResult};

/// A resolved, authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

/// Identity stamped on write operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: i64,
}

impl From<&UserInfo> for UserContext {
    fn from(info: &UserInfo) -> Self {
        Self {
            user_id: info.user_id,
        }
    }
}

/// Source of the current caller identity.
pub trait IdentityProvider {
    /// Resolve the current user, or `Unauthenticated` when no session exists.
    fn current_user(&self) -> FarmResult<UserInfo>;
}

/// Fixed identity for CLI use and tests.
pub struct StaticIdentity {
    user: Option<UserInfo>,
}

impl StaticIdentity {
    pub fn new(user_id: i64, name: impl Into<String>) -> Self {
        Self {
            user: Some(UserInfo {
                user_id,
                name: name.into(),
                email: String::new(),
            }),
        }
    }

    /// A provider with no session; every call fails with Unauthenticated.
    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> FarmResult<UserInfo> {
        self.user.clone().ok_or(FarmError::Unauthenticated)
    }
}
