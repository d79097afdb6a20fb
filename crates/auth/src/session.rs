//! Current-user session state.

use serde::{Deserialize, Serialize};

use tapdesk_core::{ClientError, ClientResult, PriceTier};

use crate::directory;

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub tier: PriceTier,
}

/// Holds the current user, if anyone is signed in.
#[derive(Debug, Default)]
pub struct AuthSession {
    user: Option<UserProfile>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign in by email. The tier comes from the account directory;
    /// unknown emails are rejected.
    pub fn login(&mut self, email: &str) -> ClientResult<UserProfile> {
        let tier = directory::resolve_tier(email).ok_or_else(|| {
            ClientError::validation(format!("unknown ordering account: {email}"))
        })?;

        let user = UserProfile {
            email: directory::normalize_email(email),
            tier,
        };
        self.user = Some(user.clone());
        Ok(user)
    }

    /// Sign out. A no-op when nobody is signed in.
    pub fn logout(&mut self) {
        self.user = None;
    }

    pub fn current(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
