//! Authenticated user session

use cardvault_core::OwnerId;
use serde::{Deserialize, Serialize};

/// The signed-in user every store call is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: OwnerId,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserSession {
    pub fn new(user_id: OwnerId) -> Self {
        Self {
            user_id,
            email: None,
        }
    }

    pub fn with_email(user_id: OwnerId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: Some(email.into()),
        }
    }

    pub fn owner(&self) -> &OwnerId {
        &self.user_id
    }
}
