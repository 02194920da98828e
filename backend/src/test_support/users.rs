//! In-memory user directory.

use async_trait::async_trait;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{DRIVER_ROLE, DeliveryToken, ONLINE_STATUS, UserContact, UserId};

/// A customer contact with an optional token.
pub fn user(id: &str, token: Option<&str>) -> UserContact {
    UserContact {
        id: UserId::new(id),
        role: "user".to_owned(),
        status: "offline".to_owned(),
        fcm_token: token.and_then(DeliveryToken::new),
    }
}

/// A driver contact with the given presence and optional token.
pub fn driver(id: &str, online: bool, token: Option<&str>) -> UserContact {
    UserContact {
        id: UserId::new(id),
        role: DRIVER_ROLE.to_owned(),
        status: if online { ONLINE_STATUS } else { "offline" }.to_owned(),
        fcm_token: token.and_then(DeliveryToken::new),
    }
}

/// Directory backed by a fixed list of users.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Vec<UserContact>,
    unavailable: bool,
}

impl InMemoryUserDirectory {
    /// Directory holding `users`.
    pub fn new(users: Vec<UserContact>) -> Self {
        Self {
            users,
            unavailable: false,
        }
    }

    /// Directory whose every lookup fails.
    pub fn unavailable() -> Self {
        Self {
            users: Vec::new(),
            unavailable: true,
        }
    }

    fn check(&self) -> Result<(), UserDirectoryError> {
        if self.unavailable {
            return Err(UserDirectoryError::connection("fixture directory offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user(&self, user_id: &UserId) -> Result<Option<UserContact>, UserDirectoryError> {
        self.check()?;
        Ok(self.users.iter().find(|user| &user.id == user_id).cloned())
    }

    async fn list_online_drivers(&self) -> Result<Vec<UserContact>, UserDirectoryError> {
        self.check()?;
        Ok(self
            .users
            .iter()
            .filter(|user| user.is_online_driver())
            .cloned()
            .collect())
    }
}
