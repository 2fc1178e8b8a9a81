use super::model::User;
use crate::error::{FormsiteError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Store a user in one atomic write.
    ///
    /// # Errors
    /// `FormsiteError::Duplicate` when the email is already taken,
    /// `FormsiteError::Persistence` when the backend fails.
    async fn insert(&self, user: User) -> Result<User>;

    async fn find_all(&self) -> Result<Vec<User>>;

    async fn count(&self) -> Result<usize>;
}

/// Process-local user table keyed by email
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self.users.contains_key(email))
    }

    async fn insert(&self, user: User) -> Result<User> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(FormsiteError::Duplicate {
                field: "email".to_string(),
                value: user.email,
            }),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                tracing::debug!(user_id = %user.id, "user stored");
                Ok(user)
            }
        }
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.users.len())
    }
}
