use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ApiError;
use crate::users::password::{hash_password, verify_password};
use crate::users::record::{NewUser, User};
use crate::users::store::CredentialStore;

/// Orchestrates registration and authentication against an injected store.
/// Constructed once at process start and shared through the router state.
pub struct CredentialService {
    store: Arc<dyn CredentialStore>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Register a new user: presence check, uniqueness check, hash, persist.
    ///
    /// The pre-insert lookup gives the common case a clean error; the race
    /// where two registrations for the same email pass the lookup together
    /// is settled by the store's unique constraint on insert.
    pub async fn register(
        &self,
        name: Option<String>,
        email: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        if email.is_empty() || password.is_empty() {
            warn!("registration with missing email or password");
            return Err(ApiError::MissingCredentials);
        }

        if self.store.find_by_email(email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(ApiError::DuplicateEmail);
        }

        let password_hash = hash_password(password)?;
        let user = self
            .store
            .insert(NewUser {
                name,
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Verify credentials and return the stored record.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let user = match self.store.find_by_email(email).await? {
            Some(u) => u,
            None => {
                warn!(email = %email, "login unknown email");
                return Err(ApiError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login invalid password");
            return Err(ApiError::InvalidCredentials);
        }

        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok(user)
    }
}
