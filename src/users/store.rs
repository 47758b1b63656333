use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::users::record::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert violated the unique email constraint.
    #[error("email already exists")]
    DuplicateKey,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistent mapping from email to user record.
///
/// Uniqueness is the store's responsibility: two concurrent inserts for the
/// same email must resolve with exactly one `DuplicateKey` failure.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError>;
}

/// Postgres-backed store. The `users` table carries the UNIQUE constraint
/// and the defaults for `id` and `created_at`.
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(new_user.name)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                StoreError::DuplicateKey
            }
            _ => StoreError::Database(e),
        })?;
        Ok(user)
    }
}

#[cfg(test)]
pub mod memory {
    //! In-memory store for exercising the service without Postgres.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;

    #[derive(Default)]
    pub struct MemoryCredentialStore {
        users: Mutex<HashMap<String, User>>,
    }

    #[async_trait]
    impl CredentialStore for MemoryCredentialStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(email).cloned())
        }

        async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(&new_user.email) {
                return Err(StoreError::DuplicateKey);
            }
            let user = User {
                id: Uuid::new_v4(),
                name: new_user.name,
                email: new_user.email.clone(),
                password_hash: new_user.password_hash,
                created_at: OffsetDateTime::now_utc(),
            };
            users.insert(new_user.email, user.clone());
            Ok(user)
        }
    }

    #[tokio::test]
    async fn second_insert_for_same_email_is_a_duplicate_key() {
        let store = MemoryCredentialStore::default();
        let record = NewUser {
            name: None,
            email: "a@x.com".into(),
            password_hash: "hash".into(),
        };
        store.insert(record.clone()).await.expect("first insert");
        let err = store.insert(record).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey));
    }

    #[tokio::test]
    async fn find_by_email_returns_none_for_unknown_email() {
        let store = MemoryCredentialStore::default();
        let found = store.find_by_email("nobody@x.com").await.expect("lookup");
        assert!(found.is_none());
    }
}
