//! # Session Repository
//!
//! Auth artifacts in the secure namespace: both tokens, the role flag and
//! the cached user record.
//!
//! Tokens enter and leave this module as [`SecretString`] so they never show
//! up in `Debug` output or logs.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::debug;

use farmstand_core::{User, UserRole};

use super::{read_json, write_json};
use crate::error::StoreResult;
use crate::kv::KeyValueStore;

pub const ACCESS_TOKEN_KEY: &str = "auth.access_token";
pub const REFRESH_TOKEN_KEY: &str = "auth.refresh_token";
pub const ROLE_KEY: &str = "auth.role";
pub const USER_KEY: &str = "auth.user";

#[derive(Clone)]
pub struct SessionRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl SessionRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        SessionRepository { kv }
    }

    // -------------------------------------------------------------------------
    // Tokens
    // -------------------------------------------------------------------------

    pub async fn access_token(&self) -> StoreResult<Option<SecretString>> {
        Ok(self.kv.get(ACCESS_TOKEN_KEY).await?.map(SecretString::from))
    }

    pub async fn refresh_token(&self) -> StoreResult<Option<SecretString>> {
        Ok(self.kv.get(REFRESH_TOKEN_KEY).await?.map(SecretString::from))
    }

    /// Stores a new access token and, when the server rotated it, a new
    /// refresh token. Without one the previous refresh token is kept.
    pub async fn save_tokens(
        &self,
        access: &SecretString,
        refresh: Option<&SecretString>,
    ) -> StoreResult<()> {
        self.kv
            .set(ACCESS_TOKEN_KEY, access.expose_secret())
            .await?;
        if let Some(refresh) = refresh {
            self.kv
                .set(REFRESH_TOKEN_KEY, refresh.expose_secret())
                .await?;
        }
        debug!(rotated_refresh = refresh.is_some(), "Tokens saved");
        Ok(())
    }

    pub async fn clear_tokens(&self) -> StoreResult<()> {
        self.kv
            .remove_many(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
            .await
    }

    // -------------------------------------------------------------------------
    // Role & User
    // -------------------------------------------------------------------------

    /// Unknown role strings read as `None`.
    pub async fn role(&self) -> StoreResult<Option<UserRole>> {
        Ok(self
            .kv
            .get(ROLE_KEY)
            .await?
            .and_then(|raw| UserRole::parse(&raw)))
    }

    pub async fn save_role(&self, role: UserRole) -> StoreResult<()> {
        self.kv.set(ROLE_KEY, role.as_str()).await
    }

    pub async fn user(&self) -> StoreResult<Option<User>> {
        read_json(self.kv.as_ref(), USER_KEY).await
    }

    pub async fn save_user(&self, user: &User) -> StoreResult<()> {
        write_json(self.kv.as_ref(), USER_KEY, user).await
    }

    /// Removes every auth artifact in one transaction.
    pub async fn clear_all(&self) -> StoreResult<()> {
        self.kv
            .remove_many(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ROLE_KEY, USER_KEY])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKvStore;

    fn user() -> User {
        User {
            id: "u1".into(),
            role: UserRole::Customer,
            name: "Wanjiru".into(),
            phone: "+254700000001".into(),
            email: None,
            avatar_url: None,
            is_verified: true,
            farmer_profile: None,
        }
    }

    #[tokio::test]
    async fn test_tokens_round_trip_and_rotation() {
        let repo = SessionRepository::new(Arc::new(MemoryKvStore::new()));
        assert!(repo.access_token().await.unwrap().is_none());

        repo.save_tokens(
            &SecretString::from("a1".to_string()),
            Some(&SecretString::from("r1".to_string())),
        )
        .await
        .unwrap();

        // Refresh response without a rotated refresh token
        repo.save_tokens(&SecretString::from("a2".to_string()), None)
            .await
            .unwrap();

        let access = repo.access_token().await.unwrap().unwrap();
        let refresh = repo.refresh_token().await.unwrap().unwrap();
        assert_eq!(access.expose_secret(), "a2");
        assert_eq!(refresh.expose_secret(), "r1");

        repo.clear_tokens().await.unwrap();
        assert!(repo.access_token().await.unwrap().is_none());
        assert!(repo.refresh_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_all() {
        let kv = Arc::new(MemoryKvStore::new());
        let repo = SessionRepository::new(kv.clone());

        repo.save_tokens(
            &SecretString::from("a".to_string()),
            Some(&SecretString::from("r".to_string())),
        )
        .await
        .unwrap();
        repo.save_role(UserRole::Farmer).await.unwrap();
        repo.save_user(&user()).await.unwrap();

        assert_eq!(repo.role().await.unwrap(), Some(UserRole::Farmer));
        assert_eq!(repo.user().await.unwrap(), Some(user()));

        repo.clear_all().await.unwrap();
        assert!(kv.is_empty().await);
    }
}
