//! # Session Store
//!
//! The signed-in user and the persisted auth artifacts behind it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Lifecycle                                    │
//! │                                                                         │
//! │  startup ──► load_user() ──► user from mirror, or none                 │
//! │                                                                         │
//! │  login   ──► start_session(tokens) ──► set_user(user)                  │
//! │              (token write failure is returned)                          │
//! │                                                                         │
//! │  logout  ──► clear user, tokens, role ──► in-memory user = None        │
//! │                                                                         │
//! │  a failed token refresh clears the tokens only; the cached user stays  │
//! │  until logout or the next login                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use farmstand_core::{CoreError, User, UserRole};
use farmstand_store::SessionRepository;

use crate::api::auth::AuthSession;
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct SessionState {
    pub user: Option<User>,
    /// True until the persisted user has been read or a user is set.
    pub is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            user: None,
            is_loading: true,
        }
    }
}

pub struct SessionStore {
    repo: SessionRepository,
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(repo: SessionRepository) -> Self {
        SessionStore {
            repo,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Reads the persisted user. Absent or unreadable leaves no user.
    pub async fn load_user(&self) -> Option<User> {
        let user = match self.repo.user().await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable persisted user");
                None
            }
        };

        let mut state = self.state.write().await;
        state.user = user.clone();
        state.is_loading = false;
        debug!(signed_in = user.is_some(), "Session restored");
        user
    }

    /// Replaces the current user and mirrors it, with its role flag.
    pub async fn set_user(&self, user: User) {
        if let Err(e) = self.repo.save_user(&user).await {
            warn!(error = %e, "Failed to persist user");
        }
        if let Err(e) = self.repo.save_role(user.role).await {
            warn!(error = %e, "Failed to persist role");
        }

        let mut state = self.state.write().await;
        debug!(user_id = %user.id, role = %user.role, "User set");
        state.user = Some(user);
        state.is_loading = false;
    }

    /// Persists fresh tokens and makes the session's user current.
    ///
    /// Unlike the other mirrors, a token write failure is returned: without
    /// stored tokens every following request would go out unauthenticated.
    pub async fn start_session(&self, session: AuthSession) -> ClientResult<User> {
        self.repo
            .save_tokens(&session.access_token, session.refresh_token.as_ref())
            .await?;
        let user = session.user;
        self.set_user(user.clone()).await;
        info!(user_id = %user.id, role = %user.role, "Session started");
        Ok(user)
    }

    pub async fn logout(&self) {
        if let Err(e) = self.repo.clear_all().await {
            warn!(error = %e, "Failed to clear persisted session");
        }
        let mut state = self.state.write().await;
        state.user = None;
        state.is_loading = false;
        info!("Logged out");
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.user.is_some()
    }

    /// The current user, or `NotAuthenticated`.
    pub async fn require_user(&self) -> ClientResult<User> {
        self.current_user()
            .await
            .ok_or(ClientError::NotAuthenticated)
    }

    /// The current user when their role matches.
    pub async fn require_role(&self, role: UserRole) -> ClientResult<User> {
        let user = self.require_user().await?;
        if user.role != role {
            return Err(CoreError::RoleNotPermitted {
                required: role.to_string(),
                actual: user.role.to_string(),
            }
            .into());
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{user_json, FailingKvStore};
    use farmstand_store::{
        KeyValueStore, MemoryKvStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ROLE_KEY, USER_KEY,
    };
    use secrecy::SecretString;
    use std::sync::Arc;

    fn user(role: &str) -> User {
        serde_json::from_value(user_json("u1", role)).unwrap()
    }

    fn auth_session(role: &str) -> AuthSession {
        AuthSession {
            access_token: SecretString::from("access-1"),
            refresh_token: Some(SecretString::from("refresh-1")),
            user: user(role),
        }
    }

    fn store() -> (SessionStore, Arc<MemoryKvStore>) {
        let kv = Arc::new(MemoryKvStore::new());
        (SessionStore::new(SessionRepository::new(kv.clone())), kv)
    }

    #[tokio::test]
    async fn test_start_session_persists_everything() {
        let (store, kv) = store();
        assert!(store.is_loading().await);

        store.start_session(auth_session("customer")).await.unwrap();

        assert!(store.is_authenticated().await);
        assert!(!store.is_loading().await);
        assert_eq!(kv.get(ACCESS_TOKEN_KEY).await.unwrap().as_deref(), Some("access-1"));
        assert_eq!(kv.get(REFRESH_TOKEN_KEY).await.unwrap().as_deref(), Some("refresh-1"));
        assert_eq!(kv.get(ROLE_KEY).await.unwrap().as_deref(), Some("customer"));

        let reloaded = SessionStore::new(SessionRepository::new(kv.clone()));
        assert_eq!(reloaded.load_user().await.map(|u| u.id), Some("u1".to_string()));
    }

    #[tokio::test]
    async fn test_logout_clears_all_artifacts() {
        let (store, kv) = store();
        store.start_session(auth_session("farmer")).await.unwrap();

        store.logout().await;

        assert!(store.current_user().await.is_none());
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ROLE_KEY, USER_KEY] {
            assert!(kv.get(key).await.unwrap().is_none(), "{key} survived logout");
        }
    }

    #[tokio::test]
    async fn test_unreadable_user_loads_as_none() {
        let (store, kv) = store();
        kv.set(USER_KEY, "[]").await.unwrap();

        assert!(store.load_user().await.is_none());
        assert!(!store.is_loading().await);
    }

    #[tokio::test]
    async fn test_token_write_failure_is_surfaced() {
        let store = SessionStore::new(SessionRepository::new(Arc::new(FailingKvStore)));
        let err = store.start_session(auth_session("customer")).await.unwrap_err();
        assert!(matches!(err, ClientError::Storage(_)));
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_require_role() {
        let (store, _) = store();
        assert!(matches!(
            store.require_role(UserRole::Farmer).await,
            Err(ClientError::NotAuthenticated)
        ));

        store.set_user(user("customer")).await;
        assert!(matches!(
            store.require_role(UserRole::Farmer).await,
            Err(ClientError::Domain(CoreError::RoleNotPermitted { .. }))
        ));
        assert!(store.require_role(UserRole::Customer).await.is_ok());
    }
}
