use tracing::info;

use farmstand_core::{EventType, User};

use crate::api::auth::{self, PendingLogin, Registration};
use crate::api::profile::{self, ProfileUpdate};
use crate::context::AppContext;
use crate::error::{ClientError, ClientResult};

impl AppContext {
    pub async fn login_password(&self, phone: &str, password: &str) -> ClientResult<PendingLogin> {
        auth::login_password(&self.api, phone, password).await
    }

    /// Completes login: stores the tokens and makes the user current.
    pub async fn verify_two_factor(&self, pending_session_id: &str, code: &str) -> ClientResult<User> {
        let session = auth::verify_two_factor(&self.api, pending_session_id, code).await?;
        let user = self.session.start_session(session).await?;
        self.tracker.track(self.event(EventType::Login).await).await;
        Ok(user)
    }

    pub async fn register(&self, registration: &Registration) -> ClientResult<User> {
        let session = auth::register(&self.api, registration).await?;
        let user = self.session.start_session(session).await?;
        info!(user_id = %user.id, role = %user.role, "Registered");
        Ok(user)
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }

    /// Re-fetches the current user from the server.
    pub async fn refresh_profile(&self) -> ClientResult<User> {
        let user = profile::current_user(&self.api).await?;
        self.session.set_user(user.clone()).await;
        Ok(user)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        if update.is_empty() {
            return Err(ClientError::InvalidState("Nothing to update".into()));
        }
        self.session.require_user().await?;

        let user = profile::update_profile(&self.api, update).await?;
        self.session.set_user(user.clone()).await;
        Ok(user)
    }

    /// Uploads a new avatar and updates the cached user's avatar URL.
    pub async fn upload_avatar(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<String> {
        let mut user = self.session.require_user().await?;
        let uploaded = profile::upload_avatar(&self.api, file_name, content_type, bytes).await?;

        user.avatar_url = Some(uploaded.url.clone());
        self.session.set_user(user).await;
        Ok(uploaded.url)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ClientError;
    use crate::testing::{test_context, user_json};
    use crate::transport::RequestBody;
    use serde_json::json;

    #[tokio::test]
    async fn test_two_step_login_authenticates_later_requests() {
        let (ctx, transport, _) = test_context(false);
        transport
            .respond(200, json!({"pendingSessionId": "pend-1"}))
            .respond(
                200,
                json!({
                    "accessToken": "acc-1",
                    "refreshToken": "ref-1",
                    "user": user_json("u1", "customer")
                }),
            )
            .respond(200, user_json("u1", "customer"));

        let pending = ctx.login_password("0700000001", "hunter2hunter2").await.unwrap();
        let user = ctx.verify_two_factor(&pending.pending_session_id, "123456").await.unwrap();
        assert_eq!(user.id, "u1");
        assert!(ctx.session.is_authenticated().await);

        ctx.refresh_profile().await.unwrap();
        let requests = transport.requests();
        assert_eq!(requests[0].bearer, None);
        assert_eq!(requests[2].bearer.as_deref(), Some("acc-1"));
    }

    #[tokio::test]
    async fn test_login_tracks_event_when_enabled() {
        let (ctx, transport, _) = test_context(true);
        transport
            .respond(
                200,
                json!({"accessToken": "acc-1", "user": user_json("u1", "customer")}),
            )
            .respond(201, json!({}));

        ctx.verify_two_factor("pend-1", "123456").await.unwrap();

        let event = transport.requests()[1].json();
        assert_eq!(event["eventType"], "login");
        assert_eq!(event["userId"], "u1");
    }

    #[tokio::test]
    async fn test_avatar_upload_updates_cached_user() {
        let (ctx, transport, _) = test_context(false);
        ctx.session
            .set_user(serde_json::from_value(user_json("u1", "farmer")).unwrap())
            .await;
        transport.respond(201, json!({"url": "https://cdn.example/a.png"}));

        let url = ctx
            .upload_avatar("a.png", "image/png", vec![0x89, 0x50])
            .await
            .unwrap();

        assert_eq!(url, "https://cdn.example/a.png");
        let cached = ctx.session.current_user().await.unwrap();
        assert_eq!(cached.avatar_url.as_deref(), Some("https://cdn.example/a.png"));
        assert!(matches!(
            transport.requests()[0].body,
            RequestBody::Multipart(_)
        ));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (ctx, _, _) = test_context(false);
        ctx.session
            .set_user(serde_json::from_value(user_json("u1", "customer")).unwrap())
            .await;

        ctx.logout().await;
        assert!(matches!(
            ctx.update_profile(&crate::api::profile::ProfileUpdate {
                name: Some("New".into()),
                ..Default::default()
            })
            .await,
            Err(ClientError::NotAuthenticated)
        ));
    }
}
