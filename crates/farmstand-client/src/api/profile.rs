//! # Profile Endpoints

use serde::{Deserialize, Serialize};

use farmstand_core::validation::validate_display_name;
use farmstand_core::{User, ValidationError};

use super::client::{ApiClient, ApiRequest};
use crate::error::ClientResult;
use crate::transport::FilePart;

/// Largest avatar accepted before upload (5 MiB).
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Fields a user may change. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Farmers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    /// Farmers only: hide or show all listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paused: Option<bool>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.business_name.is_none()
            && self.is_paused.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub url: String,
}

pub async fn current_user(client: &ApiClient) -> ClientResult<User> {
    client.get("/users/me").await
}

#[tracing::instrument(skip(client))]
pub async fn update_profile(client: &ApiClient, update: &ProfileUpdate) -> ClientResult<User> {
    if let Some(name) = &update.name {
        validate_display_name(name)?;
    }
    client.patch("/users/me", update).await
}

/// Uploads an avatar image and returns its public URL.
#[tracing::instrument(skip(client, bytes), fields(size = bytes.len()))]
pub async fn upload_avatar(
    client: &ApiClient,
    file_name: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> ClientResult<UploadedFile> {
    if bytes.is_empty() {
        return Err(ValidationError::Required {
            field: "avatar".to_string(),
        }
        .into());
    }
    if bytes.len() > MAX_AVATAR_BYTES {
        return Err(ValidationError::OutOfRange {
            field: "avatar size".to_string(),
            min: 1,
            max: MAX_AVATAR_BYTES as i64,
        }
        .into());
    }
    if !content_type.starts_with("image/") {
        return Err(ValidationError::InvalidFormat {
            field: "avatar".to_string(),
            reason: "must be an image".to_string(),
        }
        .into());
    }

    let request = ApiRequest::post("/upload/avatar").multipart(FilePart {
        field: "file".to_string(),
        file_name: file_name.to_string(),
        content_type: content_type.to_string(),
        bytes,
    });
    client.fetch(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{api_client, user_json};
    use crate::transport::{Method, RequestBody};
    use serde_json::json;

    #[tokio::test]
    async fn test_update_profile_sends_only_set_fields() {
        let (client, transport, _) = api_client();
        transport.respond(200, user_json("u1", "customer"));

        let update = ProfileUpdate {
            name: Some("Achieng".into()),
            ..Default::default()
        };
        update_profile(&client, &update).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::Patch);
        assert_eq!(sent.json(), json!({"name": "Achieng"}));
    }

    #[tokio::test]
    async fn test_upload_avatar_multipart() {
        let (client, transport, _) = api_client();
        transport.respond(200, json!({"url": "https://cdn.example/a.png"}));

        let uploaded = upload_avatar(&client, "me.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(uploaded.url, "https://cdn.example/a.png");

        match &transport.requests()[0].body {
            RequestBody::Multipart(part) => {
                assert_eq!(part.field, "file");
                assert_eq!(part.bytes, vec![1, 2, 3]);
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_rejects_non_image() {
        let (client, transport, _) = api_client();
        assert!(upload_avatar(&client, "cv.pdf", "application/pdf", vec![1])
            .await
            .is_err());
        assert_eq!(transport.request_count(), 0);
    }
}
