//! # Direct Chat Endpoints

use serde::Serialize;

use farmstand_core::validation::validate_chat_message;
use farmstand_core::ChatMessage;

use super::client::{path_segment, ApiClient};
use crate::error::ClientResult;

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    content: &'a str,
}

/// Messages exchanged with `other_user_id`, oldest first.
pub async fn conversation(client: &ApiClient, other_user_id: &str) -> ClientResult<Vec<ChatMessage>> {
    let path = format!("/chat/direct/{}", path_segment(other_user_id));
    let mut messages: Vec<ChatMessage> = client.get(&path).await?;
    messages.sort_by_key(|m| m.created_at);
    Ok(messages)
}

#[tracing::instrument(skip(client, content), fields(len = content.len()))]
pub async fn send_message(
    client: &ApiClient,
    other_user_id: &str,
    content: &str,
) -> ClientResult<ChatMessage> {
    validate_chat_message(content)?;
    client
        .post(
            &format!("/chat/direct/{}", path_segment(other_user_id)),
            &SendMessageRequest {
                content: content.trim(),
            },
        )
        .await
}
