//! # Analytics Endpoint

use farmstand_core::TrackedEvent;

use super::client::{ApiClient, ApiRequest};
use crate::error::ClientResult;

pub const EVENTS_PATH: &str = "/analytics/events";

/// Sends one event. The response body is ignored.
pub async fn send_event(client: &ApiClient, event: &TrackedEvent) -> ClientResult<()> {
    client.execute(ApiRequest::post(EVENTS_PATH).json(event)?).await
}
