//! # Recommendation Endpoints

use farmstand_core::validation::validate_top_k;
use farmstand_core::RecommendationSet;

use super::client::{ApiClient, ApiRequest};
use crate::error::ClientResult;

pub const DEFAULT_TOP_K: u32 = 20;

/// Personalized recommendations for the signed-in user.
#[tracing::instrument(skip(client))]
pub async fn recommendations(client: &ApiClient, top_k: u32) -> ClientResult<RecommendationSet> {
    validate_top_k(top_k)?;
    let set: RecommendationSet = client
        .fetch(ApiRequest::get("/ai/recommendations").query("topK", top_k))
        .await?;
    tracing::debug!(count = set.items.len(), method = %set.method, "Recommendations fetched");
    Ok(set)
}
