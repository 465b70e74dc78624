use crate::models::Applicant;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the social metrics API
#[derive(Debug, Error)]
pub enum SocialReachError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Handle not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Client for the platform's social metrics API
///
/// Follower counts are the one scoring input that drifts on its own, so
/// a batch recompute can optionally refresh them here before scoring.
/// Refresh failures degrade to the stored count; they never block a batch.
pub struct SocialReachClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl SocialReachClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Fetch the current follower count for an Instagram handle
    pub async fn get_follower_count(&self, handle: &str) -> Result<u64, SocialReachError> {
        let url = format!(
            "{}/v1/metrics/followers?handle={}",
            self.endpoint,
            urlencoding::encode(handle)
        );

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        match response.status().as_u16() {
            200 => {}
            401 | 403 => return Err(SocialReachError::Unauthorized),
            404 => return Err(SocialReachError::NotFound(handle.to_string())),
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(SocialReachError::ApiError(format!("{}: {}", status, body)));
            }
        }

        let body: Value = response.json().await?;

        body.get("followerCount")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                SocialReachError::InvalidResponse("missing followerCount field".to_string())
            })
    }

    /// Refresh follower counts in place for a batch of applicants
    ///
    /// Profiles without a handle keep their stored count; per-handle
    /// failures are logged and the stored count stands. Returns the ids
    /// of profiles that were actually refreshed.
    pub async fn refresh_applicants(&self, applicants: &mut [Applicant]) -> Vec<uuid::Uuid> {
        let mut refreshed = Vec::new();

        for applicant in applicants.iter_mut() {
            let Some(profile) = applicant.profile.as_mut() else {
                continue;
            };
            let Some(handle) = profile.instagram_handle.clone() else {
                continue;
            };

            match self.get_follower_count(&handle).await {
                Ok(count) => {
                    profile.follower_count = Some(count);
                    refreshed.push(profile.profile_id);
                }
                Err(e) => {
                    tracing::warn!(
                        "Follower refresh failed for {} (profile {}), keeping stored count: {}",
                        handle,
                        profile.profile_id,
                        e
                    );
                }
            }
        }

        refreshed
    }
}
