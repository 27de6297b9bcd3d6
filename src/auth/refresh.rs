// Token refresh call

use anyhow::{Context, Result};
use reqwest::{Client, Url};

use super::types::{RefreshRequest, RefreshResponse};

/// Exchange a refresh token for a new access token
///
/// Sent with the bare client, outside the request pipeline, so a rejected
/// refresh never re-enters the 401 handling.
pub async fn request_access_token(
    client: &Client,
    url: &Url,
    refresh_token: &str,
) -> Result<RefreshResponse> {
    tracing::info!("Refreshing access token via {}", url.path());

    let request = RefreshRequest {
        refresh: refresh_token.to_string(),
    };

    let response = client
        .post(url.clone())
        .json(&request)
        .send()
        .await
        .context("Failed to send token refresh request")?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(
            "Token refresh failed: status={}, body={}",
            status,
            error_text
        );
        anyhow::bail!("Token refresh failed: {} - {}", status, error_text);
    }

    let data: RefreshResponse = response
        .json()
        .await
        .context("Failed to parse token refresh response")?;

    if data.access.is_empty() {
        anyhow::bail!("Token refresh response does not contain an access token");
    }

    tracing::info!(
        rotated = data.refresh.is_some(),
        "Access token refreshed"
    );

    Ok(data)
}
