//! OAuth2 refresh-token exchange used by the ad-platform providers.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{check_status, parse_json, ProviderError};

/// Credentials needed to trade a refresh token for an access token.
pub(crate) struct RefreshGrant<'a> {
    pub token_url: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub refresh_token: &'a str,
    pub scope: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Exchange a refresh token for a short-lived access token. A response without
/// a token yields an empty string; callers decide what that means.
pub(crate) async fn refresh_access_token(
    client: &Client,
    grant: RefreshGrant<'_>,
) -> Result<String, ProviderError> {
    debug!(token_url = grant.token_url, "Refreshing OAuth access token");

    let mut form: Vec<(&str, &str)> = vec![
        ("grant_type", "refresh_token"),
        ("client_id", grant.client_id),
        ("refresh_token", grant.refresh_token),
    ];
    if !grant.client_secret.is_empty() {
        form.push(("client_secret", grant.client_secret));
    }
    if let Some(scope) = grant.scope {
        form.push(("scope", scope));
    }

    let response = client
        .post(grant.token_url)
        .form(&form)
        .send()
        .await
        .map_err(ProviderError::from_transport)?;

    // Token endpoints answer 400 for a revoked or malformed refresh token.
    if response.status() == 400 {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::AuthFailed(format!(
            "token refresh rejected: {}",
            body.chars().take(200).collect::<String>()
        )));
    }

    let token: TokenResponse = parse_json(check_status(response).await?, "token").await?;

    Ok(token.access_token.unwrap_or_default())
}
