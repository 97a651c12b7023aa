//! HTTP plumbing shared by the adapters.

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::error::ProviderError;

/// Per-request timeout. A request either completes or fails after this long.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Build the HTTP client used by an adapter.
pub(crate) fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Failed to build configured HTTP client, using defaults");
            reqwest::Client::new()
        })
}

/// Send `request` and decode a successful JSON body into `T`.
///
/// Non-2xx statuses become [`ProviderError::Authentication`] (401/403) or
/// [`ProviderError::Api`]; undecodable bodies become
/// [`ProviderError::MalformedResponse`].
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request.send().await.map_err(|e| {
        error!(provider, error = %e, "HTTP request failed");
        ProviderError::Transport {
            provider,
            source: e,
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        error!(provider, status = %status, body = %body, "API error");
        return Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Authentication {
                provider,
                status,
                body,
            },
            _ => ProviderError::Api {
                provider,
                status,
                body,
            },
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::Transport {
            provider,
            source: e,
        })?;

    serde_json::from_str(&body).map_err(|e| {
        error!(provider, error = %e, "Failed to parse LLM response");
        ProviderError::malformed(provider, e.to_string())
    })
}

/// Join a base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_trailing_slash() {
        assert_eq!(
            join_url("https://api.openai.com/v1/", "chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_join_url_no_trailing_slash() {
        assert_eq!(
            join_url("https://api.deepseek.com", "/chat/completions"),
            "https://api.deepseek.com/chat/completions"
        );
    }
}
