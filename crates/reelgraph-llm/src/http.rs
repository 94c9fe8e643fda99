//! Shared HTTP plumbing for provider backends

use crate::LlmError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

/// Build a reqwest client whose requests give up after `timeout`
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// POST a JSON body and decode a JSON reply, retrying transport and server
/// errors with exponential backoff (1s, 2s, 4s, ...)
///
/// `headers` are added to every attempt. `max_attempts` counts the first
/// attempt, so `1` means no retry.
pub(crate) async fn post_json<B, R>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    headers: &[(&'static str, &str)],
    model: &str,
    max_attempts: u32,
) -> Result<R, LlmError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_attempts.max(1) {
        let mut request = client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return response.json::<R>().await.map_err(|e| {
                        LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                    });
                }
                match status {
                    reqwest::StatusCode::NOT_FOUND => {
                        return Err(LlmError::ModelNotAvailable(model.to_string()));
                    }
                    reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                        return Err(LlmError::Authentication(format!("HTTP {}", status)));
                    }
                    reqwest::StatusCode::TOO_MANY_REQUESTS => {
                        last_error = Some(LlmError::RateLimitExceeded);
                    }
                    _ => {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
            }
            Err(e) => {
                last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
            }
        }

        attempts += 1;
        if attempts < max_attempts {
            let delay = Duration::from_secs(2u64.pow(attempts - 1));
            warn!(attempt = attempts, ?delay, url, "Provider call failed, retrying");
            tokio::time::sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
}
