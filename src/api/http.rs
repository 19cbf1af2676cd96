//! HTTP utilities for JSON:API calls

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Sanitize response body for logging
/// Truncates long responses and drops non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Failure of a single HTTP exchange
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response; the body is kept so it can be shown verbatim
    #[error("API request failed: {status}")]
    Status { status: StatusCode, body: String },
    #[error("failed to send request: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Successful response: status plus the raw body bytes
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// HTTP client wrapper for JSON:API calls
#[derive(Clone)]
pub struct ApiHttpClient {
    client: Client,
}

impl ApiHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(format!("xbe/{}", crate::VERSION))
            .build()?;

        Ok(Self { client })
    }

    /// Send one request. No retries.
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ApiError> {
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, JSON_API_MEDIA_TYPE);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, JSON_API_MEDIA_TYPE)
                .body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ApiError::Status { status, body });
        }

        tracing::debug!("{} ({} bytes)", status, bytes.len());
        Ok(ApiResponse {
            status,
            body: bytes.to_vec(),
        })
    }
}

/// Format an API error for display
pub fn format_api_error(error: &anyhow::Error) -> String {
    if let Some(ApiError::Status { status, .. }) = error.downcast_ref::<ApiError>() {
        return match status.as_u16() {
            401 => "Authentication failed. Run 'xbe auth login' or pass --token.".to_string(),
            403 => "Permission denied.".to_string(),
            404 => "Resource not found.".to_string(),
            409 => "Resource conflict. The resource may already exist or be in use.".to_string(),
            422 => "The server rejected the request. Check your parameters.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            code if code >= 500 => "Service temporarily unavailable. Please try again.".to_string(),
            _ => format!("API request failed: {}", status),
        };
    }

    if let Some(ApiError::Transport(_)) = error.downcast_ref::<ApiError>() {
        return "Request failed. Check your network connection and try again.".to_string();
    }

    format!("{:#}", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.contains("500 bytes total"));
    }

    #[test]
    fn test_sanitize_drops_control_characters() {
        assert_eq!(sanitize_for_log("a\nb\tc d"), "abc d");
    }

    #[test]
    fn test_sanitize_handles_multibyte_boundaries() {
        let body = "é".repeat(300);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("600 bytes total"));
    }

    #[test]
    fn test_format_status_errors() {
        let err = anyhow::Error::new(ApiError::Status {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        });
        assert_eq!(format_api_error(&err), "Resource not found.");

        let err = anyhow::Error::new(ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        })
        .context("GET /v1/objectives");
        assert_eq!(
            format_api_error(&err),
            "Service temporarily unavailable. Please try again."
        );
    }

    #[test]
    fn test_format_other_errors_keeps_chain() {
        let err = anyhow::anyhow!("inner").context("outer");
        assert_eq!(format_api_error(&err), "outer: inner");
    }

    #[test]
    fn test_empty_response_detection() {
        let response = ApiResponse {
            status: StatusCode::NO_CONTENT,
            body: b" \n".to_vec(),
        };
        assert!(response.is_empty());
    }
}
