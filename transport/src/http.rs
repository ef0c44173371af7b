//! HTTP client with the security context applied to every call.

use crate::context::{check_response_shape, SecurityContext, CSRF_HEADER};
use crate::error::TransportError;
use lgst_validation::sanitize_json;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

/// HTTP client wrapper that applies a [`SecurityContext`] to every
/// request/response pair.
///
/// Outgoing: rate-limit admission, CSRF + fixed security headers, input
/// sanitization, and sensitive-field encryption of the JSON body. Incoming:
/// status normalization, response-shape check, CSRF rotation, and
/// sensitive-field decryption. Any violation aborts the call.
pub struct SecureHttp {
    http: reqwest::Client,
    ctx: Mutex<SecurityContext>,
}

impl SecureHttp {
    /// Wrap a new HTTP client around the given security context.
    pub fn new(ctx: SecurityContext) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TransportError::Http(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            ctx: Mutex::new(ctx),
        })
    }

    /// GET a JSON resource.
    pub async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        self.dispatch(reqwest::Method::GET, url, None).await
    }

    /// POST a JSON body and return the JSON response.
    pub async fn post_json(&self, url: &str, body: Value) -> Result<Value, TransportError> {
        self.dispatch(reqwest::Method::POST, url, Some(body)).await
    }

    /// Clear CSRF and rate-limit state (session teardown / test isolation).
    pub fn reset(&self) {
        self.ctx.lock().expect("security context poisoned").reset();
    }

    async fn dispatch(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        let endpoint = endpoint_of(url).to_string();

        // Pre-flight under the lock: admission, CSRF, body transforms.
        // The lock is released before the request is dispatched.
        let (csrf, body) = {
            let mut ctx = self.ctx.lock().expect("security context poisoned");
            ctx.admit(&endpoint)?;
            let csrf = ctx.csrf_token().to_string();
            let body = body.map(|mut b| {
                sanitize_json(&mut b);
                ctx.encrypt_fields(&mut b);
                b
            });
            (csrf, body)
        };

        let mut request = self
            .http
            .request(method, url)
            .header(CSRF_HEADER, csrf.as_str())
            .header("X-Content-Type-Options", "nosniff")
            .header("X-Frame-Options", "DENY")
            .header("X-XSS-Protection", "1; mode=block")
            .header(
                "Strict-Transport-Security",
                "max-age=31536000; includeSubDomains",
            );
        if let Some(b) = &body {
            request = request.json(b);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        // Header lookup is case-insensitive; servers send `x-csrf-token`.
        let rotated_csrf = response
            .headers()
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        if status.as_u16() == 401 {
            tracing::warn!(endpoint = %endpoint, "request rejected: unauthorized");
            return Err(TransportError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            let message = error_message(&body, status);
            let errors = body.get("errors").and_then(|e| e.as_array()).map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            });
            tracing::warn!(endpoint = %endpoint, status = status.as_u16(), %message, "request failed");
            return Err(TransportError::Api {
                status: status.as_u16(),
                message,
                errors,
                body,
            });
        }

        let mut json: Value = response
            .json()
            .await
            .map_err(|e| TransportError::Http(format!("invalid JSON response: {e}")))?;

        check_response_shape(&json)?;

        {
            let mut ctx = self.ctx.lock().expect("security context poisoned");
            if let Some(token) = rotated_csrf {
                ctx.absorb_csrf(token);
            }
            ctx.decrypt_fields(&mut json);
        }

        Ok(json)
    }
}

/// Rate-limit key for a URL: the path component, or the whole string when it
/// does not parse as scheme://host/path.
fn endpoint_of(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => return url,
    };
    match rest.find('/') {
        Some(idx) => &rest[idx..],
        None => "/",
    }
}

/// Best-effort message extraction from an error body.
fn error_message(body: &Value, status: reqwest::StatusCode) -> String {
    for key in ["message", "detail", "title"] {
        if let Some(msg) = body.get(key).and_then(|v| v.as_str()) {
            return msg.to_string();
        }
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_path_component() {
        assert_eq!(
            endpoint_of("https://horizon-testnet.stellar.org/accounts/GABC"),
            "/accounts/GABC"
        );
        assert_eq!(endpoint_of("http://localhost:8000/transactions"), "/transactions");
        assert_eq!(endpoint_of("https://example.org"), "/");
    }

    #[test]
    fn opaque_strings_fall_back_to_themselves() {
        assert_eq!(endpoint_of("/already/a/path"), "/already/a/path");
    }

    #[test]
    fn error_message_prefers_body_fields() {
        let body = serde_json::json!({ "message": "boom" });
        assert_eq!(
            error_message(&body, reqwest::StatusCode::BAD_REQUEST),
            "boom"
        );

        let horizon = serde_json::json!({ "title": "Transaction Failed", "status": 400 });
        assert_eq!(
            error_message(&horizon, reqwest::StatusCode::BAD_REQUEST),
            "Transaction Failed"
        );

        assert_eq!(
            error_message(&Value::Null, reqwest::StatusCode::BAD_GATEWAY),
            "Bad Gateway"
        );
    }
}
