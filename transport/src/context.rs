//! Security policies applied to every request/response pair.

use crate::error::TransportError;
use crate::rate_limit::RateLimiter;
use lgst_crypto::{random_hex, FieldCipher};
use serde_json::Value;
use std::time::Duration;

/// Top-level and nested fields transformed by the field cipher.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "secretKey",
    "walletKey",
    "privateKey",
    "token",
    "secret",
    "apiKey",
];

/// Header carrying the CSRF token in both directions.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Random bytes per generated CSRF token (hex-encoded on the wire).
const CSRF_TOKEN_BYTES: usize = 16;

/// Explicitly constructed security state for one HTTP client.
///
/// Owns the rate-limit history, the session CSRF token, and the field
/// cipher. Construct one at startup and hand it to [`crate::SecureHttp`];
/// call [`SecurityContext::reset`] between tests for isolation.
pub struct SecurityContext {
    limiter: RateLimiter,
    cipher: FieldCipher,
    csrf_token: Option<String>,
}

impl SecurityContext {
    /// Context with the default rate-limit ceiling and window.
    pub fn new(shared_secret: &str) -> Self {
        Self {
            limiter: RateLimiter::default(),
            cipher: FieldCipher::new(shared_secret),
            csrf_token: None,
        }
    }

    /// Context with an explicit rate-limit configuration.
    pub fn with_rate_limit(shared_secret: &str, max_requests: usize, window: Duration) -> Self {
        Self {
            limiter: RateLimiter::new(max_requests, window),
            cipher: FieldCipher::new(shared_secret),
            csrf_token: None,
        }
    }

    /// Admit or reject a request to `endpoint` under the rate limit.
    pub fn admit(&mut self, endpoint: &str) -> Result<(), TransportError> {
        if !self.limiter.check(endpoint) {
            return Err(TransportError::RateLimited {
                endpoint: endpoint.to_string(),
                max: self.limiter.max_requests(),
                window_secs: self.limiter.window().as_secs(),
            });
        }
        Ok(())
    }

    /// The session CSRF token, generated on first use.
    pub fn csrf_token(&mut self) -> &str {
        self.csrf_token
            .get_or_insert_with(|| random_hex(CSRF_TOKEN_BYTES))
    }

    /// Replace the session token with one the server supplied.
    pub fn absorb_csrf(&mut self, token: String) {
        self.csrf_token = Some(token);
    }

    /// Encrypt every sensitive string field in `value`, recursively.
    pub fn encrypt_fields(&self, value: &mut Value) {
        walk_fields(value, &mut |field| self.cipher.encrypt(field));
    }

    /// Decrypt every sensitive string field in `value`, recursively.
    ///
    /// A value that fails to decrypt is left unchanged; the server may send
    /// the field in the clear.
    pub fn decrypt_fields(&self, value: &mut Value) {
        walk_fields(value, &mut |field| {
            self.cipher.decrypt(field).unwrap_or_else(|_| field.to_string())
        });
    }

    /// Clear CSRF and rate-limit state (test isolation / session teardown).
    pub fn reset(&mut self) {
        self.csrf_token = None;
        self.limiter.reset();
    }
}

/// Apply `transform` to every sensitive string field, recursing through
/// objects and arrays.
fn walk_fields(value: &mut Value, transform: &mut dyn FnMut(&str) -> String) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                match v {
                    Value::String(s) if SENSITIVE_FIELDS.contains(&key.as_str()) => {
                        *s = transform(s);
                    }
                    _ => walk_fields(v, transform),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_fields(item, transform);
            }
        }
        _ => {}
    }
}

/// Minimal structural check on a response body: must be a JSON object, and
/// if it declares a `success` field that field must be a boolean.
pub fn check_response_shape(value: &Value) -> Result<(), TransportError> {
    let Some(map) = value.as_object() else {
        return Err(TransportError::InvalidResponseShape(
            "response body is not an object".into(),
        ));
    };
    if let Some(success) = map.get("success") {
        if !success.is_boolean() {
            return Err(TransportError::InvalidResponseShape(
                "`success` field is not a boolean".into(),
            ));
        }
    }
    Ok(())
}
