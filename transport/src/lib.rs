//! Secure transport wrapper for the LGST client.
//!
//! Every request and response to the outside world passes through a
//! [`SecureHttp`] client, which applies the policies of an explicitly
//! constructed [`SecurityContext`]:
//!
//! - per-endpoint sliding-window rate limiting
//! - CSRF token attachment and rotation
//! - encryption of sensitive fields in request/response bodies
//! - structural checks on response bodies
//!
//! A policy violation aborts the call entirely; headers and body transforms
//! are never partially applied.

pub mod context;
pub mod error;
pub mod http;
pub mod rate_limit;

pub use context::{check_response_shape, SecurityContext, CSRF_HEADER, SENSITIVE_FIELDS};
pub use error::TransportError;
pub use http::SecureHttp;
pub use rate_limit::{RateLimiter, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};
