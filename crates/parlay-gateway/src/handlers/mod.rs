//! HTTP request handlers for the Parlay gateway.
//!
//! This module contains all HTTP endpoint handlers following a consistent
//! pattern:
//! - Input validation with appropriate error codes
//! - Tracing for observability
//! - Standardized error responses
//!
//! # Handler Organization
//!
//! Handlers are grouped by functionality:
//! - `callback` - Platform webhook callback endpoint
//! - `health` - Liveness probe
//!
//! # Error Handling
//!
//! Pre-dispatch rejections return standardized error responses with:
//! - Appropriate HTTP status codes
//! - Error codes from the taxonomy (E1001-E1004)
//! - Human-readable error messages
//! - Request tracing IDs for debugging
//!
//! Once a request passes signature validation and decoding, the endpoint
//! answers 200 `OK` regardless of handler outcomes tracked by dispatch.

pub mod callback;
pub mod health;

// Re-export handlers for convenient access
pub use callback::handle_callback;
pub use health::health_check;
