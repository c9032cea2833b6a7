//! HTTP ingress for the Parlay webhook relay.
//!
//! Owns everything between the TCP socket and the dispatcher: the axum
//! router and middleware stack, the callback handler with its HMAC
//! signature gate, the health endpoint, and the figment-backed runtime
//! configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod crypto;
pub mod handlers;
pub mod server;

pub use config::{Config, ReplyMode};
pub use server::{create_router, start_server, AppState};
