//! MCP server for uroman text romanization.
//!
//! Exposes `romanize`, `romanize_batch` and `detect_script` tools over
//! JSON-RPC 2.0, served over HTTP, stdio, or as a serverless function. The
//! romanization engine itself is external and reached through
//! [`engine::RomanizationEngine`].

pub mod cache;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod platform;
pub mod protocol;
pub mod schema;
pub mod script;
pub mod state;
pub mod validation;
