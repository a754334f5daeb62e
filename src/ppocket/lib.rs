//! # PPocket Architecture
//!
//! PPocket is a small client for the Pocket reading-list service: it obtains a
//! user access token through Pocket's authorization handshake and lists the
//! user's saved items through a filtered `/v3/get` query.
//!
//! It is a library that happens to have a CLI client.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses flags and env, formats output, handles stdin      │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs, auth.rs, query.rs)           │
//! │  - Handshake state machine, query serialization, decoding   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Transport Layer (transport/)                               │
//! │  - Abstract Transport trait                                 │
//! │  - HttpTransport (production), CannedTransport (testing)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs on one thread and every call blocks. Nothing is cached or
//! persisted; the caller keeps the access token if it wants to reuse it.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`auth`]: Authorization handshake
//! - [`query`]: Filters for the list call and their wire encoding
//! - [`commands`]: Authorize and list operations
//! - [`transport`]: HTTP abstraction and implementations
//! - [`model`]: Credentials, items and result sets
//! - [`config`]: Endpoints and display settings
//! - [`error`]: Error types

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod transport;
