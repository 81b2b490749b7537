//! OrionAI gateway: a local-first chat backend for a browser frontend.
//!
//! The gateway sits between the UI and an Ollama-compatible model server. Each chat
//! request is routed through a small pipeline:
//!
//! 1. A rule-based classifier decides whether a local tool should answer
//!    (the server clock, or launching an allow-listed application).
//! 2. The tool's result is folded into the user prompt.
//! 3. An optional roleplay persona and the tail of the stored conversation are
//!    composed into the message list.
//! 4. The model's NDJSON stream is reduced to one reply.
//!
//! Around that core the service keeps conversations, memory bank items and roleplay
//! characters in SQLite, and offers a long-form novel writing helper.
//!
//! # Modules
//!
//! - [`config`]: TOML configuration with environment overrides
//! - [`db`]: SQLite connection, schema, migrations and health checks
//! - [`store`]: CRUD for conversations, memory bank items and characters
//! - [`chat`]: prompt composition, intent routing, inference and orchestration
//! - [`tools`]: datetime and application launcher tools
//! - [`api`]: the axum router

pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod novels;
pub mod roleplay;
pub mod server;
pub mod store;
pub mod tools;
