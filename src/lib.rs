//! Telegram → LLM relay bot.
//!
//! - **config**: environment-driven startup configuration.
//! - **logger**: tracing subscriber setup.
//! - **llm**: completion request/response translation ([`llm::Responder`]).
//! - **comms**: the sequential message loop and channel adapters.
//!
//! The binary entry point is `src/main.rs`.

pub mod comms;
pub mod config;
pub mod error;
pub mod llm;
pub mod logger;
