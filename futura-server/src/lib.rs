//! futura-server - HTTP backend for the Futura customer support assistant.
//!
//! Proxies chat messages to the Gemini API, keeps per-session conversation
//! history in memory, and detects `ESC:`-prefixed replies as escalations to
//! a human agent.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod error;
pub mod prompt;
pub mod provider;
pub mod routes;
pub mod session;

pub use error::ChatError;
pub use provider::{ChatRequest, ChatResponse, GeminiProvider, Message, Provider, ProviderError, TokenUsage};
pub use routes::{build_router, AppState};
pub use session::{Role, SessionStore, Turn};
