//! In-memory session store for conversation history.
//!
//! Sessions live for the lifetime of the process: no eviction, no expiry, no
//! size cap. Each session's history starts with the two seed turns and then
//! grows by exactly one (user, assistant) pair per successful chat request.
//!
//! Appends take a per-session lock so concurrent requests on the same session
//! cannot interleave half-written pairs; different sessions proceed
//! independently.

use crate::prompt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Role of a turn in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant (AI) response
    Assistant,
}

impl Role {
    /// String representation as stored and sent to clients.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single turn in a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

type History = Arc<Mutex<Vec<Turn>>>;

/// Process-wide map from session id to conversation history.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, History>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two turns every new session starts with.
    fn seed_history() -> Vec<Turn> {
        vec![
            Turn::user(prompt::seed_user_turn()),
            Turn::assistant(prompt::GREETING),
        ]
    }

    /// Resolve a session id to its history, creating a new session when the
    /// id is absent, empty, or unknown.
    ///
    /// Returns the effective session id (freshly minted for new sessions) and
    /// a snapshot of the history at resolution time.
    pub async fn resolve(&self, id: Option<&str>) -> (String, Vec<Turn>) {
        if let Some(id) = id.filter(|s| !s.is_empty()) {
            let sessions = self.sessions.read().await;
            if let Some(history) = sessions.get(id) {
                let snapshot = history.lock().await.clone();
                return (id.to_string(), snapshot);
            }
        }

        let id = Uuid::new_v4().to_string();
        let history = Self::seed_history();
        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(history.clone())));

        tracing::debug!(session_id = %id, "Created new session");
        (id, history)
    }

    /// Append a (user, assistant) pair to a session's history.
    ///
    /// Both turns go in under one lock, so the pair is atomic with respect to
    /// other appends on the same session. Unknown ids are ignored; callers
    /// must resolve first.
    pub async fn append(&self, id: &str, user_text: &str, assistant_text: &str) {
        let history = self.sessions.read().await.get(id).cloned();

        match history {
            Some(history) => {
                let mut turns = history.lock().await;
                turns.push(Turn::user(user_text));
                turns.push(Turn::assistant(assistant_text));
            }
            None => {
                tracing::warn!(session_id = %id, "Append to unknown session ignored");
            }
        }
    }

    /// Snapshot of a session's history, if the session exists.
    pub async fn history(&self, id: &str) -> Option<Vec<Turn>> {
        let history = self.sessions.read().await.get(id).cloned()?;
        let turns = history.lock().await.clone();
        Some(turns)
    }

    /// Number of turns in a session, if the session exists.
    pub async fn turn_count(&self, id: &str) -> Option<usize> {
        let history = self.sessions.read().await.get(id).cloned()?;
        let len = history.lock().await.len();
        Some(len)
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
