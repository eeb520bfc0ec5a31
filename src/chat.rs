//! Anonymous chat sessions and canned replies.
//!
//! Sessions are opaque UUIDs held in memory for the life of the process;
//! nothing about a conversation is stored beyond the creation time.
//! Replies come from a [`ReplyProvider`]. The only provider today returns
//! fixed, localized text and never inspects the user's message.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::i18n::Locale;
use crate::types::ChatMessageResponse;

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// An anonymous chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// In-memory session registry.
///
/// Every access goes through one mutex. Entries are never evicted; the
/// map is dropped together with the owning [`ChatService`].
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, ChatSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and records a new session with a fresh UUID.
    pub fn create(&self) -> ChatSession {
        let session = ChatSession {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        };
        self.lock().insert(session.id.clone(), session.clone());
        session
    }

    /// Returns the session with this id, if it exists.
    pub fn get(&self, id: &str) -> Option<ChatSession> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ChatSession>> {
        // plain data: a poisoned map is still consistent
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Reply providers
// ---------------------------------------------------------------------------

/// Produces chat replies. Implementations must be callable concurrently.
pub trait ReplyProvider: Send + Sync {
    /// Reply text for `message`.
    fn reply(&self, message: &str, locale: Locale) -> String;

    /// Safety notice attached to every reply.
    fn safety_notice(&self, locale: Locale) -> String;
}

/// Fixed replies from the `chat.*` locale tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedReplyProvider;

impl ReplyProvider for CannedReplyProvider {
    fn reply(&self, _message: &str, locale: Locale) -> String {
        t!("chat.reply", locale = locale.as_str()).to_string()
    }

    fn safety_notice(&self, locale: Locale) -> String {
        t!("chat.safety_notice", locale = locale.as_str()).to_string()
    }
}

/// Reply backends selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ChatProviderKind {
    /// Canned, localized replies.
    Mock,
}

impl ChatProviderKind {
    pub fn build(self) -> Box<dyn ReplyProvider> {
        match self {
            ChatProviderKind::Mock => Box::new(CannedReplyProvider),
        }
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Creates sessions and answers messages.
pub struct ChatService {
    sessions: SessionStore,
    provider: Box<dyn ReplyProvider>,
}

impl ChatService {
    /// Creates a service owning `sessions` and answering with `provider`.
    pub fn new(sessions: SessionStore, provider: Box<dyn ReplyProvider>) -> Self {
        Self { sessions, provider }
    }

    /// Starts a new anonymous session and returns its id.
    pub fn create_session(&self) -> String {
        let session = self.sessions.create();
        log::debug!("Chat session created at {}", session.created_at);
        session.id
    }

    /// Answers a message.
    ///
    /// An unknown session id is not an error: the reply is still produced,
    /// prefixed with a notice that the chat is anonymous and temporary.
    pub fn reply(&self, session_id: &str, message: &str, locale: Locale) -> ChatMessageResponse {
        let body = self.provider.reply(message, locale);
        let reply = if let Some(session) = self.sessions.get(session_id) {
            log::debug!("Chat message in session opened at {}", session.created_at);
            body
        } else {
            log::debug!("Chat message for unknown session");
            let prefix = t!("chat.anonymous_prefix", locale = locale.as_str());
            format!("{prefix}{body}")
        };

        ChatMessageResponse {
            reply,
            safety_notice: Some(self.provider.safety_notice(locale)),
        }
    }

    /// Number of sessions created so far.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn has_sessions(&self) -> bool {
        !self.sessions.is_empty()
    }
}
