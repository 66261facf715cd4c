//! Conversation sessions and the session store.
//!
//! A [`Session`] owns one message history and at most one pending purchase
//! confirmation. Sessions are explicit objects retrieved by id from the
//! [`SessionStore`] — there is no ambient per-user state. Each session sits
//! behind its own async mutex: holding the lock for the duration of a turn
//! serializes turns of that session while leaving sessions independent.

use crate::messages::Message;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Opaque session identifier.
pub type SessionId = Uuid;

/// A purchase proposal captured while waiting for the user to confirm.
///
/// The action name is kept as the wire-level string the model produced, so a
/// registry miss at execution time is representable and can fail safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    /// Wire-level action name captured from the proposal.
    pub action: String,

    /// Bound positional arguments, in declared order.
    pub args: Vec<String>,
}

/// One conversation: ordered history plus confirmation state.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    history: Vec<Message>,
    pending: Option<PendingConfirmation>,
}

impl Session {
    /// Create a session seeded with the system instruction.
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            history: vec![Message::system(system_instruction)],
            pending: None,
        }
    }

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The full ordered history. The first entry is always the system
    /// instruction.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Append a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.history.push(Message::user(content));
    }

    /// Append an assistant reply.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(Message::assistant(content));
    }

    /// Append a function result for the model to read on the next
    /// invocation.
    pub fn push_tool_result(&mut self, content: impl Into<String>) {
        self.history.push(Message::tool_result(content));
    }

    /// Store a pending confirmation, replacing any existing one. A session
    /// holds at most one.
    pub fn set_pending(&mut self, pending: PendingConfirmation) {
        self.pending = Some(pending);
    }

    /// Take and clear the pending confirmation, whatever the outcome of the
    /// turn that consumes it.
    pub fn take_pending(&mut self) -> Option<PendingConfirmation> {
        self.pending.take()
    }

    /// True while a purchase proposal awaits the user's confirmation.
    pub fn is_awaiting_confirmation(&self) -> bool {
        self.pending.is_some()
    }
}

/// Registry of live sessions, keyed by [`SessionId`].
///
/// Hands out `Arc<tokio::sync::Mutex<Session>>`: the per-session lock is the
/// caller-side serialization of turns.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Arc<tokio::sync::Mutex<Session>>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session seeded with the system instruction and register it.
    pub fn create(
        &self,
        system_instruction: impl Into<String>,
    ) -> (SessionId, Arc<tokio::sync::Mutex<Session>>) {
        let session = Session::new(system_instruction);
        let id = session.id();
        let handle = Arc::new(tokio::sync::Mutex::new(session));
        self.sessions
            .lock()
            .expect("session map poisoned")
            .insert(id, handle.clone());
        (id, handle)
    }

    /// Look up a live session.
    pub fn get(&self, id: SessionId) -> Option<Arc<tokio::sync::Mutex<Session>>> {
        self.sessions
            .lock()
            .expect("session map poisoned")
            .get(&id)
            .cloned()
    }

    /// Drop a session. History is not durable; ending the session destroys
    /// it.
    pub fn remove(&self, id: SessionId) {
        self.sessions
            .lock()
            .expect("session map poisoned")
            .remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageRole;

    #[test]
    fn test_session_seeded_with_system_instruction() {
        let session = Session::new("be helpful");
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].role, MessageRole::System);
        assert_eq!(session.history()[0].content, "be helpful");
    }

    #[test]
    fn test_history_is_append_only_and_ordered() {
        let mut session = Session::new("sys");
        session.push_user("hi");
        session.push_tool_result("data");
        session.push_assistant("hello");

        let roles: Vec<&MessageRole> = session.history().iter().map(|m| &m.role).collect();
        assert_eq!(
            roles,
            vec![
                &MessageRole::System,
                &MessageRole::User,
                &MessageRole::Tool,
                &MessageRole::Assistant,
            ]
        );
    }

    #[test]
    fn test_pending_cleared_exactly_once() {
        let mut session = Session::new("sys");
        assert!(!session.is_awaiting_confirmation());

        session.set_pending(PendingConfirmation {
            action: "buy_ticket".to_string(),
            args: vec!["AMC".to_string(), "Dune".to_string(), "7:30 PM".to_string()],
        });
        assert!(session.is_awaiting_confirmation());

        let pending = session.take_pending().unwrap();
        assert_eq!(pending.action, "buy_ticket");
        assert!(!session.is_awaiting_confirmation());
        assert!(session.take_pending().is_none());
    }

    #[test]
    fn test_store_lookup_and_removal() {
        let store = SessionStore::new();
        let (id, _handle) = store.create("sys");

        assert!(store.get(id).is_some());
        assert!(store.get(Uuid::new_v4()).is_none());

        store.remove(id);
        assert!(store.get(id).is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let (a, handle_a) = store.create("sys");
        let (b, handle_b) = store.create("sys");
        assert_ne!(a, b);

        handle_a.lock().await.push_user("only in a");
        assert_eq!(handle_a.lock().await.history().len(), 2);
        assert_eq!(handle_b.lock().await.history().len(), 1);
    }
}
