//! Session-scoped storage for the post-login redirect path.
//!
//! The guard writes `intended_destination` when it turns an anonymous
//! request away; the login flow consumes it exactly once.

use dashmap::DashMap;

/// Storage key under which the guard persists the requested path.
pub const INTENDED_DESTINATION_KEY: &str = "intended_destination";

/// Capability contract for session-scoped storage.
///
/// Only the intended-destination key exists today; the trait keeps the
/// backing store swappable (in-memory now, a shared cache later).
pub trait SessionStore: Send + Sync {
    /// Persist the path the session originally requested.
    fn set_intended_destination(&self, session_id: &str, path: &str);

    /// Consume the stored path, removing it from the session.
    fn take_intended_destination(&self, session_id: &str) -> Option<String>;
}

/// In-memory session store keyed by session id.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    destinations: DashMap<String, String>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn set_intended_destination(&self, session_id: &str, path: &str) {
        self.destinations
            .insert(session_id.to_string(), path.to_string());
    }

    fn take_intended_destination(&self, session_id: &str) -> Option<String> {
        self.destinations.remove(session_id).map(|(_, path)| path)
    }
}
