//! Session storage: open leagues by session id, plus the announcement -> session links.

use crate::models::{LeagueSession, MessageId, SessionId};
use std::collections::HashMap;

/// Where open sessions live.
///
/// Callers serialize access (the league service keeps the store behind a mutex), so
/// implementations need no locking of their own.
pub trait SessionStore: Send {
    fn get(&self, id: SessionId) -> Option<LeagueSession>;

    /// Insert or replace a session. Its announcement, if set, becomes resolvable.
    fn put(&mut self, session: LeagueSession);

    /// Remove a session together with its announcement link.
    fn remove(&mut self, id: SessionId) -> Option<LeagueSession>;

    /// Session behind an announcement, only while that session is still open.
    fn resolve_announcement(&self, message: MessageId) -> Option<SessionId>;

    /// All open sessions, oldest first.
    fn sessions(&self) -> Vec<LeagueSession>;
}

/// In-memory store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: HashMap<SessionId, LeagueSession>,
    announcements: HashMap<MessageId, SessionId>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, id: SessionId) -> Option<LeagueSession> {
        self.sessions.get(&id).cloned()
    }

    fn put(&mut self, session: LeagueSession) {
        if let Some(message) = session.announcement {
            self.announcements.insert(message, session.id);
        }
        self.sessions.insert(session.id, session);
    }

    fn remove(&mut self, id: SessionId) -> Option<LeagueSession> {
        let session = self.sessions.remove(&id)?;
        self.announcements.retain(|_, linked| *linked != id);
        Some(session)
    }

    fn resolve_announcement(&self, message: MessageId) -> Option<SessionId> {
        self.announcements
            .get(&message)
            .copied()
            .filter(|id| self.sessions.contains_key(id))
    }

    fn sessions(&self) -> Vec<LeagueSession> {
        let mut all: Vec<_> = self.sessions.values().cloned().collect();
        all.sort_by_key(|s| (s.created_at, s.id));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeagueType, MatchType, UserRef};

    fn session(id: SessionId, announcement: Option<MessageId>) -> LeagueSession {
        let host = UserRef::new(1, "host");
        let mut s = LeagueSession::new(id, host, MatchType::OneVOne, LeagueType::Dl);
        s.announcement = announcement;
        s
    }

    #[test]
    fn put_links_announcement() {
        let mut store = MemorySessionStore::new();
        store.put(session(10, Some(99)));
        assert_eq!(store.resolve_announcement(99), Some(10));
        assert_eq!(store.resolve_announcement(98), None);
    }

    #[test]
    fn remove_drops_link() {
        let mut store = MemorySessionStore::new();
        store.put(session(10, Some(99)));
        assert!(store.remove(10).is_some());
        assert_eq!(store.resolve_announcement(99), None);
        assert!(store.get(10).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_missing_is_none() {
        let mut store = MemorySessionStore::new();
        assert!(store.remove(10).is_none());
    }
}
