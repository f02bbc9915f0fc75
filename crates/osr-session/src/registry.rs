#![forbid(unsafe_code)]

//! Sessions by id.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use ahash::AHashMap;
use tracing::debug;

use osr_core::config::BridgeConfig;

use crate::session::{Session, SessionId, SessionState};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown session {0}")]
    UnknownSession(SessionId),
}

/// Owns every live [`Session`]. Ids are never reused.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_id: AtomicU64,
    sessions: RwLock<AHashMap<SessionId, Arc<Session>>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session in the `Creating` state.
    pub fn create(&self, config: BridgeConfig) -> Arc<Session> {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let session = Arc::new(Session::new(id, config));
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::clone(&session));
        debug!(target: "osr::session", session = %id, "registered");
        session
    }

    pub fn get(&self, id: SessionId) -> Result<Arc<Session>, RegistryError> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(RegistryError::UnknownSession(id))
    }

    pub fn remove(&self, id: SessionId) -> Result<Arc<Session>, RegistryError> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .ok_or(RegistryError::UnknownSession(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids in creation order.
    #[must_use]
    pub fn ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Drop sessions whose browser has closed. Returns how many went.
    pub fn reap_closed(&self) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, session| session.state() != SessionState::Closed);
        let reaped = before - sessions.len();
        if reaped > 0 {
            debug!(target: "osr::session", reaped, "reaped closed sessions");
        }
        reaped
    }
}
