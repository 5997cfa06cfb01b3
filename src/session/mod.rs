//! Upload sessions.
//!
//! A session owns one decoded replay for as long as the browser keeps
//! working with it. Sessions are read-only after creation; only the registry
//! map itself is mutated.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{DecodedReplay, Player, Replay, SessionId};
use crate::report::{sorted_roster, Selection};

/// One uploaded replay.
#[derive(Debug)]
pub struct ReplaySession {
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub decoded: DecodedReplay,
}

impl ReplaySession {
    pub fn new(file_name: impl Into<String>, decoded: DecodedReplay) -> Self {
        Self {
            file_name: file_name.into(),
            uploaded_at: Utc::now(),
            decoded,
        }
    }

    pub fn replay(&self) -> &Replay {
        &self.decoded.replay
    }

    /// Participants sorted by display name, ignoring case; positions in this list are the
    /// player indices clients send back.
    pub fn roster(&self) -> Vec<&Player> {
        sorted_roster(&self.decoded.replay)
    }

    /// Resolve a client-supplied roster index; negative or out-of-range
    /// indices mean no player is selected.
    pub fn player_at(&self, index: i64) -> Selection<'_> {
        let roster = self.roster();
        usize::try_from(index)
            .ok()
            .and_then(|i| roster.get(i).copied())
            .into()
    }
}

/// Registry mapping session tokens to uploaded replays.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<ReplaySession>>>,
    /// Upper bound on live sessions; 0 means unbounded
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
        }
    }

    /// Store a session and return its token, evicting the oldest session
    /// first when the registry is full.
    pub async fn insert(&self, session: ReplaySession) -> SessionId {
        let id = SessionId::generate();
        let mut sessions = self.sessions.write().await;

        if self.max_sessions > 0 && sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, s)| s.uploaded_at)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
                info!(session = %oldest, "Evicted oldest session (registry full)");
            }
        }

        debug!(session = %id, file = %session.file_name, "Session created");
        sessions.insert(id.clone(), Arc::new(session));
        id
    }

    pub async fn get(&self, id: &SessionId) -> Option<Arc<ReplaySession>> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &SessionId) -> Option<Arc<ReplaySession>> {
        let removed = self.sessions.write().await.remove(id);
        if removed.is_some() {
            debug!(session = %id, "Session removed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
