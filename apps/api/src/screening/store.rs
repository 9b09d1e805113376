//! In-memory session store.
//!
//! Each session sits behind its own async mutex, held for a whole turn, so
//! turns within a session never overlap. Sessions share nothing mutable;
//! the outer lock only guards the id → session map. Sessions idle for longer
//! than the configured TTL are dropped by a background sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use crate::screening::session::SessionState;

/// Upper bound on the time between two sweeps.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub type SessionHandle = Arc<Mutex<SessionState>>;

struct StoredSession {
    handle: SessionHandle,
    last_active: Instant,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, state: SessionState) -> SessionHandle {
        let id = state.id;
        let handle = Arc::new(Mutex::new(state));
        self.sessions.write().await.insert(
            id,
            StoredSession {
                handle: handle.clone(),
                last_active: Instant::now(),
            },
        );
        handle
    }

    /// Looks a session up and marks it active.
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get_mut(&id)?;
        stored.last_active = Instant::now();
        Some(stored.handle.clone())
    }

    /// Returns true if a session was removed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle for at least `ttl`. A session whose turn is still
    /// running is kept. Returns how many were dropped.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, stored| {
            let idle = now.duration_since(stored.last_active);
            let keep = idle < ttl || stored.handle.try_lock().is_err();
            if !keep {
                debug!(session_id = %id, idle_secs = idle.as_secs(), "Evicting idle session");
            }
            keep
        });
        before - sessions.len()
    }

    /// Spawns the periodic sweep that enforces `ttl`.
    pub fn spawn_sweeper(&self, ttl: Duration) -> JoinHandle<()> {
        let store = self.clone();
        let interval = ttl.min(MAX_SWEEP_INTERVAL);

        tokio::spawn(async move {
            info!("Session sweeper started (ttl: {:?}, interval: {:?})", ttl, interval);

            let mut interval_timer = time::interval(interval);
            interval_timer.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

            loop {
                interval_timer.tick().await;
                let evicted = store.evict_idle(ttl).await;
                if evicted > 0 {
                    info!("Evicted {} idle sessions", evicted);
                }
            }
        })
    }
}
