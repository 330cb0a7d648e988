//! In-memory session registry. Nothing survives a process restart.
//!
//! Clients rarely delete their sessions, so entries that stay idle longer than
//! the configured TTL are swept by a background task.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use crate::session::Session;

/// Each session sits behind its own mutex, held for the whole of one user
/// action (including the model call).
pub type SessionHandle = Arc<Mutex<Session>>;

struct Entry {
    handle: SessionHandle,
    last_active: Instant,
}

impl Entry {
    fn touch(&mut self) -> SessionHandle {
        self.last_active = Instant::now();
        self.handle.clone()
    }
}

pub struct SessionStore {
    sessions: DashMap<Uuid, Entry>,
    model_id: String,
}

impl SessionStore {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            sessions: DashMap::new(),
            model_id: model_id.into(),
        }
    }

    pub fn create(&self) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle = self.get_or_init(id);
        (id, handle)
    }

    /// Looks up a session and marks it active.
    pub fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.get_mut(&id).map(|mut entry| entry.touch())
    }

    /// Returns the session for `id`, creating it with defaults only if absent.
    /// An existing session is never overwritten.
    pub fn get_or_init(&self, id: Uuid) -> SessionHandle {
        self.sessions
            .entry(id)
            .or_insert_with(|| {
                info!("Session {id} created (model: {})", self.model_id);
                Entry {
                    handle: Arc::new(Mutex::new(Session::new(id, self.model_id.clone()))),
                    last_active: Instant::now(),
                }
            })
            .touch()
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            info!("Session {id} removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Drops sessions untouched for longer than `ttl`. A session whose lock is
    /// held (a model call in flight) is kept. Returns how many were dropped.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let mut evicted = 0;
        self.sessions.retain(|id, entry| {
            let keep = entry.last_active.elapsed() <= ttl || entry.handle.try_lock().is_err();
            if !keep {
                info!("Session {id} evicted after {}s idle", entry.last_active.elapsed().as_secs());
                evicted += 1;
            }
            keep
        });
        evicted
    }

    /// Runs `evict_idle` every `every` until the returned task is aborted.
    pub fn spawn_sweeper(self: &Arc<Self>, ttl: Duration, every: Duration) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = interval(every);
            info!(
                "Session sweeper started (idle ttl: {}s, every {}s)",
                ttl.as_secs(),
                every.as_secs()
            );
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(ttl);
                debug!("Session sweep: {evicted} evicted, {} live", store.len());
            }
        })
    }
}
