use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{watch, Mutex, OwnedMutexGuard, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::interview::orchestrator::{Interview, InterviewSnapshot};

#[derive(Debug, Error)]
#[error("Session {0} is already processing a command")]
pub struct SessionBusy(pub Uuid);

/// One candidate's interview. Cloning shares the same interview.
#[derive(Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    interview: Arc<Mutex<Interview>>,
    view: watch::Receiver<InterviewSnapshot>,
}

impl Session {
    fn new() -> Self {
        let interview = Interview::new();
        let view = interview.subscribe();
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            interview: Arc::new(Mutex::new(interview)),
            view,
        }
    }

    /// Latest published snapshot. Never waits on a running command.
    pub fn snapshot(&self) -> InterviewSnapshot {
        self.view.borrow().clone()
    }

    /// Exclusive access for one command. A second command is rejected, not queued.
    pub fn lock(&self) -> Result<OwnedMutexGuard<Interview>, SessionBusy> {
        self.interview
            .clone()
            .try_lock_owned()
            .map_err(|_| SessionBusy(self.id))
    }

    fn is_busy(&self) -> bool {
        self.interview.try_lock().is_err()
    }
}

struct Entry {
    session: Session,
    last_seen: Instant,
}

/// In-memory session map. Nothing outlives the process.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    pub async fn create(&self) -> Session {
        let session = Session::new();
        self.sessions.write().await.insert(
            session.id,
            Entry {
                session: session.clone(),
                last_seen: Instant::now(),
            },
        );
        info!("Session {} created", session.id);
        session
    }

    /// Looks up a session and marks it as active.
    pub async fn get(&self, id: Uuid) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!("Session {} discarded", id);
        }
        removed
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle past the timeout. A session mid-command is kept.
    pub async fn purge_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = entry.session.is_busy()
                || now.duration_since(entry.last_seen) < self.idle_timeout;
            if !keep {
                info!("Session {} expired", id);
            }
            keep
        });
        before - sessions.len()
    }

    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let purged = store.purge_idle().await;
                if purged > 0 {
                    debug!("Sweeper purged {} idle sessions", purged);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::orchestrator::Phase;
    use crate::interview::profile::sample_form;

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.create().await;

        let found = store.get(session.id).await.unwrap();
        assert_eq!(found.id, session.id);
        assert_eq!(found.snapshot().phase, Phase::NotStarted);

        assert!(store.remove(session.id).await);
        assert!(!store.remove(session.id).await);
        assert!(store.get(session.id).await.is_none());
    }

    #[tokio::test]
    async fn test_second_command_is_busy() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.create().await;

        let guard = session.lock().unwrap();
        assert!(session.lock().is_err());
        drop(guard);
        assert!(session.lock().is_ok());
    }

    #[tokio::test]
    async fn test_snapshot_reads_without_lock() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.create().await;

        let mut interview = session.lock().unwrap();
        interview.submit_profile(sample_form()).unwrap();
        // Still holding the command lock.
        assert!(session.snapshot().profile.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_idle_sessions() {
        let store = SessionStore::new(Duration::from_secs(60));
        let stale = store.create().await;
        let busy = store.create().await;
        let _guard = busy.lock().unwrap();

        tokio::time::advance(Duration::from_secs(45)).await;
        let fresh = store.create().await;
        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(store.purge_idle().await, 1);
        assert!(store.get(stale.id).await.is_none());
        assert!(store.get(busy.id).await.is_some());
        assert!(store.get(fresh.id).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_keeps_session_alive() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.create().await;

        tokio::time::advance(Duration::from_secs(50)).await;
        store.get(session.id).await.unwrap();
        tokio::time::advance(Duration::from_secs(50)).await;

        assert_eq!(store.purge_idle().await, 0);
        assert_eq!(store.len().await, 1);
    }
}
