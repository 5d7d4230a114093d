//! Per-client plan sessions

use crate::generation::PlanGenerator;
use crate::pipeline::PlanOrchestrator;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

struct Session {
    orchestrator: Arc<PlanOrchestrator>,
    last_active: DateTime<Utc>,
}

/// Owns one orchestrator per session, all sharing a single generator.
///
/// Sessions not touched for longer than the idle limit are dropped by
/// [`SessionStore::evict_idle`], which [`spawn_sweeper`] runs periodically.
pub struct SessionStore {
    generator: Arc<PlanGenerator>,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new(generator: Arc<PlanGenerator>) -> Self {
        Self {
            generator,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create(&self) -> (Uuid, Arc<PlanOrchestrator>) {
        let id = Uuid::new_v4();
        let orchestrator = Arc::new(PlanOrchestrator::new(self.generator.clone()));
        self.sessions.write().await.insert(
            id,
            Session {
                orchestrator: orchestrator.clone(),
                last_active: Utc::now(),
            },
        );
        debug!(%id, "Created plan session");
        (id, orchestrator)
    }

    /// Look up a session and mark it active.
    pub async fn get(&self, id: &Uuid) -> Option<Arc<PlanOrchestrator>> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id)?;
        session.last_active = Utc::now();
        Some(session.orchestrator.clone())
    }

    /// Drop a session. An in-flight call keeps its orchestrator alive until
    /// it finishes, but the result is no longer reachable.
    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            debug!(%id, "Removed plan session");
        }
        removed
    }

    /// Drop every session idle for at least `max_idle`. Sessions with a
    /// generation call in flight are kept. Returns how many were dropped.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Utc::now();
        let idle: Vec<(Uuid, Arc<PlanOrchestrator>)> = self
            .sessions
            .read()
            .await
            .iter()
            .filter(|(_, session)| now - session.last_active >= max_idle)
            .map(|(id, session)| (*id, session.orchestrator.clone()))
            .collect();

        let mut expired = Vec::new();
        for (id, orchestrator) in idle {
            let in_flight = orchestrator
                .stage()
                .await
                .is_some_and(|stage| stage.is_in_flight());
            if !in_flight {
                expired.push(id);
            }
        }

        let mut sessions = self.sessions.write().await;
        let mut evicted = 0;
        for id in expired {
            // Re-check: the session may have been used since the scan.
            if sessions
                .get(&id)
                .is_some_and(|session| now - session.last_active >= max_idle)
            {
                sessions.remove(&id);
                evicted += 1;
            }
        }
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Evicted idle plan sessions");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Periodically evict sessions idle for at least `max_idle`.
pub fn spawn_sweeper(
    store: Arc<SessionStore>,
    every: std::time::Duration,
    max_idle: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            store.evict_idle(max_idle).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationPurpose;
    use crate::testing::{fixtures, CallGate, MockGenerationClient};

    fn store(mock: MockGenerationClient) -> Arc<SessionStore> {
        let generator = Arc::new(PlanGenerator::new(Arc::new(mock)).unwrap());
        Arc::new(SessionStore::new(generator))
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = store(MockGenerationClient::builder().build());

        let (first, _) = store.create().await;
        let (second, _) = store.create().await;
        assert_ne!(first, second);
        assert_eq!(store.len().await, 2);

        assert!(store.remove(&first).await);
        assert!(!store.remove(&first).await);
        assert!(store.get(&first).await.is_none());
        assert!(store.get(&second).await.is_some());
    }

    #[tokio::test]
    async fn test_evict_idle_drops_only_idle_sessions() {
        let store = store(MockGenerationClient::builder().build());
        let (id, _) = store.create().await;

        assert_eq!(store.evict_idle(Duration::hours(1)).await, 0);
        assert!(store.get(&id).await.is_some());

        assert_eq!(store.evict_idle(Duration::zero()).await, 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_evict_idle_keeps_in_flight_sessions() {
        let gate = Arc::new(CallGate::default());
        let store = store(
            MockGenerationClient::builder()
                .with_success(GenerationPurpose::InitialPlan, &fixtures::plan_text("₹5,00,000"))
                .with_gate(GenerationPurpose::InitialPlan, gate.clone())
                .build(),
        );
        let (id, orchestrator) = store.create().await;
        let pending = tokio::spawn(async move { orchestrator.start("town").await });
        gate.wait_entered().await;

        assert_eq!(store.evict_idle(Duration::zero()).await, 0);
        assert!(store.get(&id).await.is_some());

        gate.release();
        pending.await.unwrap().unwrap();
        assert_eq!(store.evict_idle(Duration::zero()).await, 1);
    }

    #[tokio::test]
    async fn test_sweeper_evicts_in_background() {
        let store = store(MockGenerationClient::builder().build());
        store.create().await;
        store.create().await;

        let sweeper = spawn_sweeper(
            store.clone(),
            std::time::Duration::from_millis(10),
            Duration::zero(),
        );
        for _ in 0..100 {
            if store.is_empty().await {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        sweeper.abort();
        assert!(store.is_empty().await);
    }
}
