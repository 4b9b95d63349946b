use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use super::state::SessionState;
use crate::errors::AppError;

/// In-memory session registry. A session lives until it is removed or the process exits.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, SessionState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> (Uuid, SessionState) {
        let id = Uuid::new_v4();
        let state = SessionState::default();
        self.inner.lock().await.insert(id, state.clone());
        info!("Created session {id}");
        (id, state)
    }

    /// Returns a snapshot of the session.
    pub async fn get(&self, id: Uuid) -> Result<SessionState, AppError> {
        self.inner
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Drops the session and everything it holds.
    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.inner
            .lock()
            .await
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        info!("Removed session {id}");
        Ok(())
    }

    /// Applies a transition. The stored state is replaced only if `transition` succeeds.
    pub async fn update<F>(&self, id: Uuid, transition: F) -> Result<SessionState, AppError>
    where
        F: FnOnce(SessionState) -> Result<SessionState, AppError>,
    {
        let mut sessions = self.inner.lock().await;
        let current = sessions
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;

        let next = transition(current)?;
        sessions.insert(id, next.clone());
        Ok(next)
    }
}
