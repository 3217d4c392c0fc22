//! In-memory session store. One live session per user per engine: starting a
//! new session replaces (and thereby discards) the previous one, including
//! its countdown.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

struct Inner<S> {
    by_session: HashMap<Uuid, Arc<Mutex<S>>>,
    by_user: HashMap<Uuid, Uuid>,
}

pub struct SessionStore<S> {
    inner: Arc<RwLock<Inner<S>>>,
}

impl<S> Clone for SessionStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Send> SessionStore<S> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                by_session: HashMap::new(),
                by_user: HashMap::new(),
            })),
        }
    }

    /// Registers a fresh session for the user, discarding any prior one,
    /// and returns its id together with the shared slot.
    pub async fn start(&self, user_id: Uuid, session: S) -> (Uuid, Arc<Mutex<S>>) {
        let session_id = Uuid::new_v4();
        let slot = Arc::new(Mutex::new(session));

        let mut inner = self.inner.write().await;
        if let Some(old_id) = inner.by_user.insert(user_id, session_id) {
            inner.by_session.remove(&old_id);
        }
        inner.by_session.insert(session_id, Arc::clone(&slot));
        (session_id, slot)
    }

    pub async fn get(&self, session_id: Uuid) -> Option<Arc<Mutex<S>>> {
        self.inner
            .read()
            .await
            .by_session
            .get(&session_id)
            .cloned()
    }
}

impl<S: Send> Default for SessionStore<S> {
    fn default() -> Self {
        Self::new()
    }
}
