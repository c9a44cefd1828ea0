use chrono::{DateTime, Utc};
use tracing::{info, warn};

use caducados_core::{DomainError, SessionId, StoreId};

use crate::backend::Backend;
use crate::error::ClientError;

/// A logged-in store. Every driver takes one; nothing is kept in ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    store_id: StoreId,
    id: SessionId,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Log in as `store_id`. The backend returns no token, only success or failure.
    pub async fn login(backend: &dyn Backend, store_id: StoreId, password: &str) -> Result<Self, ClientError> {
        if password.is_empty() {
            return Err(DomainError::validation("password is required").into());
        }
        match backend.login(store_id, password).await {
            Ok(()) => {
                let session = Self {
                    store_id,
                    id: SessionId::new(),
                    started_at: Utc::now(),
                };
                info!(%store_id, session_id = %session.id, "logged in");
                Ok(session)
            }
            Err(e) => {
                warn!(%store_id, error = %e, "login failed");
                Err(e)
            }
        }
    }

    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn logout(self) {
        info!(store_id = %self.store_id, session_id = %self.id, "logged out");
    }
}
