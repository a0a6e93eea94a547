//! Editing sessions
//!
//! At most one session is open at a time. A session owns the config store
//! the user edits and, when the editor of a notetype is open, the live
//! (uncommitted) notetype that edits are previewed on.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use super::store::ConfigStore;
use crate::contract::{Notetype, NotetypeSettingsError};

#[derive(Debug, Clone, PartialEq)]
pub struct EditingSession {
    pub id: Uuid,
    /// Family the session was opened for, if any
    pub family: Option<String>,
    pub store: ConfigStore,
    /// Uncommitted notetype of an attached editor
    pub live: Option<Notetype>,
    pub opened_at: DateTime<Utc>,
}

/// Owner of the single active editing session
#[derive(Debug, Default)]
pub struct SessionManager {
    active: Mutex<Option<EditingSession>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the open session, if any
    pub fn active_id(&self) -> Option<Uuid> {
        self.active.lock().as_ref().map(|session| session.id)
    }

    pub fn ensure_closed(&self) -> Result<(), NotetypeSettingsError> {
        match self.active_id() {
            Some(id) => Err(NotetypeSettingsError::ConcurrentEditConflict {
                session_id: id.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn open(
        &self,
        family: Option<String>,
        live: Option<Notetype>,
        store: ConfigStore,
    ) -> Result<EditingSession, NotetypeSettingsError> {
        let mut active = self.active.lock();
        if let Some(session) = active.as_ref() {
            return Err(NotetypeSettingsError::ConcurrentEditConflict {
                session_id: session.id.to_string(),
            });
        }

        let session = EditingSession {
            id: Uuid::new_v4(),
            family,
            store,
            live,
            opened_at: Utc::now(),
        };
        *active = Some(session.clone());
        Ok(session)
    }

    pub fn get(&self, id: Uuid) -> Result<EditingSession, NotetypeSettingsError> {
        self.with_session(id, |session| session.clone())
    }

    /// Run `f` on the session while holding the lock
    pub fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut EditingSession) -> R,
    ) -> Result<R, NotetypeSettingsError> {
        let mut active = self.active.lock();
        match active.as_mut() {
            Some(session) if session.id == id => Ok(f(session)),
            _ => Err(NotetypeSettingsError::SessionNotFound {
                session_id: id.to_string(),
            }),
        }
    }

    pub fn close(&self, id: Uuid) -> Result<EditingSession, NotetypeSettingsError> {
        let mut active = self.active.lock();
        match active.take() {
            Some(session) if session.id == id => Ok(session),
            other => {
                *active = other;
                Err(NotetypeSettingsError::SessionNotFound {
                    session_id: id.to_string(),
                })
            }
        }
    }
}
