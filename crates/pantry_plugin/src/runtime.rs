//! Session-scoped access to the catalog.

use crate::catalog::Catalog;
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

/// The runtime was queried outside its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The session this handle belongs to has ended.
    #[error("runtime for session {session} is no longer available")]
    Unavailable {
        /// Session the handle was issued for.
        session: u64,
    },
}

/// Shared slot holding one session's catalog.
pub(crate) type CatalogSlot = Arc<RwLock<Option<Arc<Catalog>>>>;

/// Handle to the catalog of one session.
///
/// Handles are cheap to clone. Once the session ends every handle issued for
/// it returns [`RuntimeError::Unavailable`], even after a new session starts.
#[derive(Debug, Clone)]
pub struct Runtime {
    session: u64,
    slot: CatalogSlot,
}

impl Runtime {
    pub(crate) fn new(session: u64, slot: CatalogSlot) -> Self {
        Self { session, slot }
    }

    /// Returns the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Unavailable`] after the session has ended.
    pub fn catalog(&self) -> Result<Arc<Catalog>, RuntimeError> {
        self.slot
            .read()
            .clone()
            .ok_or(RuntimeError::Unavailable {
                session: self.session,
            })
    }

    /// Returns true while the session is running.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Returns the session number, starting at 1.
    #[must_use]
    pub fn session(&self) -> u64 {
        self.session
    }
}
