//! Shared owner of the active mapping session.
//!
//! All access goes through one lock, so a rematch (including its baseline
//! update) completes before the next edit is applied.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use crate::error::{MapError, Result};
use crate::session::MappingSession;

#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<Option<MappingSession>>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<MappingSession>>> {
        self.inner.lock().map_err(|_| MapError::LockPoisoned)
    }

    /// Install the first session.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::SessionExists`] when a session is already active.
    pub fn create(&self, session: MappingSession) -> Result<()> {
        let mut guard = self.lock()?;
        if guard.is_some() {
            return Err(MapError::SessionExists);
        }
        info!(rows = session.table().len(), "created mapping session");
        *guard = Some(session);
        Ok(())
    }

    /// Install `session`, returning the one it replaces.
    ///
    /// # Errors
    ///
    /// Fails only when the lock is poisoned.
    pub fn replace(&self, session: MappingSession) -> Result<Option<MappingSession>> {
        let mut guard = self.lock()?;
        info!(
            rows = session.table().len(),
            replaced = guard.is_some(),
            "replaced mapping session"
        );
        Ok(guard.replace(session))
    }

    /// Remove the active session.
    ///
    /// # Errors
    ///
    /// Fails only when the lock is poisoned.
    pub fn teardown(&self) -> Result<Option<MappingSession>> {
        Ok(self.lock()?.take())
    }

    /// # Errors
    ///
    /// Fails only when the lock is poisoned.
    pub fn is_active(&self) -> Result<bool> {
        Ok(self.lock()?.is_some())
    }

    /// Run `f` against the active session.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::NoSession`] when no session is active.
    pub fn with_session<R>(&self, f: impl FnOnce(&MappingSession) -> R) -> Result<R> {
        let guard = self.lock()?;
        guard.as_ref().map(f).ok_or(MapError::NoSession)
    }

    /// Run `f` against the active session with exclusive access.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::NoSession`] when no session is active.
    pub fn with_session_mut<R>(&self, f: impl FnOnce(&mut MappingSession) -> R) -> Result<R> {
        let mut guard = self.lock()?;
        guard.as_mut().map(f).ok_or(MapError::NoSession)
    }

    /// Apply edited labels and rematch the rows they changed.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::NoSession`] when no session is active.
    pub fn apply_edits<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        self.with_session_mut(|session| {
            session.apply_labels(labels);
            session.apply_edits()
        })
    }
}

#[cfg(test)]
mod tests {
    use iss_model::{LabelSet, StudyId};

    use super::*;
    use crate::select::MatchOptions;

    fn session(core_label: &str) -> MappingSession {
        let core = LabelSet::from_pairs("core", [(core_label, "AGE")]);
        let study = LabelSet::from_pairs("s1", [("Age in years", "AGEY")]);
        MappingSession::new(
            &core,
            vec![(StudyId::numbered(0), study)],
            MatchOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn create_refuses_second_session() {
        let handle = SessionHandle::new();
        handle.create(session("Age")).unwrap();
        assert_eq!(
            handle.create(session("Age")).unwrap_err(),
            MapError::SessionExists
        );
    }

    #[test]
    fn replace_and_teardown_transition_state() {
        let handle = SessionHandle::new();
        assert!(handle.replace(session("Age")).unwrap().is_none());
        let previous = handle.replace(session("Weight")).unwrap().unwrap();
        assert_eq!(previous.table().row(0).unwrap().main_label(), "Age");
        assert!(handle.teardown().unwrap().is_some());
        assert!(!handle.is_active().unwrap());
        assert_eq!(
            handle.with_session(|s| s.table().len()).unwrap_err(),
            MapError::NoSession
        );
    }

    #[test]
    fn apply_edits_rematches_under_lock() {
        let handle = SessionHandle::new();
        handle.create(session("Weight")).unwrap();
        let changed = handle.apply_edits(&["Age in years"]).unwrap();
        assert_eq!(changed, vec![0]);
        let matched = handle
            .with_session(|s| s.table().get_match(0, "Study1").map(str::to_string))
            .unwrap();
        assert_eq!(matched.as_deref(), Some("AGEY"));
    }

    #[test]
    fn handle_is_shared_across_threads() {
        let handle = SessionHandle::new();
        handle.create(session("Weight")).unwrap();
        let worker = handle.clone();
        std::thread::spawn(move || worker.apply_edits(&["Age in years"]).unwrap())
            .join()
            .unwrap();
        assert!(
            handle
                .with_session(|s| s.detect_changes().is_empty())
                .unwrap()
        );
    }
}
