use thiserror::Error;

use crate::api::config::StorageKeys;
use crate::api::types::{Frame, Snapshot};
use crate::history::timeline::{Timeline, SEEDED};
use crate::persist::store::{KeyValueStore, StorageError};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode stroke history: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("persisted `{key}` is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

/// How [`HistoryStore::load`] ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A valid persisted timeline was restored.
    Resumed,
    /// Nothing usable was persisted; the timeline was reset.
    Reset,
}

/// The timeline for the selected character plus its write-through mirror in
/// a [`KeyValueStore`].
///
/// The in-memory timeline is authoritative. Persistence failures are kept as
/// a warning (see [`HistoryStore::take_warning`]) and never roll back or
/// block a mutation.
pub struct HistoryStore<S: KeyValueStore> {
    timeline: Timeline,
    store: S,
    history_key: String,
    cursor_key: String,
    warning: Option<HistoryError>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S, keys: &StorageKeys) -> Self {
        Self {
            timeline: Timeline::new(),
            store,
            history_key: keys.history.clone(),
            cursor_key: keys.cursor.clone(),
            warning: None,
        }
    }

    /// Empty the timeline and overwrite the persisted copy.
    pub fn reset(&mut self) {
        self.timeline.reset();
        self.write_through();
    }

    /// Record a completed stroke, discarding any redo tail.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.timeline.commit(snapshot);
        log::debug!(
            "history: commit -> cursor {} of {}",
            self.timeline.cursor(),
            self.timeline.len()
        );
        self.write_through();
    }

    /// Step back one stroke and return what to display, or `None` at the
    /// seeded state.
    pub fn undo(&mut self) -> Option<Frame<'_>> {
        if !self.timeline.can_undo() {
            return None;
        }
        self.timeline.undo();
        self.write_through();
        Some(self.timeline.current())
    }

    /// Step forward one stroke and return the snapshot to display, or `None`
    /// at the newest snapshot.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.timeline.can_redo() {
            return None;
        }
        self.timeline.redo();
        self.write_through();
        self.timeline.current().snapshot()
    }

    pub fn peek_undo(&self) -> Option<Frame<'_>> {
        self.timeline.peek_undo()
    }

    pub fn peek_redo(&self) -> Option<&Snapshot> {
        self.timeline.peek_redo()
    }

    pub fn current(&self) -> Frame<'_> {
        self.timeline.current()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Write the timeline to the store under the history and cursor keys.
    pub fn persist(&mut self) -> Result<(), HistoryError> {
        let encoded = serde_json::to_string(self.timeline.snapshots())?;
        self.store.set(&self.history_key, &encoded)?;
        self.store
            .set(&self.cursor_key, &self.timeline.cursor().to_string())?;
        Ok(())
    }

    /// Replace the in-memory timeline with the persisted one.
    ///
    /// A missing or corrupt entry behaves exactly like [`reset`](Self::reset),
    /// including overwriting the stored keys.
    pub fn load(&mut self) -> LoadOutcome {
        match self.read_persisted() {
            Ok(Some(timeline)) => {
                log::info!(
                    "history: resumed {} snapshot(s) at cursor {}",
                    timeline.len(),
                    timeline.cursor()
                );
                self.timeline = timeline;
                LoadOutcome::Resumed
            }
            Ok(None) => {
                self.reset();
                LoadOutcome::Reset
            }
            Err(err) => {
                log::warn!("history: discarding persisted timeline: {err}");
                self.reset();
                LoadOutcome::Reset
            }
        }
    }

    /// The most recent persistence failure, if any, clearing it.
    pub fn take_warning(&mut self) -> Option<HistoryError> {
        self.warning.take()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn write_through(&mut self) {
        if let Err(err) = self.persist() {
            log::warn!("history: persistence failed, keeping in-memory timeline: {err}");
            self.warning = Some(err);
        }
    }

    fn read_persisted(&self) -> Result<Option<Timeline>, HistoryError> {
        let Some(raw) = self.store.get(&self.history_key)? else {
            return Ok(None);
        };
        let snapshots: Vec<Snapshot> =
            serde_json::from_str(&raw).map_err(|e| HistoryError::Corrupt {
                key: self.history_key.clone(),
                reason: e.to_string(),
            })?;

        let cursor = match self.store.get(&self.cursor_key)? {
            Some(raw) => raw.trim().parse::<i32>().map_err(|e| HistoryError::Corrupt {
                key: self.cursor_key.clone(),
                reason: e.to_string(),
            })?,
            None => SEEDED,
        };

        let len = snapshots.len();
        Timeline::from_parts(snapshots, cursor)
            .map(Some)
            .ok_or_else(|| HistoryError::Corrupt {
                key: self.cursor_key.clone(),
                reason: format!("cursor {cursor} out of range for {len} snapshot(s)"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::store::MemoryStore;
    use crate::testing::snap;

    fn store() -> HistoryStore<MemoryStore> {
        HistoryStore::new(MemoryStore::new(), &StorageKeys::default())
    }

    fn persisted(h: &HistoryStore<MemoryStore>) -> (Option<String>, Option<String>) {
        (
            h.store().get("strokeHistory").unwrap(),
            h.store().get("historyIndex").unwrap(),
        )
    }

    #[test]
    fn commit_writes_through() {
        let mut h = store();
        h.commit(Snapshot::new("data:a"));
        h.commit(Snapshot::new("data:b"));
        assert_eq!(
            persisted(&h),
            (Some(r#"["data:a","data:b"]"#.into()), Some("1".into()))
        );
    }

    #[test]
    fn undo_and_redo_write_cursor() {
        let mut h = store();
        h.commit(snap(0));
        h.commit(snap(1));

        assert_eq!(h.undo(), Some(Frame::Snapshot(&snap(0))));
        assert_eq!(persisted(&h).1.as_deref(), Some("0"));

        assert_eq!(h.undo(), Some(Frame::Seeded));
        assert_eq!(persisted(&h).1.as_deref(), Some("-1"));

        assert_eq!(h.redo(), Some(&snap(0)));
        assert_eq!(persisted(&h).1.as_deref(), Some("0"));
    }

    #[test]
    fn reset_overwrites_previous_history() {
        let mut h = store();
        h.commit(snap(0));
        h.commit(snap(1));
        h.reset();
        assert_eq!(persisted(&h), (Some("[]".into()), Some("-1".into())));
    }

    #[test]
    fn persist_then_reload_reproduces_timeline() {
        let mut h = store();
        for i in 0..4 {
            h.commit(snap(i));
        }
        h.undo();
        let expected = h.timeline().clone();

        let mut reloaded = HistoryStore::new(h.into_store(), &StorageKeys::default());
        assert_eq!(reloaded.load(), LoadOutcome::Resumed);
        assert_eq!(reloaded.timeline(), &expected);
        assert_eq!(reloaded.timeline().cursor(), 2);
    }

    #[test]
    fn load_missing_behaves_as_reset() {
        let mut h = store();
        assert_eq!(h.load(), LoadOutcome::Reset);
        assert_eq!(h.timeline(), &Timeline::new());
        assert_eq!(persisted(&h), (Some("[]".into()), Some("-1".into())));
    }

    #[test]
    fn load_missing_cursor_defaults_to_seeded() {
        let mut kv = MemoryStore::new();
        kv.set("strokeHistory", r#"["data:a"]"#).unwrap();
        let mut h = HistoryStore::new(kv, &StorageKeys::default());
        assert_eq!(h.load(), LoadOutcome::Resumed);
        assert_eq!(h.timeline().cursor(), -1);
        assert_eq!(h.timeline().len(), 1);
    }

    #[test]
    fn load_corrupt_entries_reset() {
        let cases = [
            ("not json", "0"),
            (r#"[1, 2]"#, "0"),
            (r#"["data:a"]"#, "one"),
            (r#"["data:a"]"#, "5"),
            (r#"["data:a"]"#, "-3"),
        ];
        for (history, cursor) in cases {
            let mut kv = MemoryStore::new();
            kv.set("strokeHistory", history).unwrap();
            kv.set("historyIndex", cursor).unwrap();
            let mut h = HistoryStore::new(kv, &StorageKeys::default());
            assert_eq!(h.load(), LoadOutcome::Reset, "case {history} / {cursor}");
            assert!(h.timeline().is_empty());
            assert_eq!(persisted(&h), (Some("[]".into()), Some("-1".into())));
        }
    }

    #[test]
    fn quota_failure_is_a_warning_not_a_rollback() {
        let keys = StorageKeys::default();
        let mut h = HistoryStore::new(MemoryStore::with_quota(64), &keys);
        h.commit(Snapshot::new("data:small"));
        assert!(h.take_warning().is_none());

        h.commit(Snapshot::new(format!("data:{}", "x".repeat(200))));
        let warning = h.take_warning();
        assert!(matches!(
            warning,
            Some(HistoryError::Storage(StorageError::QuotaExceeded { .. }))
        ));
        // In-memory state still moved forward.
        assert_eq!(h.timeline().len(), 2);
        assert_eq!(h.timeline().cursor(), 1);
        // Warning is consumed.
        assert!(h.take_warning().is_none());
    }
}
