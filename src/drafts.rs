use crate::models::{DateKey, Draft};
use crate::storage::{DraftMap, DraftSlot};

/// Unsaved form content per date, backed by the persistence slot.
///
/// Mutations only mark the store dirty; the caller flushes with [`persist`]
/// once per user event.
///
/// [`persist`]: DraftStore::persist
#[derive(Debug)]
pub struct DraftStore {
    drafts: DraftMap,
    slot: DraftSlot,
    dirty: bool,
}

impl DraftStore {
    pub fn new(slot: DraftSlot, drafts: DraftMap) -> Self {
        Self {
            drafts,
            slot,
            dirty: false,
        }
    }

    pub async fn load(slot: DraftSlot) -> Self {
        let drafts = slot.load().await;
        Self::new(slot, drafts)
    }

    pub fn in_memory() -> Self {
        Self::new(DraftSlot::memory("Drafts are kept in memory only."), DraftMap::new())
    }

    pub fn draft(&self, date: DateKey) -> Option<&Draft> {
        self.drafts.get(&date)
    }

    pub fn write_draft(&mut self, date: DateKey, draft: Draft) {
        self.drafts.insert(date, draft);
        self.dirty = true;
    }

    pub fn clear_draft(&mut self, date: DateKey) -> Option<Draft> {
        let removed = self.drafts.remove(&date);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    #[cfg(test)]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn warning(&self) -> Option<&str> {
        self.slot.warning()
    }

    /// Writes the whole map to the slot if anything changed since the last flush.
    pub async fn persist(&mut self) {
        if !self.dirty {
            return;
        }
        self.slot.persist(&self.drafts).await;
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Color;

    fn date(raw: &str) -> DateKey {
        raw.parse().unwrap()
    }

    #[test]
    fn write_overwrites_and_clear_removes() {
        let mut store = DraftStore::in_memory();
        let day = date("2024-06-10");
        store.write_draft(
            day,
            Draft {
                part: "Ch".into(),
                ..Draft::default()
            },
        );
        store.write_draft(
            day,
            Draft {
                part: "Chest".into(),
                note: "<p>5x5</p>".into(),
                color: Color::parse("#2ecc71").unwrap(),
            },
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.draft(day).unwrap().part, "Chest");
        assert!(store.is_dirty());

        assert!(store.clear_draft(day).is_some());
        assert!(store.draft(day).is_none());
        assert!(store.clear_draft(day).is_none());
    }

    #[tokio::test]
    async fn persist_flushes_once_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.json");
        let day = date("2024-06-10");
        let draft = Draft {
            part: "Back".into(),
            note: "<p>rows</p>".into(),
            color: Color::parse("#d35400").unwrap(),
        };

        let mut store = DraftStore::load(DraftSlot::open(path.clone()).await).await;
        assert!(store.is_empty());
        store.write_draft(day, draft.clone());
        store.persist().await;
        assert!(!store.is_dirty());

        let reloaded = DraftStore::load(DraftSlot::open(path).await).await;
        assert_eq!(reloaded.draft(day), Some(&draft));
        assert!(reloaded.warning().is_none());
    }
}
