use crate::models::{DateKey, Draft};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::{debug, error, warn};

pub type DraftMap = BTreeMap<DateKey, Draft>;

/// The single local key-value slot holding serialized drafts.
///
/// Starts file-backed. Any failure to prepare or write the file drops it to
/// memory-only mode and keeps a warning for the user.
#[derive(Debug, Clone)]
pub struct DraftSlot {
    path: Option<PathBuf>,
    warning: Option<String>,
}

impl DraftSlot {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            warning: None,
        }
    }

    pub fn memory(reason: impl Into<String>) -> Self {
        Self {
            path: None,
            warning: Some(reason.into()),
        }
    }

    /// Creates the slot's parent directory, or falls back to memory-only.
    pub async fn open(path: PathBuf) -> Self {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(err) = fs::create_dir_all(parent).await {
                error!("draft storage unavailable at {}: {err}", parent.display());
                return Self::memory(unavailable_warning(&err));
            }
        }
        Self::file(path)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    #[cfg(test)]
    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    pub async fn load(&self) -> DraftMap {
        match &self.path {
            Some(path) => load_drafts(path).await,
            None => DraftMap::new(),
        }
    }

    pub async fn persist(&mut self, drafts: &DraftMap) {
        let Some(path) = self.path.clone() else {
            return;
        };
        match persist_drafts(&path, drafts).await {
            Ok(()) => debug!(count = drafts.len(), "drafts persisted"),
            Err(err) => {
                error!("failed to write drafts to {}: {err}", path.display());
                self.path = None;
                self.warning = Some(unavailable_warning(&err));
            }
        }
    }
}

fn unavailable_warning(err: &std::io::Error) -> String {
    format!("Draft storage is unavailable ({err}); drafts are kept in memory only.")
}

pub async fn load_drafts(path: &Path) -> DraftMap {
    match fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => DraftMap::new(),
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(drafts) => drafts,
            Err(err) => {
                error!("failed to parse drafts file: {err}");
                DraftMap::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => DraftMap::new(),
        Err(err) => {
            warn!("failed to read drafts file: {err}");
            DraftMap::new()
        }
    }
}

pub async fn persist_drafts(path: &Path, drafts: &DraftMap) -> std::io::Result<()> {
    let payload = serde_json::to_vec_pretty(drafts)?;
    fs::write(path, payload).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Color;

    fn draft(part: &str) -> Draft {
        Draft {
            part: part.to_string(),
            note: "<p>warm-up</p>".to_string(),
            color: Color::parse("#8e44ad").unwrap(),
        }
    }

    #[tokio::test]
    async fn drafts_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("drafts.json");

        let mut slot = DraftSlot::open(path.clone()).await;
        assert!(slot.is_persistent());
        let mut drafts = DraftMap::new();
        drafts.insert("2024-06-10".parse().unwrap(), draft("Shoulders"));
        slot.persist(&drafts).await;

        let reloaded = DraftSlot::open(path).await.load().await;
        assert_eq!(reloaded, drafts);
    }

    #[tokio::test]
    async fn missing_empty_or_corrupt_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(load_drafts(&missing).await.is_empty());

        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, "  \n").unwrap();
        assert!(load_drafts(&empty).await.is_empty());

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "{\"2024-06-10\": {\"part\": ").unwrap();
        assert!(load_drafts(&corrupt).await.is_empty());

        let bad_key = dir.path().join("bad_key.json");
        std::fs::write(&bad_key, r#"{"yesterday": {"part": "Legs"}}"#).unwrap();
        assert!(load_drafts(&bad_key).await.is_empty());
    }

    #[tokio::test]
    async fn one_stale_color_keeps_the_other_drafts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.json");
        std::fs::write(
            &path,
            r##"{
  "2024-06-10": {"part": "Legs", "note": "", "color": "red"},
  "2024-06-11": {"part": "Back", "note": "", "color": "#8e44ad"}
}"##,
        )
        .unwrap();

        let drafts = load_drafts(&path).await;
        assert_eq!(drafts.len(), 2);
        let legs = &drafts[&"2024-06-10".parse::<DateKey>().unwrap()];
        assert_eq!(legs.color, Color::default());
        assert_eq!(drafts[&"2024-06-11".parse::<DateKey>().unwrap()].color.as_str(), "#8e44ad");
    }

    #[tokio::test]
    async fn uncreatable_directory_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("a_file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut slot = DraftSlot::open(blocker.join("drafts.json")).await;
        assert!(!slot.is_persistent());
        assert!(slot.warning().unwrap().contains("memory only"));

        let mut drafts = DraftMap::new();
        drafts.insert("2024-06-10".parse().unwrap(), draft("Legs"));
        slot.persist(&drafts).await;
        assert!(slot.load().await.is_empty());
        assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "not a directory");
    }

    #[tokio::test]
    async fn failed_write_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in place of the file makes the write fail.
        let path = dir.path().join("drafts.json");
        std::fs::create_dir_all(&path).unwrap();

        let mut slot = DraftSlot::file(path);
        slot.persist(&DraftMap::new()).await;
        assert!(!slot.is_persistent());
        assert!(slot.warning().unwrap().contains("memory only"));
        assert!(slot.load().await.is_empty());
    }
}
