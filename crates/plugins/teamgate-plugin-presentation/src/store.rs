//! One pretty-printed JSON file per presentation
//!
//! Files live at `<dir>/<id>.json` where the id is the creation time in
//! milliseconds since the epoch, bumped when two saves share a millisecond.

use crate::types::{Presentation, PresentationSummary};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use teamgate_core::{Result, TeamgateError};

/// Longest accepted id
const MAX_ID_LEN: usize = 20;

fn not_found() -> TeamgateError {
    TeamgateError::not_found("Presentation not found")
}

/// Ids are decimal millisecond timestamps; anything else names no file
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > MAX_ID_LEN || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_found());
    }
    Ok(())
}

/// RFC 3339 creation time encoded in an id
pub fn created_at(id: &str) -> String {
    id.parse::<i64>()
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|t| t.to_rfc3339())
        .unwrap_or_default()
}

pub struct PresentationStore {
    dir: PathBuf,
    last_id: AtomicI64,
}

impl PresentationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_id: AtomicI64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn next_id(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let prev = self
            .last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(prev + 1)
    }

    /// Write a new file and return its id
    pub async fn save(&self, presentation: &Presentation) -> Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let bytes = serde_json::to_vec_pretty(presentation)?;
        let tmp = self
            .dir
            .join(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, &bytes).await?;

        // linking fails on an existing name, so an id is never reused
        let result: Result<String> = loop {
            let id = self.next_id().to_string();
            match tokio::fs::hard_link(&tmp, self.path(&id)).await {
                Ok(()) => break Ok(id),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => break Err(e.into()),
            }
        };
        let _ = tokio::fs::remove_file(&tmp).await;

        let id = result?;
        tracing::info!(id = %id, title = %presentation.title, "presentation saved");
        Ok(id)
    }

    pub async fn get(&self, id: &str) -> Result<Presentation> {
        validate_id(id)?;
        let bytes = match tokio::fs::read(self.path(id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes).map_err(|e| {
            TeamgateError::storage(format!("Corrupt presentation file {}: {}", id, e))
        })
    }

    /// Every readable presentation, newest first
    pub async fn list(&self) -> Result<Vec<PresentationSummary>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(id) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            if validate_id(id).is_err() {
                continue;
            }
            match self.get(id).await {
                Ok(p) => summaries.push(PresentationSummary {
                    id: id.to_string(),
                    title: p.title,
                    slide_count: p.slides.len(),
                    created_at: created_at(id),
                }),
                Err(e) => tracing::warn!(id = %id, "skipping presentation: {}", e),
            }
        }

        summaries.sort_by_key(|s| std::cmp::Reverse(s.id.parse::<i64>().unwrap_or(0)));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Slide;

    fn deck(title: &str, slides: usize) -> Presentation {
        Presentation {
            title: title.to_string(),
            slides: (0..slides)
                .map(|i| Slide {
                    title: format!("S{}", i),
                    content: vec![],
                    notes: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("1718000000000").is_ok());
        let long = "9".repeat(21);
        for bad in ["", "../secret", "12a", "1.json", long.as_str()] {
            assert!(matches!(validate_id(bad), Err(TeamgateError::NotFound(_))), "{}", bad);
        }
    }

    #[test]
    fn test_created_at_from_id() {
        assert_eq!(created_at("0"), "1970-01-01T00:00:00+00:00");
        assert_eq!(created_at("x"), "");
    }

    #[tokio::test]
    async fn test_save_get_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = PresentationStore::new(dir.path().join("presentations"));
        assert!(store.list().await.unwrap().is_empty());

        let first = store.save(&deck("First", 2)).await.unwrap();
        let second = store.save(&deck("Second", 3)).await.unwrap();
        assert!(second.parse::<i64>().unwrap() > first.parse::<i64>().unwrap());

        assert_eq!(store.get(&first).await.unwrap(), deck("First", 2));
        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "Second");
        assert_eq!(listed[0].slide_count, 3);
        assert_eq!(listed[1].id, first);

        // no temp files left behind
        assert_eq!(std::fs::read_dir(store.dir()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_list_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = PresentationStore::new(dir.path());
        store.save(&deck("Good", 1)).await.unwrap();
        std::fs::write(dir.path().join("123.json"), b"{broken").unwrap();
        std::fs::write(dir.path().join("notes.json"), b"{}").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"hi").unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Good");
        assert!(matches!(store.get("123").await, Err(TeamgateError::Storage(_))));
    }

    #[tokio::test]
    async fn test_missing_presentation() {
        let dir = tempfile::tempdir().unwrap();
        let store = PresentationStore::new(dir.path());
        assert!(matches!(store.get("42").await, Err(TeamgateError::NotFound(_))));
        assert!(matches!(store.get("../x").await, Err(TeamgateError::NotFound(_))));
    }
}
