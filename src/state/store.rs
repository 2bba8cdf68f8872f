//! Project store
//!
//! Keyed local persistence: one JSON file per project record in a single
//! directory. Writes go through a temp file and rename so a crash cannot
//! leave a half-written record behind.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{PausecutError, Result};
use crate::state::project::ProjectRecord;

/// Directory-backed store of project records.
pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    /// Save (insert or overwrite) a record.
    pub fn save(&self, record: &ProjectRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        let path = self.record_path(&record.id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        debug!("saved project {} to {}", record.id, path.display());
        Ok(())
    }

    /// Load a record by id.
    pub fn load(&self, id: &str) -> Result<ProjectRecord> {
        let path = self.record_path(id);
        if !path.exists() {
            return Err(PausecutError::ProjectNotFound { id: id.to_string() });
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// List all records, most recently updated first.
    pub fn list(&self) -> Result<Vec<ProjectRecord>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match fs::read_to_string(&path)
                .map_err(PausecutError::from)
                .and_then(|json| Ok(serde_json::from_str::<ProjectRecord>(&json)?))
            {
                Ok(record) => records.push(record),
                // A foreign or corrupt file should not break the listing.
                Err(e) => debug!("skipping unreadable record {}: {}", path.display(), e),
            }
        }
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }

    /// Delete a record by id.
    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.record_path(id);
        if !path.exists() {
            return Err(PausecutError::ProjectNotFound { id: id.to_string() });
        }
        fs::remove_file(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::project::ProjectData;
    use tempfile::tempdir;

    fn record(name: &str) -> ProjectRecord {
        ProjectRecord::new(ProjectData {
            media_file_name: name.to_string(),
            media_type: "audio/wav".to_string(),
            media_url: None,
            media_sha256: None,
            pauses: vec![],
            min_pause_duration: 0.5,
        })
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        let original = record("a.wav");
        store.save(&original).unwrap();

        let loaded = store.load(&original.id).unwrap();
        assert_eq!(loaded.id, original.id);
        assert_eq!(loaded.data.media_file_name, "a.wav");
    }

    #[test]
    fn test_load_missing_record() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        let err = store.load("proj_missing").unwrap_err();
        assert_eq!(err.error_code(), "PROJECT_NOT_FOUND");
    }

    #[test]
    fn test_list_sorted_by_update_time() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        let older = record("old.wav");
        store.save(&older).unwrap();

        let mut newer = record("new.wav");
        newer.updated_at = older.updated_at + chrono::Duration::seconds(5);
        store.save(&newer).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
    }

    #[test]
    fn test_list_skips_foreign_files() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();
        store.save(&record("a.wav")).unwrap();
        std::fs::write(dir.path().join("notes.json"), "not a record").unwrap();

        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();
        let rec = record("a.wav");
        store.save(&rec).unwrap();

        store.delete(&rec.id).unwrap();
        assert!(store.load(&rec.id).is_err());
        assert!(store.delete(&rec.id).is_err());
    }
}
