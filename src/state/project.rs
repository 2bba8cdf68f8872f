//! Project record schema
//!
//! A project persists only session metadata and the interval list, never
//! raw samples; resuming requires re-supplying the original media file.
//! Field names stay camelCase so records match the format the editor UI
//! has always written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editor::registry::PauseInterval;

/// Current schema version, for forward migration.
pub const SCHEMA_VERSION: u32 = 1;

/// A persisted editing project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub data: ProjectData,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// The session snapshot inside a project record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub media_file_name: String,
    pub media_type: String,
    /// Always null once persisted; transient object URLs do not survive.
    pub media_url: Option<String>,
    /// SHA-256 of the source media, checked on resume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_sha256: Option<String>,
    pub pauses: Vec<PauseInterval>,
    pub min_pause_duration: f64,
}

impl ProjectRecord {
    /// Create a new record around a session snapshot.
    pub fn new(data: ProjectData) -> Self {
        let now = Utc::now();
        Self {
            schema_version: SCHEMA_VERSION,
            id: format!("proj_{}", Uuid::new_v4().simple()),
            title: format!("Pauses split for {}", data.media_file_name),
            created_at: now,
            updated_at: now,
            data,
        }
    }

    /// Replace the snapshot, bumping the modification timestamp.
    pub fn update(&mut self, data: ProjectData) {
        self.data = data;
        self.updated_at = Utc::now();
    }
}
