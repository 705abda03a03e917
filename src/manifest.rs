//! Layout manifests: serializable snapshots of resolved folders.
//!
//! A manifest records what a folder resolved to at a point in time: every
//! member with its kind, locator and attached schema or table names. Useful
//! for diffing deployed layouts against their definitions and for feeding
//! external tooling that cannot link against the definitions themselves.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ShelfResult;
use crate::folder::{Folder, FolderMember};
use crate::layout::MemberKind;

/// One resolved member in a [`LayoutManifest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub kind: MemberKind,
    pub locator: PathBuf,
    /// Name of the attached schema, for file members that carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Table names, for database members.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<String>,
}

/// Snapshot of a resolved folder layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutManifest {
    pub folder: String,
    pub location: PathBuf,
    pub members: Vec<ManifestEntry>,
    pub generated_at: DateTime<Utc>,
}

impl LayoutManifest {
    pub(crate) fn capture(folder: &Folder) -> Self {
        let members = folder
            .members()
            .map(|member| match member {
                FolderMember::File(file) => ManifestEntry {
                    name: file.name().to_string(),
                    kind: MemberKind::File,
                    locator: file.locator().to_path_buf(),
                    schema: file.schema().map(|s| s.name().to_string()),
                    tables: Vec::new(),
                },
                FolderMember::Database(db) => ManifestEntry {
                    name: db.name().to_string(),
                    kind: MemberKind::Database,
                    locator: db.locator().to_path_buf(),
                    schema: None,
                    tables: db.table_names().iter().map(|n| n.to_string()).collect(),
                },
            })
            .collect();

        Self {
            folder: folder.name().to_string(),
            location: folder.location().to_path_buf(),
            members,
            generated_at: Utc::now(),
        }
    }

    /// Serialize the manifest to a JSON document.
    pub fn to_json(&self) -> ShelfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a manifest from a JSON document produced by
    /// [`LayoutManifest::to_json`].
    pub fn from_json(json: &str) -> ShelfResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
