//! File members and their storage kinds.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// Storage format of a file member. The kind contributes the suffix of the
/// resolved locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Parquet,
    Json,
    NdJson,
}

impl FileKind {
    /// File extension this kind appends to resolved locators.
    pub fn suffix(self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Parquet => "parquet",
            FileKind::Json => "json",
            FileKind::NdJson => "ndjson",
        }
    }
}

/// A data file declared inside a folder.
///
/// The locator is assigned by the owning folder when the folder is built:
/// plain files resolve to `<location>/<name>.<suffix>`, partitioned
/// datasets resolve to the directory `<location>/<name>` with no suffix.
#[derive(Debug, Clone)]
pub struct FileMember {
    name: String,
    kind: FileKind,
    schema: Option<Arc<Schema>>,
    partition_by: Option<Vec<String>>,
    locator: PathBuf,
}

impl FileMember {
    pub(crate) fn new(
        name: &str,
        kind: FileKind,
        schema: Option<Arc<Schema>>,
        partition_by: Option<Vec<String>>,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            schema,
            partition_by,
            locator: PathBuf::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Schema attached at declaration, if any.
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    /// Columns the dataset is partitioned by, outermost first.
    pub fn partition_by(&self) -> Option<&[String]> {
        self.partition_by.as_deref()
    }

    /// Whether the member resolves to a partitioned directory instead of a
    /// single file.
    pub fn is_partitioned(&self) -> bool {
        self.partition_by.is_some()
    }

    /// Resolved path of the file or partition directory.
    pub fn locator(&self) -> &Path {
        &self.locator
    }

    pub(crate) fn resolve(&mut self, location: &Path) {
        self.locator = if self.is_partitioned() {
            location.join(&self.name)
        } else {
            location.join(format!("{}.{}", self.name, self.kind.suffix()))
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_file_gets_kind_suffix() {
        let mut member = FileMember::new("users", FileKind::Csv, None, None);
        member.resolve(Path::new("data/raw"));
        assert_eq!(member.locator(), Path::new("data/raw/users.csv"));
    }

    #[test]
    fn dotted_names_keep_their_dots() {
        let mut member = FileMember::new("events.v2", FileKind::Parquet, None, None);
        member.resolve(Path::new("data"));
        assert_eq!(member.locator(), Path::new("data/events.v2.parquet"));
    }

    #[test]
    fn partitioned_member_resolves_to_directory() {
        let partitions = Some(vec!["year".to_string(), "month".to_string()]);
        let mut member = FileMember::new("events", FileKind::Parquet, None, partitions);
        member.resolve(Path::new("data"));
        assert_eq!(member.locator(), Path::new("data/events"));
        assert!(member.is_partitioned());
    }
}
