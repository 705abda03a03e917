//! Folders: directory containers that resolve member paths.
//!
//! A [`Folder`] owns an ordered registry of members (data files and
//! embedded databases) and a resolved `location` directory. Building a
//! folder runs two steps in order: compose the registry (ancestors
//! most-base first, declarations on top), then resolve a locator for every
//! member beneath the folder's location. Members inherited from an
//! ancestor are re-resolved under the derived folder's location, which is
//! how one declaration set can describe several parallel directory trees.
//!
//! Path resolution is pure; nothing here touches the filesystem. The
//! backing store directory only appears when a nested database enters a
//! connection scope.

mod file;

pub use file::{FileKind, FileMember};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ShelfConfig;
use crate::database::Database;
use crate::error::{ShelfError, ShelfResult};
use crate::layout::{compose, segment_of, validate_name, Member, MemberKind, Registry};
use crate::manifest::LayoutManifest;
use crate::schema::Schema;
use crate::tree;

/// A member a folder can hold: a data file or an embedded database.
#[derive(Debug, Clone)]
pub enum FolderMember {
    File(FileMember),
    Database(Database),
}

impl FolderMember {
    /// Resolved path of the member beneath its folder.
    pub fn locator(&self) -> &Path {
        match self {
            FolderMember::File(file) => file.locator(),
            FolderMember::Database(db) => db.locator(),
        }
    }

    pub fn as_file(&self) -> Option<&FileMember> {
        match self {
            FolderMember::File(file) => Some(file),
            FolderMember::Database(_) => None,
        }
    }

    pub fn as_database(&self) -> Option<&Database> {
        match self {
            FolderMember::File(_) => None,
            FolderMember::Database(db) => Some(db),
        }
    }

    fn resolve(&mut self, location: &Path) {
        match self {
            FolderMember::File(file) => file.resolve(location),
            FolderMember::Database(db) => db.relocate(location),
        }
    }
}

impl Member for FolderMember {
    fn kind(&self) -> MemberKind {
        match self {
            FolderMember::File(_) => MemberKind::File,
            FolderMember::Database(_) => MemberKind::Database,
        }
    }

    fn name(&self) -> &str {
        match self {
            FolderMember::File(file) => file.name(),
            FolderMember::Database(db) => db.name(),
        }
    }
}

/// A directory container with a resolved location and frozen member set.
#[derive(Debug, Clone)]
pub struct Folder {
    name: String,
    location: PathBuf,
    registry: Registry<FolderMember>,
}

impl Folder {
    /// Start defining a folder with the given name.
    pub fn builder(name: &str) -> FolderBuilder {
        FolderBuilder {
            name: name.to_string(),
            base: None,
            segment: None,
            parent_location: None,
            ancestors: Vec::new(),
            declared: Vec::new(),
            deferred: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory every member of this folder resolves beneath.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = &FolderMember> {
        self.registry.iter()
    }

    /// Member names in declaration order.
    pub fn member_names(&self) -> Vec<&str> {
        self.registry.names().collect()
    }

    /// Look up any member by name.
    pub fn member(&self, name: &str) -> Option<&FolderMember> {
        self.registry.get(name)
    }

    /// Look up a file member by name.
    ///
    /// Fails with `UnknownMember` when nothing is registered under the
    /// name and with `StructuralMismatch` when the member is a database.
    pub fn file(&self, name: &str) -> ShelfResult<&FileMember> {
        match self.registry.get(name) {
            None => Err(ShelfError::unknown_member(&self.name, name)),
            Some(member) => member.as_file().ok_or_else(|| {
                ShelfError::structural_mismatch(name, MemberKind::File, member.kind())
            }),
        }
    }

    /// Look up an embedded database member by name.
    pub fn database(&self, name: &str) -> ShelfResult<&Database> {
        match self.registry.get(name) {
            None => Err(ShelfError::unknown_member(&self.name, name)),
            Some(member) => member.as_database().ok_or_else(|| {
                ShelfError::structural_mismatch(name, MemberKind::Database, member.kind())
            }),
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Delete everything beneath this folder's location and recreate the
    /// empty directory. Destructive; the layout definition is untouched.
    pub fn clean(&self) -> ShelfResult<()> {
        if self.location.exists() {
            fs::remove_dir_all(&self.location)?;
        }
        fs::create_dir_all(&self.location)?;
        log::info!(
            "folder '{}': cleaned '{}'",
            self.name,
            self.location.display()
        );
        Ok(())
    }

    /// Box-drawing rendering of this folder's resolved layout.
    pub fn show_tree(&self) -> String {
        tree::render(&[self])
    }

    /// Snapshot of the resolved layout for serialization.
    pub fn manifest(&self) -> LayoutManifest {
        LayoutManifest::capture(self)
    }
}

/// Builder for [`Folder`].
///
/// ```
/// use datashelf::{FileKind, Folder};
///
/// let raw = Folder::builder("Raw")
///     .at("data")
///     .file("users", FileKind::Csv)
///     .build()
///     .unwrap();
///
/// let staged = Folder::builder("Staged")
///     .extends(&raw)
///     .file("users", FileKind::Parquet)
///     .build()
///     .unwrap();
///
/// assert_eq!(raw.file("users").unwrap().locator().to_str(), Some("data/raw/users.csv"));
/// assert_eq!(
///     staged.file("users").unwrap().locator().to_str(),
///     Some("data/raw/staged/users.parquet"),
/// );
/// ```
pub struct FolderBuilder {
    name: String,
    base: Option<PathBuf>,
    segment: Option<String>,
    parent_location: Option<PathBuf>,
    ancestors: Vec<Registry<FolderMember>>,
    declared: Vec<FolderMember>,
    deferred: Option<ShelfError>,
}

impl FolderBuilder {
    /// Explicitly set the base path this folder's segment is joined onto,
    /// overriding any location inherited through `extends`.
    pub fn at(self, prefix: impl Into<PathBuf>) -> Self {
        let prefix = prefix.into();
        self.set_base(prefix)
    }

    /// Seed the base path from project configuration.
    pub fn rooted(self, config: &ShelfConfig) -> Self {
        let root = config.root.clone();
        self.set_base(root)
    }

    fn set_base(mut self, prefix: PathBuf) -> Self {
        if self.deferred.is_none() {
            match &self.base {
                Some(existing) if existing != &prefix => {
                    self.deferred = Some(ShelfError::PathOverrideConflict {
                        name: self.name.clone(),
                        first: existing.clone(),
                        second: prefix,
                    });
                }
                _ => self.base = Some(prefix),
            }
        }
        self
    }

    /// Explicitly set the path segment this folder contributes, instead of
    /// its lowercased name.
    pub fn segment(mut self, segment: &str) -> Self {
        if self.deferred.is_none() {
            if let Err(err) = validate_name(segment) {
                self.deferred = Some(err);
                return self;
            }
            match &self.segment {
                Some(existing) if existing != segment => {
                    self.deferred = Some(ShelfError::PathOverrideConflict {
                        name: self.name.clone(),
                        first: PathBuf::from(existing),
                        second: PathBuf::from(segment),
                    });
                }
                _ => self.segment = Some(segment.to_string()),
            }
        }
        self
    }

    /// Inherit every member of `parent` and, unless overridden by `at`,
    /// resolve this folder beneath the parent's location. Call once per
    /// ancestor, most-base first; the last call supplies the inherited
    /// location.
    pub fn extends(mut self, parent: &Folder) -> Self {
        self.ancestors.push(parent.registry.clone());
        self.parent_location = Some(parent.location.clone());
        self
    }

    /// Declare a plain data file.
    pub fn file(self, name: &str, kind: FileKind) -> Self {
        self.push_file(name, kind, None, None)
    }

    /// Declare a data file with an attached schema.
    pub fn file_with_schema(self, name: &str, kind: FileKind, schema: Arc<Schema>) -> Self {
        self.push_file(name, kind, Some(schema), None)
    }

    /// Declare a partitioned dataset. Its locator is a directory; parts
    /// are written beneath it keyed by the partition columns.
    pub fn partitioned(self, name: &str, kind: FileKind, partition_by: &[&str]) -> Self {
        let columns = partition_by.iter().map(|c| c.to_string()).collect();
        self.push_file(name, kind, None, Some(columns))
    }

    fn push_file(
        mut self,
        name: &str,
        kind: FileKind,
        schema: Option<Arc<Schema>>,
        partition_by: Option<Vec<String>>,
    ) -> Self {
        if self.deferred.is_none() {
            if let Err(err) = validate_name(name) {
                self.deferred = Some(err);
                return self;
            }
            self.declared
                .push(FolderMember::File(FileMember::new(name, kind, schema, partition_by)));
        }
        self
    }

    /// Place an embedded database as a member of this folder. The database
    /// is re-located to `<location>/<name>.db` when the folder is built.
    pub fn database(mut self, db: Database) -> Self {
        if self.deferred.is_none() {
            self.declared.push(FolderMember::Database(db));
        }
        self
    }

    /// Compose ancestors and declarations, then resolve every member
    /// beneath the folder's location.
    pub fn build(self) -> ShelfResult<Folder> {
        if let Some(err) = self.deferred {
            return Err(err);
        }
        validate_name(&self.name)?;

        let ancestors: Vec<&Registry<FolderMember>> = self.ancestors.iter().collect();
        let mut registry = compose(&ancestors, self.declared)?;

        let base = self
            .base
            .or(self.parent_location)
            .unwrap_or_default();
        let segment = self
            .segment
            .unwrap_or_else(|| segment_of(&self.name));
        let location = base.join(segment);

        for member in registry.iter_mut() {
            member.resolve(&location);
        }
        log::debug!(
            "folder '{}' resolved at '{}' with {} members",
            self.name,
            location.display(),
            registry.len()
        );

        Ok(Folder {
            name: self.name,
            location,
            registry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;

    #[test]
    fn location_joins_base_and_lowercased_name() {
        let folder = Folder::builder("RawData")
            .at("data")
            .build()
            .unwrap();
        assert_eq!(folder.location(), Path::new("data/rawdata"));
    }

    #[test]
    fn segment_override_replaces_name_segment() {
        let folder = Folder::builder("RawData")
            .at("data")
            .segment("raw")
            .build()
            .unwrap();
        assert_eq!(folder.location(), Path::new("data/raw"));
    }

    #[test]
    fn inherited_members_are_rehomed_under_derived_location() {
        let base = Folder::builder("base")
            .at("data")
            .file("users", FileKind::Csv)
            .build()
            .unwrap();

        let derived = Folder::builder("derived")
            .extends(&base)
            .build()
            .unwrap();

        assert_eq!(
            derived.file("users").unwrap().locator(),
            Path::new("data/base/derived/users.csv")
        );
        // the ancestor still points at its own copy
        assert_eq!(
            base.file("users").unwrap().locator(),
            Path::new("data/base/users.csv")
        );
    }

    #[test]
    fn explicit_base_beats_inherited_location() {
        let base = Folder::builder("base")
            .at("data")
            .file("users", FileKind::Csv)
            .build()
            .unwrap();

        let moved = Folder::builder("archive")
            .extends(&base)
            .at("cold")
            .build()
            .unwrap();

        assert_eq!(moved.location(), Path::new("cold/archive"));
        assert_eq!(
            moved.file("users").unwrap().locator(),
            Path::new("cold/archive/users.csv")
        );
    }

    #[test]
    fn conflicting_explicit_bases_fail_build() {
        let err = Folder::builder("raw")
            .at("data")
            .at("other")
            .build()
            .unwrap_err();

        assert!(matches!(err, ShelfError::PathOverrideConflict { name, .. } if name == "raw"));
    }

    #[test]
    fn repeated_identical_base_is_not_a_conflict() {
        let folder = Folder::builder("raw")
            .at("data")
            .at("data")
            .build()
            .unwrap();
        assert_eq!(folder.location(), Path::new("data/raw"));
    }

    #[test]
    fn placed_database_resolves_under_folder() {
        let warehouse = Database::builder("warehouse")
            .bare_table("users")
            .build()
            .unwrap();

        let folder = Folder::builder("project")
            .at("data")
            .database(warehouse)
            .build()
            .unwrap();

        assert_eq!(
            folder.database("warehouse").unwrap().locator(),
            Path::new("data/project/warehouse.db")
        );
    }

    #[test]
    fn file_lookup_on_database_member_reports_kind_mismatch() {
        let warehouse = Database::builder("warehouse").build().unwrap();
        let folder = Folder::builder("project")
            .database(warehouse)
            .build()
            .unwrap();

        let err = folder.file("warehouse").unwrap_err();
        assert!(matches!(
            err,
            ShelfError::StructuralMismatch { expected, found, .. }
                if expected == MemberKind::File && found == MemberKind::Database
        ));
    }

    #[test]
    fn cross_kind_override_fails_at_build() {
        let base = Folder::builder("base")
            .file("users", FileKind::Csv)
            .build()
            .unwrap();

        let err = Folder::builder("derived")
            .extends(&base)
            .database(Database::builder("users").build().unwrap())
            .build()
            .unwrap_err();

        assert!(matches!(err, ShelfError::StructuralMismatch { name, .. } if name == "users"));
    }

    #[test]
    fn clean_resets_the_location_directory() {
        let dir = tempfile::tempdir().unwrap();
        let folder = Folder::builder("raw").at(dir.path()).build().unwrap();

        std::fs::create_dir_all(folder.location()).unwrap();
        std::fs::write(folder.location().join("junk.txt"), b"stale").unwrap();

        folder.clean().unwrap();
        assert!(folder.location().exists());
        assert_eq!(std::fs::read_dir(folder.location()).unwrap().count(), 0);
    }

    #[test]
    fn schema_attachment_survives_resolution() {
        let users = Arc::new(
            Schema::builder("users")
                .column("id", Column::int64().primary_key())
                .build()
                .unwrap(),
        );

        let folder = Folder::builder("raw")
            .at("data")
            .file_with_schema("users", FileKind::Parquet, Arc::clone(&users))
            .build()
            .unwrap();

        let member = folder.file("users").unwrap();
        assert_eq!(member.schema().map(|s| s.name()), Some("users"));
    }
}
