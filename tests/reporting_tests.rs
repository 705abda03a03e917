use std::path::{Path, PathBuf};
use std::sync::Arc;

use datashelf::{
    tree, Column, Database, FileKind, Folder, LayoutManifest, MemberKind, Schema, ShelfConfig,
};

fn users_schema() -> Arc<Schema> {
    Arc::new(
        Schema::builder("users")
            .column("id", Column::int64().primary_key())
            .build()
            .expect("schema should build"),
    )
}

#[test]
fn test_tree_renders_nested_hierarchy() {
    let raw = Folder::builder("raw")
        .at("data")
        .file("users", FileKind::Csv)
        .partitioned("events", FileKind::Parquet, &["year"])
        .build()
        .expect("raw should build");

    let staged = Folder::builder("staged")
        .extends(&raw)
        .file("users", FileKind::Parquet)
        .database(
            Database::builder("warehouse")
                .table("users", users_schema())
                .build()
                .expect("warehouse should build"),
        )
        .build()
        .expect("staged should build");

    assert_eq!(
        tree::render(&[&raw, &staged]),
        "data/raw\n\
         ├── events\n\
         ├── staged\n\
         │   ├── events\n\
         │   ├── users.parquet\n\
         │   └── warehouse.db\n\
         └── users.csv\n"
    );

    // A single folder renders the same shape rooted at itself.
    assert_eq!(
        staged.show_tree(),
        "data/raw/staged\n\
         ├── events\n\
         ├── users.parquet\n\
         └── warehouse.db\n"
    );
}

#[test]
fn test_manifest_captures_resolved_layout() {
    let folder = Folder::builder("lake")
        .at("data")
        .file_with_schema("users", FileKind::Csv, users_schema())
        .database(
            Database::builder("warehouse")
                .table("users", users_schema())
                .bare_table("audit")
                .build()
                .expect("warehouse should build"),
        )
        .build()
        .expect("lake should build");

    let manifest = folder.manifest();
    assert_eq!(manifest.folder, "lake");
    assert_eq!(manifest.location, PathBuf::from("data/lake"));

    let kinds: Vec<MemberKind> = manifest.members.iter().map(|m| m.kind).collect();
    assert_eq!(kinds, vec![MemberKind::File, MemberKind::Database]);
    assert_eq!(
        manifest.members[1].tables,
        vec!["users".to_string(), "audit".to_string()]
    );

    let json = manifest.to_json().expect("serialize");
    let restored = LayoutManifest::from_json(&json).expect("deserialize");
    assert_eq!(restored.members, manifest.members);
}

#[test]
fn test_config_file_seeds_layout_roots() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("shelf.toml");
    std::fs::write(&config_path, "root = \"/srv/lake\"\ndatabase_dir = \"db\"\n")
        .expect("write config");

    let config = ShelfConfig::load(&config_path).expect("config should load");

    let folder = Folder::builder("raw")
        .rooted(&config)
        .file("users", FileKind::Csv)
        .build()
        .expect("raw should build");
    assert_eq!(
        folder.file("users").unwrap().locator(),
        Path::new("/srv/lake/raw/users.csv")
    );

    let standalone = Database::builder("scratch")
        .rooted(&config)
        .build()
        .expect("scratch should build");
    assert_eq!(standalone.locator(), Path::new("/srv/lake/db/scratch.db"));
}

#[test]
fn test_missing_config_defaults_are_usable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let absent = dir.path().join("absent.toml");

    let config = ShelfConfig::load_or_default(absent.to_str()).expect("defaults should load");
    assert_eq!(config.root, PathBuf::from("data"));

    let folder = Folder::builder("raw")
        .rooted(&config)
        .build()
        .expect("raw should build");
    assert_eq!(folder.location(), Path::new("data/raw"));
}
