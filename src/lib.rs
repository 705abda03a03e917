//! # DataShelf
//!
//! Declarative data project layouts: folders, files, schemas and embedded
//! databases defined as composable values with deterministic paths.
//!
//! ## Features
//!
//! - **Composable containers**: folders, databases and schemas assemble
//!   their members through one registry engine; a derived container
//!   overrides inherited members in place and never mutates its ancestors
//! - **Deterministic paths**: member locators derive purely from the names
//!   in the hierarchy, never from filesystem state
//! - **Scoped connections**: an embedded database opens its store once per
//!   scope, shares the handle with every table and releases everything on
//!   every exit path
//! - **Schema projections**: one column set renders rich engine types,
//!   portable cross-backend types and SQL DDL
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use datashelf::{Column, Database, FileKind, Folder, Schema, ShelfResult};
//!
//! fn main() -> ShelfResult<()> {
//!     let users = Arc::new(
//!         Schema::builder("users")
//!             .column("id", Column::int64().primary_key())
//!             .column("email", Column::text().unique())
//!             .build()?,
//!     );
//!
//!     let warehouse = Database::builder("warehouse")
//!         .table("users", Arc::clone(&users))
//!         .build()?;
//!
//!     let project = Folder::builder("project")
//!         .at("data")
//!         .file_with_schema("users", FileKind::Csv, users)
//!         .database(warehouse)
//!         .build()?;
//!
//!     assert_eq!(
//!         project.file("users")?.locator().to_str(),
//!         Some("data/project/users.csv"),
//!     );
//!     assert_eq!(
//!         project.database("warehouse")?.locator().to_str(),
//!         Some("data/project/warehouse.db"),
//!     );
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod folder;
pub mod layout;
pub mod manifest;
pub mod schema;
pub mod tree;

pub use config::ShelfConfig;
pub use database::{Database, DatabaseBuilder, Session, Table};
pub use error::{ShelfError, ShelfResult};
pub use folder::{FileKind, FileMember, Folder, FolderBuilder, FolderMember};
pub use layout::{Member, MemberKind, Registry};
pub use manifest::{LayoutManifest, ManifestEntry};
pub use schema::{Column, ColumnType, PortableType, Schema, SchemaBuilder, TimeUnit};
