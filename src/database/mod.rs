//! Embedded databases: table containers with a scoped connection lifecycle.
//!
//! A [`Database`] plays two roles. Toward its tables it is a container,
//! composed through the same registry rules as every other container.
//! Toward a folder it is a single placeable member whose locator is a
//! `<name>.db` path under the folder's location.
//!
//! The connection lifecycle is strict:
//!
//! - [`Database::connect`] opens the backing store exactly once, hands a
//!   copy of the shared handle to every table and returns a [`Session`]
//!   guard
//! - entering an already-active database fails with
//!   [`ShelfError::Reentrancy`]; the existing scope is left untouched
//! - dropping the session detaches every table, flushes and closes the
//!   store, on every exit path

mod session;
mod table;

pub use session::Session;
pub use table::Table;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use crate::config::ShelfConfig;
use crate::error::{ShelfError, ShelfResult};
use crate::layout::{compose, segment_of, validate_name, Member, MemberKind, Registry};
use crate::schema::Schema;

/// An embedded database holding an ordered set of tables.
#[derive(Debug)]
pub struct Database {
    name: String,
    locator: PathBuf,
    registry: Registry<Table>,
    conn: Mutex<Option<Arc<sled::Db>>>,
}

impl Clone for Database {
    fn clone(&self) -> Self {
        // layout is copied, runtime connection state is not
        Self {
            name: self.name.clone(),
            locator: self.locator.clone(),
            registry: self.registry.clone(),
            conn: Mutex::new(None),
        }
    }
}

impl Member for Database {
    fn kind(&self) -> MemberKind {
        MemberKind::Database
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Database {
    /// Start defining a database with the given name.
    pub fn builder(name: &str) -> DatabaseBuilder {
        DatabaseBuilder {
            name: name.to_string(),
            base: None,
            ancestors: Vec::new(),
            declared: Vec::new(),
            deferred: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the backing store. Set to `<name>.db` beneath the owning
    /// folder's location at placement; a standalone database resolves to
    /// `<name>.db` relative to the working directory.
    pub fn locator(&self) -> &Path {
        &self.locator
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> ShelfResult<&Table> {
        self.registry
            .get(name)
            .ok_or_else(|| ShelfError::unknown_member(&self.name, name))
    }

    /// Tables in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.registry.iter()
    }

    /// Table names in declaration order.
    pub fn table_names(&self) -> Vec<&str> {
        self.registry.names().collect()
    }

    /// Whether a connection scope is currently active.
    pub fn is_active(&self) -> bool {
        let slot = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        slot.is_some()
    }

    /// Enter a connection scope: open the backing store, attach every
    /// table to the shared handle and return the guard that will undo all
    /// of it on drop.
    ///
    /// Fails with [`ShelfError::Reentrancy`] if a scope is already active.
    pub fn connect(&self) -> ShelfResult<Session<'_>> {
        let mut slot = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(ShelfError::Reentrancy(self.name.clone()));
        }
        let handle = Arc::new(sled::open(&self.locator)?);
        for table in self.registry.iter() {
            table.attach(Arc::clone(&handle));
        }
        *slot = Some(handle);
        drop(slot);

        let scope_id = Uuid::new_v4();
        log::info!(
            "database '{}': opened connection scope {} at '{}'",
            self.name,
            scope_id,
            self.locator.display()
        );
        Ok(Session::new(self, scope_id))
    }

    /// Run a closure inside a connection scope.
    ///
    /// The scope is entered before the closure runs and released when it
    /// returns, whether with `Ok`, with `Err` or by panicking.
    pub fn with_session<R>(
        &self,
        f: impl FnOnce(&Session<'_>) -> ShelfResult<R>,
    ) -> ShelfResult<R> {
        let session = self.connect()?;
        f(&session)
    }

    pub(crate) fn release(&self, scope_id: Uuid) {
        let mut slot = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        for table in self.registry.iter() {
            table.detach();
        }
        if let Some(handle) = slot.take() {
            if let Err(err) = handle.flush() {
                log::warn!(
                    "database '{}': flush on scope {} exit failed: {}",
                    self.name,
                    scope_id,
                    err
                );
            }
        }
        drop(slot);
        log::info!("database '{}': closed connection scope {}", self.name, scope_id);
    }

    pub(crate) fn relocate(&mut self, location: &Path) {
        self.locator = location.join(format!("{}.db", self.name));
    }

    /// `CREATE TABLE` statements for every table that carries a schema,
    /// in declaration order.
    pub fn create_table_statements(&self) -> Vec<String> {
        self.registry
            .iter()
            .filter_map(|t| t.create_table_sql())
            .collect()
    }
}

/// Builder for [`Database`].
pub struct DatabaseBuilder {
    name: String,
    base: Option<PathBuf>,
    ancestors: Vec<Registry<Table>>,
    declared: Vec<Table>,
    deferred: Option<ShelfError>,
}

impl DatabaseBuilder {
    /// Inherit every table of `parent`. Call once per ancestor, most-base
    /// first; later ancestors override earlier ones table by table.
    pub fn extends(mut self, parent: &Database) -> Self {
        self.ancestors.push(parent.registry.clone());
        self
    }

    /// Resolve the standalone locator beneath the configured database root
    /// instead of the working directory. Ignored once the database is
    /// placed inside a folder.
    pub fn rooted(mut self, config: &ShelfConfig) -> Self {
        self.base = Some(config.database_root());
        self
    }

    /// Declare a table with an attached schema, overriding any inherited
    /// table with the same name.
    pub fn table(self, name: &str, schema: Arc<Schema>) -> Self {
        self.push_table(name, Some(schema))
    }

    /// Declare a table without a schema.
    pub fn bare_table(self, name: &str) -> Self {
        self.push_table(name, None)
    }

    fn push_table(mut self, name: &str, schema: Option<Arc<Schema>>) -> Self {
        if self.deferred.is_none() {
            if let Err(err) = validate_name(name) {
                self.deferred = Some(err);
                return self;
            }
            self.declared.push(Table::new(name, schema));
        }
        self
    }

    /// Compose ancestors and declarations into an idle [`Database`].
    pub fn build(self) -> ShelfResult<Database> {
        if let Some(err) = self.deferred {
            return Err(err);
        }
        validate_name(&self.name)?;
        let ancestors: Vec<&Registry<Table>> = self.ancestors.iter().collect();
        let registry = compose(&ancestors, self.declared)?;
        let locator = self
            .base
            .unwrap_or_default()
            .join(format!("{}.db", segment_of(&self.name)));
        log::debug!(
            "database '{}' built with {} tables",
            self.name,
            registry.len()
        );
        Ok(Database {
            name: self.name,
            locator,
            registry,
            conn: Mutex::new(None),
        })
    }
}
