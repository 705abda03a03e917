//! Tables: named row stores inside a database layout.

use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ShelfError, ShelfResult};
use crate::layout::{Member, MemberKind};
use crate::schema::Schema;

/// A table declared inside a [`Database`](crate::database::Database).
///
/// While the owning database's connection scope is active the table holds
/// its own copy of the shared storage handle and maps to a storage tree
/// named after the table. Outside a scope every data operation fails with
/// [`ShelfError::NotConnected`].
#[derive(Debug)]
pub struct Table {
    name: String,
    schema: Option<Arc<Schema>>,
    conn: Mutex<Option<Arc<sled::Db>>>,
}

impl Clone for Table {
    fn clone(&self) -> Self {
        // connection state is runtime state; a copy always starts detached
        Self {
            name: self.name.clone(),
            schema: self.schema.clone(),
            conn: Mutex::new(None),
        }
    }
}

impl Table {
    pub(crate) fn new(name: &str, schema: Option<Arc<Schema>>) -> Self {
        Self {
            name: name.to_string(),
            schema,
            conn: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema attached at declaration, if any.
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    /// `CREATE TABLE` statement for this table, when it carries a schema.
    pub fn create_table_sql(&self) -> Option<String> {
        self.schema.as_ref().map(|s| s.create_table_sql(&self.name))
    }

    pub(crate) fn attach(&self, handle: Arc<sled::Db>) {
        let mut slot = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(handle);
    }

    pub(crate) fn detach(&self) {
        let mut slot = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        slot.take();
    }

    fn connection(&self) -> ShelfResult<Arc<sled::Db>> {
        let slot = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        slot.clone()
            .ok_or_else(|| ShelfError::NotConnected(self.name.clone()))
    }

    /// Whether the owning database's scope is currently active.
    pub fn is_connected(&self) -> bool {
        let slot = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        slot.is_some()
    }

    /// The storage tree backing this table. Requires an active scope.
    ///
    /// The returned tree carries its own reference to the store. Holding it
    /// past the end of the scope keeps the store open until it is dropped.
    pub fn handle(&self) -> ShelfResult<sled::Tree> {
        Ok(self.connection()?.open_tree(self.name.as_bytes())?)
    }

    /// Store a row under the given key, replacing any existing row.
    pub fn put<T: Serialize>(&self, key: &str, row: &T) -> ShelfResult<()> {
        let tree = self.handle()?;
        let bytes = serde_json::to_vec(row)?;
        tree.insert(key.as_bytes(), bytes)?;
        Ok(())
    }

    /// Fetch the row stored under the given key.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> ShelfResult<Option<T>> {
        let tree = self.handle()?;
        match tree.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Delete the row under the given key. Returns whether a row existed.
    pub fn delete(&self, key: &str) -> ShelfResult<bool> {
        let tree = self.handle()?;
        Ok(tree.remove(key.as_bytes())?.is_some())
    }

    /// Remove every row in the table.
    pub fn clear(&self) -> ShelfResult<()> {
        let tree = self.handle()?;
        tree.clear()?;
        Ok(())
    }

    /// Number of rows currently stored.
    pub fn len(&self) -> ShelfResult<usize> {
        Ok(self.handle()?.len())
    }

    pub fn is_empty(&self) -> ShelfResult<bool> {
        Ok(self.handle()?.is_empty())
    }

    /// All row keys, in storage order.
    pub fn keys(&self) -> ShelfResult<Vec<String>> {
        let tree = self.handle()?;
        let mut keys = Vec::new();
        for entry in tree.iter().keys() {
            let key = entry?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }
}

impl Member for Table {
    fn kind(&self) -> MemberKind {
        MemberKind::Table
    }

    fn name(&self) -> &str {
        &self.name
    }
}
