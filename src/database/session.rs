//! RAII guard for an active database connection scope.

use std::ops::Deref;

use uuid::Uuid;

use crate::database::Database;

/// An active connection scope on a [`Database`].
///
/// Created by [`Database::connect`]. Dropping the session detaches every
/// table and closes the shared handle, whether the scope ends by normal
/// fallthrough, early return or an unwinding panic. The session derefs to
/// its database so table lookups chain directly:
///
/// ```no_run
/// use datashelf::Database;
///
/// # fn run(warehouse: &Database) -> datashelf::ShelfResult<()> {
/// let session = warehouse.connect()?;
/// session.table("users")?.put("alice", &serde_json::json!({"age": 30}))?;
/// drop(session);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session<'db> {
    database: &'db Database,
    scope_id: Uuid,
}

impl<'db> Session<'db> {
    pub(crate) fn new(database: &'db Database, scope_id: Uuid) -> Self {
        Self { database, scope_id }
    }

    /// Identifier of this scope, unique per entry.
    pub fn scope_id(&self) -> Uuid {
        self.scope_id
    }

    /// The database this scope belongs to.
    pub fn database(&self) -> &'db Database {
        self.database
    }
}

impl Deref for Session<'_> {
    type Target = Database;

    fn deref(&self) -> &Database {
        self.database
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.database.release(self.scope_id);
    }
}
