//! Schema containers: ordered column sets with inheritance.
//!
//! A [`Schema`] is built once from declared columns plus the columns of any
//! extended ancestor schemas, most-base first. A derived schema that
//! redeclares a column name replaces the whole column in its original slot,
//! so ordering stays stable across an inheritance chain. After `build` the
//! column set is frozen; key lookups are answered from caches computed at
//! that point.

mod column;
mod sql;

pub use column::{Column, ColumnType, PortableType, TimeUnit};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ShelfError, ShelfResult};
use crate::layout::{compose, validate_name, Registry};

/// An immutable, ordered collection of typed columns.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    registry: Registry<Column>,
    primary: Vec<String>,
    uniques: Vec<String>,
}

impl Schema {
    /// Start defining a schema with the given name.
    pub fn builder(name: &str) -> SchemaBuilder {
        SchemaBuilder {
            name: name.to_string(),
            ancestors: Vec::new(),
            declared: Vec::new(),
            deferred: None,
        }
    }

    fn assemble(name: String, registry: Registry<Column>) -> Self {
        let primary: Vec<String> = registry
            .iter()
            .filter(|c| c.is_primary_key())
            .map(|c| c.name().to_string())
            .collect();
        let uniques: Vec<String> = registry
            .iter()
            .filter(|c| c.is_unique())
            .map(|c| c.name().to_string())
            .collect();
        log::debug!(
            "schema '{}' built with {} columns ({} primary, {} unique)",
            name,
            registry.len(),
            primary.len(),
            uniques.len()
        );
        Self {
            name,
            registry,
            primary,
            uniques,
        }
    }

    fn from_columns(name: String, columns: Vec<Column>) -> ShelfResult<Self> {
        validate_name(&name)?;
        let mut registry = Registry::new();
        for column in columns {
            validate_name(column.name())?;
            registry.insert(column)?;
        }
        Ok(Self::assemble(name, registry))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.registry.iter()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.registry.names().collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> ShelfResult<&Column> {
        self.registry
            .get(name)
            .ok_or_else(|| ShelfError::unknown_member(&self.name, name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Column names paired with their rich engine types.
    pub fn value_types(&self) -> Vec<(String, ColumnType)> {
        self.registry
            .iter()
            .map(|c| (c.name().to_string(), c.column_type().clone()))
            .collect()
    }

    /// Column names paired with their backend-neutral type classes.
    pub fn portable_types(&self) -> Vec<(String, PortableType)> {
        self.registry
            .iter()
            .map(|c| (c.name().to_string(), c.column_type().portable()))
            .collect()
    }

    /// SQL definitions for each column, in declaration order.
    pub fn sql_columns(&self) -> Vec<String> {
        let inline = self.primary.len() <= 1;
        self.registry
            .iter()
            .map(|c| sql::column_definition(c, inline))
            .collect()
    }

    /// Full `CREATE TABLE` statement for this schema under the given table
    /// name.
    pub fn create_table_sql(&self, table: &str) -> String {
        sql::create_table(self, table)
    }

    /// Names of primary key columns, in declaration order.
    pub fn primary_keys(&self) -> &[String] {
        &self.primary
    }

    /// Names of unique columns, in declaration order.
    pub fn unique_keys(&self) -> &[String] {
        &self.uniques
    }

    /// Primary key and unique column names, deduplicated, declaration order.
    pub fn constraint_keys(&self) -> Vec<String> {
        let mut keys = self.primary.clone();
        for name in &self.uniques {
            if !keys.contains(name) {
                keys.push(name.clone());
            }
        }
        keys
    }

    /// Serialize the schema to a JSON document.
    pub fn to_json(&self) -> ShelfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a schema from a JSON document produced by [`Schema::to_json`].
    pub fn from_json(json: &str) -> ShelfResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.registry.len() == other.registry.len()
            && self.registry.iter().zip(other.registry.iter()).all(|(a, b)| a == b)
    }
}

#[derive(Serialize, Deserialize)]
struct SchemaDoc {
    name: String,
    columns: Vec<Column>,
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let doc = SchemaDoc {
            name: self.name.clone(),
            columns: self.registry.iter().cloned().collect(),
        };
        doc.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = SchemaDoc::deserialize(deserializer)?;
        Schema::from_columns(doc.name, doc.columns).map_err(D::Error::custom)
    }
}

/// Builder for [`Schema`].
///
/// ```
/// use datashelf::{Column, Schema};
///
/// let base = Schema::builder("record")
///     .column("id", Column::int64().primary_key())
///     .column("note", Column::text())
///     .build()
///     .unwrap();
///
/// let derived = Schema::builder("audited_record")
///     .extends(&base)
///     .column("note", Column::categorical())
///     .column("checked_at", Column::date())
///     .build()
///     .unwrap();
///
/// assert_eq!(derived.column_names(), vec!["id", "note", "checked_at"]);
/// ```
pub struct SchemaBuilder {
    name: String,
    ancestors: Vec<Registry<Column>>,
    declared: Vec<Column>,
    deferred: Option<ShelfError>,
}

impl SchemaBuilder {
    /// Inherit every column of `parent`. Call once per ancestor, most-base
    /// first; later ancestors override earlier ones column by column.
    pub fn extends(mut self, parent: &Schema) -> Self {
        self.ancestors.push(parent.registry.clone());
        self
    }

    /// Declare a column under the given name, overriding any inherited
    /// column with that name.
    pub fn column(mut self, name: &str, column: Column) -> Self {
        if self.deferred.is_none() {
            if let Err(err) = validate_name(name) {
                self.deferred = Some(err);
                return self;
            }
            self.declared.push(column.named(name));
        }
        self
    }

    /// Compose ancestors and declarations into a frozen [`Schema`].
    pub fn build(self) -> ShelfResult<Schema> {
        if let Some(err) = self.deferred {
            return Err(err);
        }
        validate_name(&self.name)?;
        let ancestors: Vec<&Registry<Column>> = self.ancestors.iter().collect();
        let registry = compose(&ancestors, self.declared)?;
        Ok(Schema::assemble(self.name, registry))
    }
}
