//! Column descriptors and their type projections.
//!
//! A [`Column`] pairs a name with a [`ColumnType`] and optional key
//! constraints. The rich [`ColumnType`] is what the in-process engine works
//! with; [`ColumnType::portable`] lowers it to a coarse cross-backend class
//! and [`ColumnType::sql`] renders the SQL column type used in generated
//! DDL. Both lowerings are pure functions of the type alone.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::{Member, MemberKind};

/// Resolution of a timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    #[serde(rename = "ns")]
    Nanoseconds,
    #[serde(rename = "us")]
    Microseconds,
    #[serde(rename = "ms")]
    Milliseconds,
}

/// Rich column type as the in-process engine sees it.
///
/// Widths, time units and nesting are preserved here and only collapsed by
/// the lowering projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Text,
    Binary,
    Date,
    Timestamp(TimeUnit),
    Decimal { precision: u8, scale: u8 },
    Categorical,
    List(Box<ColumnType>),
    Struct(Vec<(String, ColumnType)>),
}

/// Coarse, backend-neutral column type class.
///
/// Integer widths, signedness, time units and nesting details are erased;
/// what remains is the logical class every supported backend can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortableType {
    Boolean,
    Integer,
    Float,
    Text,
    Binary,
    Date,
    Timestamp,
    Decimal,
    List,
    Struct,
}

impl ColumnType {
    /// Lower to the backend-neutral type class.
    pub fn portable(&self) -> PortableType {
        match self {
            ColumnType::Boolean => PortableType::Boolean,
            ColumnType::Int8
            | ColumnType::Int16
            | ColumnType::Int32
            | ColumnType::Int64
            | ColumnType::UInt8
            | ColumnType::UInt16
            | ColumnType::UInt32
            | ColumnType::UInt64 => PortableType::Integer,
            ColumnType::Float32 | ColumnType::Float64 => PortableType::Float,
            ColumnType::Text | ColumnType::Categorical => PortableType::Text,
            ColumnType::Binary => PortableType::Binary,
            ColumnType::Date => PortableType::Date,
            ColumnType::Timestamp(_) => PortableType::Timestamp,
            ColumnType::Decimal { .. } => PortableType::Decimal,
            ColumnType::List(_) => PortableType::List,
            ColumnType::Struct(_) => PortableType::Struct,
        }
    }

    /// Render the SQL column type for generated DDL.
    pub fn sql(&self) -> String {
        match self {
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Int8 => "TINYINT".to_string(),
            ColumnType::Int16 => "SMALLINT".to_string(),
            ColumnType::Int32 => "INTEGER".to_string(),
            ColumnType::Int64 => "BIGINT".to_string(),
            ColumnType::UInt8 => "UTINYINT".to_string(),
            ColumnType::UInt16 => "USMALLINT".to_string(),
            ColumnType::UInt32 => "UINTEGER".to_string(),
            ColumnType::UInt64 => "UBIGINT".to_string(),
            ColumnType::Float32 => "FLOAT".to_string(),
            ColumnType::Float64 => "DOUBLE".to_string(),
            ColumnType::Text | ColumnType::Categorical => "VARCHAR".to_string(),
            ColumnType::Binary => "BLOB".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Timestamp(TimeUnit::Nanoseconds) => "TIMESTAMP_NS".to_string(),
            ColumnType::Timestamp(TimeUnit::Microseconds) => "TIMESTAMP".to_string(),
            ColumnType::Timestamp(TimeUnit::Milliseconds) => "TIMESTAMP_MS".to_string(),
            ColumnType::Decimal { precision, scale } => {
                format!("DECIMAL({},{})", precision, scale)
            }
            ColumnType::List(inner) => format!("{}[]", inner.sql()),
            ColumnType::Struct(fields) => {
                let rendered: Vec<String> = fields
                    .iter()
                    .map(|(name, ty)| format!("\"{}\" {}", name, ty.sql()))
                    .collect();
                format!("STRUCT({})", rendered.join(", "))
            }
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql())
    }
}

/// A typed column with optional key constraints.
///
/// Columns are declared through the convenience constructors and attached
/// to a schema by name:
///
/// ```
/// use datashelf::{Column, Schema};
///
/// let users = Schema::builder("users")
///     .column("id", Column::int64().primary_key())
///     .column("email", Column::text().unique())
///     .build()
///     .unwrap();
/// assert_eq!(users.primary_keys(), &["id".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    unique: bool,
}

impl Column {
    /// Create an unconstrained column of the given type. The name is bound
    /// when the column is declared on a schema builder.
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            name: String::new(),
            column_type,
            primary_key: false,
            unique: false,
        }
    }

    pub fn boolean() -> Self {
        Self::new(ColumnType::Boolean)
    }

    pub fn int8() -> Self {
        Self::new(ColumnType::Int8)
    }

    pub fn int16() -> Self {
        Self::new(ColumnType::Int16)
    }

    pub fn int32() -> Self {
        Self::new(ColumnType::Int32)
    }

    pub fn int64() -> Self {
        Self::new(ColumnType::Int64)
    }

    pub fn uint8() -> Self {
        Self::new(ColumnType::UInt8)
    }

    pub fn uint16() -> Self {
        Self::new(ColumnType::UInt16)
    }

    pub fn uint32() -> Self {
        Self::new(ColumnType::UInt32)
    }

    pub fn uint64() -> Self {
        Self::new(ColumnType::UInt64)
    }

    pub fn float32() -> Self {
        Self::new(ColumnType::Float32)
    }

    pub fn float64() -> Self {
        Self::new(ColumnType::Float64)
    }

    pub fn text() -> Self {
        Self::new(ColumnType::Text)
    }

    pub fn binary() -> Self {
        Self::new(ColumnType::Binary)
    }

    pub fn date() -> Self {
        Self::new(ColumnType::Date)
    }

    pub fn timestamp(unit: TimeUnit) -> Self {
        Self::new(ColumnType::Timestamp(unit))
    }

    pub fn decimal(precision: u8, scale: u8) -> Self {
        Self::new(ColumnType::Decimal { precision, scale })
    }

    pub fn categorical() -> Self {
        Self::new(ColumnType::Categorical)
    }

    pub fn list(inner: ColumnType) -> Self {
        Self::new(ColumnType::List(Box::new(inner)))
    }

    /// Mark this column as part of the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Add a uniqueness constraint on this column.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub(crate) fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }
}

impl Member for Column {
    fn kind(&self) -> MemberKind {
        MemberKind::Column
    }

    fn name(&self) -> &str {
        &self.name
    }
}
