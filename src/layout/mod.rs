//! Member registration and composition engine.
//!
//! Containers in this crate (folders, databases, schemas) all assemble their
//! contents the same way: a builder collects declared members, pulls in the
//! members of any extended ancestors, and composes everything into a single
//! insertion-ordered [`Registry`]. The rules are:
//!
//! - Ancestors contribute members in order, most-base first
//! - A later member with the same name replaces the earlier one **in place**,
//!   keeping the original slot in the ordering
//! - An override must keep the member kind compatible; a kind change is a
//!   [`StructuralMismatch`](crate::error::ShelfError::StructuralMismatch)
//! - Composition copies ancestor members; ancestor registries are never
//!   mutated by a derived container
//!
//! Once a container is built its registry is frozen. All mutation happens
//! inside the builder, before the container value exists.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ShelfError, ShelfResult};

/// Kind discriminant for registered members, used for structural
/// compatibility checks when one member overrides another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// A data file resolved beneath a folder, including partitioned datasets
    File,
    /// An embedded database placed as a single member inside a folder
    Database,
    /// A table declared inside a database
    Table,
    /// A typed column declared inside a schema
    Column,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MemberKind::File => "file",
            MemberKind::Database => "database",
            MemberKind::Table => "table",
            MemberKind::Column => "column",
        };
        write!(f, "{}", label)
    }
}

/// Common interface for everything a container can register.
///
/// Members carry their name from the moment they are declared and never
/// learn which container ended up holding them.
pub trait Member: Clone {
    /// Kind discriminant for structural compatibility checks.
    fn kind(&self) -> MemberKind;

    /// Name the member was declared under.
    fn name(&self) -> &str;
}

/// Insertion-ordered member collection with name-keyed lookup.
///
/// Iteration yields members in first-declaration order. Overriding a name
/// replaces the member in its original slot rather than appending, so a
/// derived container keeps its ancestor's ordering.
#[derive(Debug, Clone)]
pub struct Registry<M: Member> {
    members: Vec<M>,
    index: HashMap<String, usize>,
}

impl<M: Member> Registry<M> {
    pub(crate) fn new() -> Self {
        Self {
            members: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a member, overriding any same-named member in place.
    ///
    /// Fails with `StructuralMismatch` when the existing member has a
    /// different kind.
    pub(crate) fn insert(&mut self, member: M) -> ShelfResult<()> {
        let name = member.name().to_string();
        match self.index.get(&name) {
            Some(&slot) => {
                let existing = &self.members[slot];
                if existing.kind() != member.kind() {
                    return Err(ShelfError::structural_mismatch(
                        name,
                        existing.kind(),
                        member.kind(),
                    ));
                }
                self.members[slot] = member;
            }
            None => {
                self.index.insert(name, self.members.len());
                self.members.push(member);
            }
        }
        Ok(())
    }

    /// Look up a member by name.
    pub fn get(&self, name: &str) -> Option<&M> {
        self.index.get(name).map(|&slot| &self.members[slot])
    }

    /// Whether a member with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Members in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &M> {
        self.members.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut M> {
        self.members.iter_mut()
    }

    /// Member names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name())
    }

    /// Number of registered members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the registry holds no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<M: Member> Default for Registry<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Compose a registry from ancestor registries and a container's own
/// declarations.
///
/// Ancestors are applied in the given order (most-base first), then the
/// declared members on top, so the most-derived declaration of a name wins.
/// Ancestor members are cloned in; the source registries stay untouched.
pub(crate) fn compose<M: Member>(
    ancestors: &[&Registry<M>],
    declared: Vec<M>,
) -> ShelfResult<Registry<M>> {
    let mut registry = Registry::new();
    for ancestor in ancestors {
        for member in ancestor.iter() {
            registry.insert(member.clone())?;
        }
    }
    for member in declared {
        registry.insert(member)?;
    }
    Ok(registry)
}

/// Validate a container or member name at declaration time.
///
/// Names become path segments and storage keys, so separators and
/// whitespace are rejected outright.
pub(crate) fn validate_name(name: &str) -> ShelfResult<()> {
    if name.is_empty() {
        return Err(ShelfError::invalid_name("name cannot be empty"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(ShelfError::invalid_name(format!(
            "name '{}' contains a path separator",
            name
        )));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(ShelfError::invalid_name(format!(
            "name '{}' contains whitespace",
            name
        )));
    }
    Ok(())
}

/// Path segment a container contributes to its children: the container
/// name, lowercased.
pub(crate) fn segment_of(name: &str) -> String {
    name.to_lowercase()
}
