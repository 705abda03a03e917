//! Box-drawing rendering of resolved layouts.
//!
//! [`render`] draws the combined directory tree of one or more folders,
//! rooted at the shallowest folder location. Deriving folders nest beneath
//! their ancestors, so rendering a whole hierarchy shows staging areas as
//! subdirectories of the raw area they extend. Purely a projection of
//! resolved locators; the filesystem is never consulted.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::folder::Folder;

/// Render the combined tree of the given folders.
///
/// ```
/// use datashelf::{tree, FileKind, Folder};
///
/// let raw = Folder::builder("raw")
///     .at("data")
///     .file("users", FileKind::Csv)
///     .build()
///     .unwrap();
///
/// assert_eq!(tree::render(&[&raw]), "data/raw\n└── users.csv\n");
/// ```
pub fn render(folders: &[&Folder]) -> String {
    let root = match folders
        .iter()
        .map(|f| f.location())
        .min_by_key(|loc| loc.components().count())
    {
        Some(root) => root,
        None => return String::new(),
    };

    let mut paths: BTreeSet<PathBuf> = BTreeSet::new();
    for folder in folders {
        if let Ok(rel) = folder.location().strip_prefix(root) {
            insert_with_ancestors(&mut paths, rel);
        }
        for member in folder.members() {
            if let Ok(rel) = member.locator().strip_prefix(root) {
                insert_with_ancestors(&mut paths, rel);
            }
        }
    }

    let mut out = format!("{}\n", root.display());
    render_level(&paths, Path::new(""), "", &mut out);
    out
}

fn insert_with_ancestors(paths: &mut BTreeSet<PathBuf>, rel: &Path) {
    let mut current = PathBuf::new();
    for component in rel.components() {
        current.push(component);
        paths.insert(current.clone());
    }
}

fn render_level(paths: &BTreeSet<PathBuf>, dir: &Path, prefix: &str, out: &mut String) {
    let children: Vec<&PathBuf> = paths
        .iter()
        .filter(|p| p.parent() == Some(dir))
        .collect();

    for (i, child) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();
        let connector = if is_last { "└── " } else { "├── " };
        let name = child
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(&name);
        out.push('\n');

        let extension = if is_last { "    " } else { "│   " };
        let child_prefix = format!("{}{}", prefix, extension);
        render_level(paths, child, &child_prefix, out);
    }
}
