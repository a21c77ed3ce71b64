//! Path normalization and matching between code unit paths and the paths
//! recorded by coverage exporters.
//!
//! Exporters frequently record a different spelling of the same file: a
//! relative path, a path under a relocated build tree, or a path through a
//! symlink such as macOS's `/var` → `/private/var`. Matching therefore falls
//! back from exact equality to whole-component suffix matching.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path without touching the filesystem.
///
/// Backslashes become `/`, `.` components are dropped, `..` pops the
/// preceding normal component (or is dropped directly under the root), and
/// duplicate or trailing separators disappear.
pub fn normalize(path: impl AsRef<Path>) -> PathBuf {
    let raw = path.as_ref().to_string_lossy().replace('\\', "/");
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in Path::new(&raw).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    out.iter().map(|c| c.as_os_str()).collect()
}

/// Resolves query paths against a fixed set of indexed paths.
///
/// Candidates are kept ordered longest-first (then lexicographically), so
/// the first suffix match is also the most specific one.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    exact: HashSet<PathBuf>,
    by_specificity: Vec<PathBuf>,
}

impl PathResolver {
    /// Build a resolver over already-normalized paths.
    pub fn new<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let exact: HashSet<PathBuf> = paths.into_iter().collect();
        let mut by_specificity: Vec<PathBuf> = exact.iter().cloned().collect();
        by_specificity.sort_by(|a, b| specificity(a, b));
        Self {
            exact,
            by_specificity,
        }
    }

    /// Find the indexed path that `query` refers to.
    ///
    /// Returns `None` when nothing matches; callers treat that as "no
    /// coverage data for this file".
    pub fn resolve(&self, query: &Path) -> Option<&Path> {
        let query = normalize(query);
        if query.as_os_str().is_empty() {
            return None;
        }
        if let Some(hit) = self.exact.get(&query) {
            return Some(hit.as_path());
        }

        let query_tail = unrooted(&query);
        if query_tail.as_os_str().is_empty() {
            return None;
        }
        self.by_specificity
            .iter()
            .find(|candidate| {
                let tail = unrooted(candidate);
                !tail.as_os_str().is_empty()
                    && (query_tail.ends_with(tail) || tail.ends_with(query_tail))
            })
            .map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.by_specificity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_specificity.is_empty()
    }
}

/// `path` without its root, so absolute paths can match as suffixes of
/// longer ones.
fn unrooted(path: &Path) -> &Path {
    path.strip_prefix("/").unwrap_or(path)
}

/// Longest string first; equal lengths in lexicographic order.
fn specificity(a: &Path, b: &Path) -> Ordering {
    let (a, b) = (a.as_os_str(), b.as_os_str());
    b.len().cmp(&a.len()).then_with(|| a.cmp(b))
}
