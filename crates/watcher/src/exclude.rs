//! Excluded paths
//!
//! User-supplied exclusions are resolved once against the watch root and then
//! matched exactly. There is no globbing: `build` excludes `<root>/build` and
//! everything below it (because the walk never descends there), but not
//! `<root>/src/build`.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::config::MonitorConfig;

/// Absolute paths that must never be watched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    paths: HashSet<PathBuf>,
}

impl ExclusionSet {
    /// Resolve `entries` against `root`
    ///
    /// Relative entries are joined onto the root, absolute ones kept as-is.
    /// Blank entries are dropped. Every entry is lexically cleaned so that
    /// `build/`, `./build` and `build` all name the same directory.
    pub fn new<I, S>(root: &Path, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = entries
            .into_iter()
            .filter(|entry| !entry.as_ref().trim().is_empty())
            .map(|entry| {
                let entry = Path::new(entry.as_ref());
                if entry.is_absolute() {
                    clean(entry)
                } else {
                    clean(&root.join(entry))
                }
            })
            .collect();

        Self { paths }
    }

    pub fn from_config(root: &Path, config: &MonitorConfig) -> Self {
        Self::new(root, config.exclusions())
    }

    /// Exact match against the cleaned path
    pub fn contains(&self, path: &Path) -> bool {
        if self.paths.is_empty() {
            return false;
        }
        self.paths.contains(&clean(path))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

/// Lexical cleanup: drop `.`, fold `..`, drop trailing separators
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_entries_join_root() {
        let set = ExclusionSet::new(Path::new("/src"), ["build", "target/debug"]);

        assert!(set.contains(Path::new("/src/build")));
        assert!(set.contains(Path::new("/src/target/debug")));
        assert!(!set.contains(Path::new("/src/target")));
        assert!(!set.contains(Path::new("/src/lib/build")));
    }

    #[test]
    fn test_absolute_entries_kept() {
        let set = ExclusionSet::new(Path::new("/src"), ["/var/cache"]);

        assert!(set.contains(Path::new("/var/cache")));
        assert!(!set.contains(Path::new("/src/var/cache")));
    }

    #[test]
    fn test_entries_are_cleaned() {
        let set = ExclusionSet::new(Path::new("/src/"), ["build/", "./out", "a/../gen"]);

        assert_eq!(set.len(), 3);
        assert!(set.contains(Path::new("/src/build")));
        assert!(set.contains(Path::new("/src/build/")));
        assert!(set.contains(Path::new("/src/out")));
        assert!(set.contains(Path::new("/src/gen")));
    }

    #[test]
    fn test_blank_entries_discarded() {
        let set = ExclusionSet::new(Path::new("/src"), ["", "  ", "build"]);

        assert_eq!(set.len(), 1);
        assert!(!set.contains(Path::new("/src")));
    }

    #[test]
    fn test_empty_set() {
        let set = ExclusionSet::new(Path::new("/src"), Vec::<String>::new());

        assert!(set.is_empty());
        assert!(!set.contains(Path::new("/src/anything")));
    }

    #[test]
    fn test_from_config() {
        let config = MonitorConfig::default().with_exclude(["node_modules", ""]);
        let set = ExclusionSet::from_config(Path::new("/home/me/proj"), &config);

        assert_eq!(set.len(), 1);
        assert!(set.contains(Path::new("/home/me/proj/node_modules")));
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(Path::new("/a/./b/../c/")), PathBuf::from("/a/c"));
        assert_eq!(clean(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(clean(Path::new("../x")), PathBuf::from("../x"));
    }
}
