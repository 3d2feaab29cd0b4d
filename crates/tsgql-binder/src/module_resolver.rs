//! Source hosts and relative module resolution.

use rustc_hash::FxHashMap;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Extensions tried, in order, for an extensionless relative specifier.
const TS_EXTENSION_CANDIDATES: [&str; 2] = ["ts", "d.ts"];

/// Where source text comes from.
pub trait SourceHost {
    fn read_file(&self, path: &Path) -> Option<String>;
    fn is_file(&self, path: &Path) -> bool;
}

/// Reads from the real file system.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiskHost;

impl SourceHost for DiskHost {
    fn read_file(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Serves an in-memory file map; keys are normalized on insertion.
#[derive(Clone, Debug, Default)]
pub struct MemoryHost {
    files: FxHashMap<PathBuf, String>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>, text: impl Into<String>) {
        self.files.insert(normalize_path(path.as_ref()), text.into());
    }
}

impl SourceHost for MemoryHost {
    fn read_file(&self, path: &Path) -> Option<String> {
        self.files.get(&normalize_path(path)).cloned()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize_path(path))
    }
}

/// Whether a specifier is resolved against the importing file.
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
}

/// Resolve a relative specifier: the exact path if it names a file, then
/// `.ts`, `.d.ts`, `/index.ts` and `/index.d.ts`.
pub fn resolve_relative(
    host: &dyn SourceHost,
    containing_file: &Path,
    specifier: &str,
) -> Option<PathBuf> {
    let containing_dir = containing_file.parent().unwrap_or(Path::new(""));
    let candidate = normalize_path(&containing_dir.join(specifier));
    try_file(host, &candidate).or_else(|| try_file(host, &candidate.join("index")))
}

fn try_file(host: &dyn SourceHost, path: &Path) -> Option<PathBuf> {
    if path.extension().is_some_and(|ext| ext == "ts") && host.is_file(path) {
        return Some(path.to_path_buf());
    }
    TS_EXTENSION_CANDIDATES.iter().find_map(|ext| {
        let mut with_ext = OsString::from(path.as_os_str());
        with_ext.push(".");
        with_ext.push(ext);
        let with_ext = PathBuf::from(with_ext);
        host.is_file(&with_ext).then_some(with_ext)
    })
}

/// Lexically normalize a path: drop `.` components and fold `..` into
/// the preceding component where there is one.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_dots() {
        assert_eq!(
            normalize_path(Path::new("./a/./b/../c.ts")),
            PathBuf::from("a/c.ts")
        );
        assert_eq!(normalize_path(Path::new("../x.ts")), PathBuf::from("../x.ts"));
    }

    #[test]
    fn resolves_extension_and_index_candidates() {
        let mut host = MemoryHost::new();
        host.add_file("src/types.d.ts", "");
        host.add_file("src/models/index.ts", "");
        host.add_file("src/schema.ts", "");

        let from = Path::new("src/schema.ts");
        assert_eq!(
            resolve_relative(&host, from, "./types"),
            Some(PathBuf::from("src/types.d.ts"))
        );
        assert_eq!(
            resolve_relative(&host, from, "./models"),
            Some(PathBuf::from("src/models/index.ts"))
        );
        assert_eq!(
            resolve_relative(&host, from, "./schema.ts"),
            Some(PathBuf::from("src/schema.ts"))
        );
        assert_eq!(resolve_relative(&host, from, "./missing"), None);
    }
}
