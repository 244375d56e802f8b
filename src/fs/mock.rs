// src/fs/mock.rs

//! In-memory [`FileSystem`] with directory symlinks, for discovery tests.
//!
//! Paths are keyed without `.` components, so `"./a/b"` and `"a/b"` name the
//! same entry and `"."` is the root of a relative tree.

use super::FileSystem;
use anyhow::{anyhow, bail, Result};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

const MAX_SYMLINK_DEPTH: usize = 40;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // child names, insertion order
    Symlink(PathBuf), // target, relative to the link's parent unless absolute
}

#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

fn key(path: &Path) -> PathBuf {
    let stripped: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if stripped.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        stripped
    }
}

fn parent_key(path: &Path) -> Option<PathBuf> {
    let parent = path.parent()?;
    let parent = key(parent);
    if parent == path { None } else { Some(parent) }
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.entries.lock().expect("mock filesystem lock poisoned")
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = key(path.as_ref());
        let mut entries = self.lock();
        Self::insert_child(&mut entries, &path, MockEntry::File(content.into()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = key(path.as_ref());
        let mut entries = self.lock();
        Self::ensure_dir(&mut entries, &path);
    }

    /// Create a symlink at `link` pointing to `target`.
    pub fn add_symlink(&self, link: impl AsRef<Path>, target: impl AsRef<Path>) {
        let link = key(link.as_ref());
        let mut entries = self.lock();
        Self::insert_child(
            &mut entries,
            &link,
            MockEntry::Symlink(target.as_ref().to_path_buf()),
        );
    }

    fn insert_child(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path, entry: MockEntry) {
        entries.insert(path.to_path_buf(), entry);
        if let Some(parent) = parent_key(path) {
            Self::ensure_dir(entries, &parent);
            Self::register_child(entries, &parent, path);
        }
    }

    fn ensure_dir(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if entries.contains_key(path) {
            return;
        }
        entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        if let Some(parent) = parent_key(path) {
            Self::ensure_dir(entries, &parent);
            Self::register_child(entries, &parent, path);
        }
    }

    fn register_child(entries: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
        let Some(name) = child.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }

    /// Resolve every symlink along `path`, returning the key of the real entry.
    fn resolve(entries: &HashMap<PathBuf, MockEntry>, path: &Path, depth: usize) -> Result<PathBuf> {
        if depth > MAX_SYMLINK_DEPTH {
            bail!("too many levels of symbolic links: {:?}", path);
        }

        let mut cur = PathBuf::new();
        for comp in key(path).components() {
            match comp {
                Component::CurDir => {}
                Component::ParentDir => {
                    cur.pop();
                }
                other => {
                    cur.push(other.as_os_str());
                    if let Some(MockEntry::Symlink(target)) = entries.get(&key(&cur)) {
                        let joined = if target.is_absolute() {
                            target.clone()
                        } else {
                            cur.parent().map(Path::to_path_buf).unwrap_or_default().join(target)
                        };
                        cur = Self::resolve(entries, &joined, depth + 1)?;
                    }
                }
            }
        }

        Ok(key(&cur))
    }

    fn lookup(&self, path: &Path) -> Result<(PathBuf, MockEntry)> {
        let entries = self.lock();
        let resolved = Self::resolve(&entries, path, 0)?;
        match entries.get(&resolved) {
            Some(entry) => Ok((resolved, entry.clone())),
            None => Err(anyhow!("No such file or directory: {:?}", path)),
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        match self.lookup(path)? {
            (_, MockEntry::File(content)) => {
                String::from_utf8(content).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            _ => Err(anyhow!("Is a directory: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lookup(path).is_ok()
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lookup(path), Ok((_, MockEntry::File(_))))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lookup(path), Ok((_, MockEntry::Dir(_))))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        self.lookup(path).map(|(resolved, _)| resolved)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.lookup(path)? {
            (_, MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory: {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_create_parent_dirs() {
        let fs = MockFileSystem::new();
        fs.add_file("./repo/a/Cargo.toml", "[package]");

        assert!(fs.is_dir(Path::new("repo")));
        assert!(fs.is_dir(Path::new("./repo/a")));
        assert!(fs.is_file(Path::new("repo/a/Cargo.toml")));
        assert_eq!(
            fs.read_dir(Path::new("repo")).unwrap(),
            vec![PathBuf::from("repo/a")]
        );
    }

    #[test]
    fn symlinks_resolve_through_canonicalize() {
        let fs = MockFileSystem::new();
        fs.add_file("repo/a/Cargo.toml", "");
        fs.add_symlink("repo/a/loop", "..");

        assert!(fs.is_dir(Path::new("repo/a/loop")));
        assert!(fs.is_dir(Path::new("repo/a/loop/a/loop")));
        assert_eq!(
            fs.canonicalize(Path::new("repo/a/loop/a")).unwrap(),
            PathBuf::from("repo/a")
        );
    }

    #[test]
    fn self_referencing_symlink_errors_instead_of_looping() {
        let fs = MockFileSystem::new();
        fs.add_symlink("repo/me", "me");

        assert!(fs.canonicalize(Path::new("repo/me")).is_err());
        assert!(!fs.exists(Path::new("repo/me")));
    }
}
