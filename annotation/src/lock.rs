//! Process-wide advisory write locks, keyed by container path.
//!
//! The lock only coordinates handles within this process. Other processes
//! are free to modify the same file.

use crate::common::*;
use std::sync::MutexGuard;

static WRITERS: Lazy<Mutex<HashSet<PathBuf>>> = Lazy::new(|| Mutex::new(HashSet::new()));

fn writers() -> MutexGuard<'static, HashSet<PathBuf>> {
    WRITERS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resolve a container path to the key under which it is locked.
///
/// The parent directory is canonicalized and must exist. The file itself
/// may be missing.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    let invalid = |reason: String| Error::InvalidPath {
        path: path.to_owned(),
        reason,
    };

    if path.as_os_str().is_empty() {
        return Err(invalid("path is empty".into()));
    }
    if path.is_dir() {
        return Err(invalid("path is a directory".into()));
    }
    let file_name = path
        .file_name()
        .ok_or_else(|| invalid("path has no file name".into()))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = parent
        .canonicalize()
        .map_err(|err| invalid(format!("cannot resolve parent directory: {}", err)))?;

    Ok(parent.join(file_name))
}

/// A held write lock. Released on drop.
#[derive(Debug)]
pub struct WriteLock {
    path: PathBuf,
}

impl WriteLock {
    /// Take the write lock on a resolved path without waiting.
    pub fn acquire(path: &Path) -> Result<Self> {
        if !writers().insert(path.to_owned()) {
            return Err(Error::AlreadyLocked {
                path: path.to_owned(),
            });
        }
        trace!("acquired write lock on {}", path.display());

        Ok(Self {
            path: path.to_owned(),
        })
    }

    pub fn is_held(path: &Path) -> bool {
        writers().contains(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        writers().remove(&self.path);
        trace!("released write lock on {}", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_writer_per_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = resolve_path(&dir.path().join("a.anc")).unwrap();

        let lock = WriteLock::acquire(&path).unwrap();
        assert!(WriteLock::is_held(&path));
        assert!(matches!(
            WriteLock::acquire(&path),
            Err(Error::AlreadyLocked { .. })
        ));

        let other = resolve_path(&dir.path().join("b.anc")).unwrap();
        let _other_lock = WriteLock::acquire(&other).unwrap();

        drop(lock);
        assert!(!WriteLock::is_held(&path));
        let _lock = WriteLock::acquire(&path).unwrap();
    }

    #[test]
    fn equivalent_paths_share_a_key() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        let direct = resolve_path(&sub.join("c.anc")).unwrap();
        let indirect = resolve_path(&sub.join("..").join("sub").join("c.anc")).unwrap();
        assert_eq!(direct, indirect);
    }

    #[test]
    fn invalid_paths() {
        let dir = tempfile::tempdir().unwrap();
        let invalid = |path: &Path| matches!(resolve_path(path), Err(Error::InvalidPath { .. }));

        assert!(invalid(Path::new("")));
        assert!(invalid(dir.path()));
        assert!(invalid(&dir.path().join("missing").join("d.anc")));
    }
}
