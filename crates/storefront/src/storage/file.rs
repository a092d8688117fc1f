//! File-backed storage: one `<key>.json` file per key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{Backend, StorageError};

/// Durable backend storing each key in its own file under a directory.
///
/// Writes go to a temporary file that is renamed over the target, so a
/// reader never sees a half-written value.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Open (and create if needed) the storage directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Backend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        read_optional(&self.path_for(key)?)
    }

    fn replace(&self, key: &str, value: Option<&str>) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let previous = read_optional(&path)?;

        match value {
            Some(value) => {
                let tmp = self.dir.join(format!(".{key}.json.tmp"));
                fs::write(&tmp, value)?;
                fs::rename(&tmp, &path)?;
            }
            None => match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }

        Ok(previous)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let backend = FileBackend::open(dir.path()).unwrap();
        backend.replace("wishlist", Some("[1]")).unwrap();
        drop(backend);

        let reopened = FileBackend::open(dir.path()).unwrap();
        assert_eq!(reopened.read("wishlist").unwrap().as_deref(), Some("[1]"));
        assert!(dir.path().join("wishlist.json").exists());
    }

    #[test]
    fn test_replace_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("nested")).unwrap();

        assert_eq!(backend.replace("k", Some("a")).unwrap(), None);
        assert_eq!(backend.replace("k", Some("b")).unwrap().as_deref(), Some("a"));
        assert_eq!(backend.replace("k", None).unwrap().as_deref(), Some("b"));
        assert_eq!(backend.replace("k", None).unwrap(), None);
        assert_eq!(backend.read("k").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(
                matches!(backend.read(key), Err(StorageError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
    }
}
