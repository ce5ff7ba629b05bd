// File-backed storage: one JSON object of string keys to string values.
//
// Every batch rewrites the whole file through a temp file in the same
// directory followed by a rename, so readers in this or another process
// see the old file or the new one, never a torn write.

use std::collections::HashMap;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{DurableStorage, StorageBatch};

pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole map. Missing or unreadable files read as empty.
    fn read_map(&self) -> HashMap<String, String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read session file");
                return HashMap::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "session file is corrupt, ignoring");
            HashMap::new()
        })
    }

    fn write_map(&self, map: &HashMap<String, String>) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        restrict_permissions(tmp.as_file())?;
        serde_json::to_writer_pretty(&mut tmp, map)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &std::fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &std::fs::File) -> io::Result<()> {
    Ok(())
}

impl DurableStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.read_map().remove(key)
    }

    fn get_items(&self, keys: &[&str]) -> Vec<Option<String>> {
        let mut map = self.read_map();
        keys.iter().map(|k| map.remove(*k)).collect()
    }

    fn apply(&self, batch: StorageBatch) {
        if batch.is_empty() {
            return;
        }
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut map = self.read_map();
        batch.apply_to(&mut map);

        match self.write_map(&map) {
            Ok(()) => debug!(path = %self.path.display(), keys = map.len(), "session file written"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "cannot write session file"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStorage::new(&path);
        assert_eq!(store.get_item("auth_token"), None);

        store.apply(
            StorageBatch::new()
                .set("auth_token", "tok")
                .set("current_user", r#"{"id":1}"#),
        );
        assert!(path.exists());

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("auth_token").as_deref(), Some("tok"));

        reopened.remove_item("auth_token");
        assert_eq!(store.get_item("auth_token"), None);
        assert_eq!(store.get_item("current_user").as_deref(), Some(r#"{"id":1}"#));
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStorage::new(&path);
        assert_eq!(store.get_items(&["auth_token", "current_user"]), vec![None, None]);

        // A write replaces the corrupt file wholesale.
        store.set_item("auth_token", "fresh");
        assert_eq!(store.get_item("auth_token").as_deref(), Some("fresh"));
    }

    #[cfg(unix)]
    #[test]
    fn file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileStorage::new(&path).set_item("auth_token", "t");

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
