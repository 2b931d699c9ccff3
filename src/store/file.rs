use std::path::PathBuf;

use tracing::debug;

use super::{KeyValueStore, StoreError};

/// Store that keeps each key in its own JSON file under `base_dir`.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a new store rooted at `base_dir`. The directory is created on first write.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key);
        match std::fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.base_dir)?;
        let path = self.key_path(key);
        // Written beside the target, then renamed into place.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = value.len(), "Saved key");
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
