use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const CACHE_FILE_NAME: &str = "cards-data.json";

/// Single-entry store for the serialized deck.
///
/// Lives in the XDG runtime directory by default, which is emptied at
/// logout, so a deck survives restarts within a session only.
#[derive(Clone, Debug)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(CACHE_FILE_NAME),
        }
    }

    pub fn in_runtime_dir() -> Self {
        Self::new(&glib::user_runtime_dir().join("naipes"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw bytes of the entry, `None` when nothing has been cached yet.
    pub fn read(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn write(&self, data: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_entry_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(dir.path());
        assert_eq!(cache.read().unwrap(), None);
        cache.clear().unwrap();
    }

    #[test]
    fn write_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SessionCache::new(&dir.path().join("nested").join("naipes"));
        cache.write("{\"cards\":[]}").unwrap();
        assert_eq!(
            cache.read().unwrap().as_deref(),
            Some("{\"cards\":[]}".as_bytes())
        );
        assert!(!cache.path().with_extension("tmp").exists());
    }
}
