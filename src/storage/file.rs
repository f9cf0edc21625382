use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::CartStorage;
use crate::Result;

/// One `<key>.json` file per record inside a directory.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the record, so a reader only ever sees the previous or the new
/// contents. A write that cannot be renamed into place leaves no file behind.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

    pub fn dir(&self) -> &Path { &self.dir }

    pub fn record_path(&self, key: &str) -> PathBuf { self.dir.join(format!("{key}.json")) }
}

impl CartStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.record_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(self.record_path(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.load("hd-store-cart").unwrap(), None);
    }

    #[test]
    fn test_save_creates_directory_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));
        storage.save("hd-store-cart", "first").unwrap();
        storage.save("hd-store-cart", "second").unwrap();
        assert_eq!(storage.load("hd-store-cart").unwrap().as_deref(), Some("second"));
        assert_eq!(entries(storage.dir()), vec!["hd-store-cart.json"]);
    }

    #[test]
    fn test_failed_replace_leaves_no_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        // A non-empty directory where the record should be cannot be renamed over.
        let blocker = storage.record_path("hd-store-cart");
        std::fs::create_dir_all(blocker.join("inner")).unwrap();

        assert!(storage.save("hd-store-cart", "{}").is_err());
        assert_eq!(entries(dir.path()), vec!["hd-store-cart.json"]);
        assert!(blocker.is_dir());
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir).unwrap().map(|e| e.unwrap().file_name().to_string_lossy().into_owned()).collect();
        names.sort();
        names
    }
}
