//! Photo store backed by a directory, one file per photo id.

use std::io;
use std::path::PathBuf;

use tree_core::{PhotoStore, StoreError};

const EXTENSION: &str = "photo";

pub struct DirPhotoStore {
    dir: PathBuf,
}

impl DirPhotoStore {
    /// Open the store at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        log::info!("[photos] store at {}", dir.display());
        Ok(Self { dir })
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::Unavailable(format!("unsupported photo id {id:?}")));
        }
        Ok(self.dir.join(format!("{id}.{EXTENSION}")))
    }
}

impl PhotoStore for DirPhotoStore {
    fn add_object(&mut self, id: &str, image: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        // list_objects never sees a partially written photo
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, image)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_object(&mut self, id: &str) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::Missing(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Stored photos in id order.
    fn list_objects(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            entries.push((id.to_string(), std::fs::read(&path)?));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}
