//! Photo assets and the persistence collaborator that owns user photos.
//!
//! Image bytes are never decoded here. They are sniffed for a known container
//! signature so renderers can fall back to a placeholder frame.

use std::sync::Arc;

use crate::error::StoreError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Bmp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    Image(ImageFormat),
    Placeholder,
}

#[derive(Clone, Debug)]
pub struct PhotoAsset {
    pub id: String,
    pub status: AssetStatus,
    pub bytes: Arc<[u8]>,
}

impl PhotoAsset {
    pub fn new(id: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let id = id.into();
        let bytes = bytes.into();
        let status = match sniff_format(&bytes) {
            Some(format) => AssetStatus::Image(format),
            None => {
                log::warn!(
                    "[photos] {} is not a recognised image ({} bytes); using placeholder",
                    id,
                    bytes.len()
                );
                AssetStatus::Placeholder
            }
        };
        Self { id, status, bytes }
    }

    /// Framed card shown when no photo has been provided at all.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: AssetStatus::Placeholder,
            bytes: Arc::from(Vec::<u8>::new()),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.status == AssetStatus::Placeholder
    }
}

pub fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some(ImageFormat::Png)
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageFormat::Jpeg)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(ImageFormat::Gif)
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some(ImageFormat::WebP)
    } else if bytes.starts_with(b"BM") && bytes.len() > 14 {
        Some(ImageFormat::Bmp)
    } else {
        None
    }
}

/// Storage for user-provided photos. The scene calls it only when the photo
/// population changes.
pub trait PhotoStore {
    fn add_object(&mut self, id: &str, image: &[u8]) -> Result<(), StoreError>;
    fn remove_object(&mut self, id: &str) -> Result<(), StoreError>;
    fn list_objects(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError>;
}

/// Insertion-ordered in-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryPhotoStore {
    entries: Vec<(String, Vec<u8>)>,
}

impl MemoryPhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == id)
    }
}

impl PhotoStore for MemoryPhotoStore {
    fn add_object(&mut self, id: &str, image: &[u8]) -> Result<(), StoreError> {
        match self.entries.iter_mut().find(|(k, _)| k == id) {
            Some(entry) => entry.1 = image.to_vec(),
            None => self.entries.push((id.to_string(), image.to_vec())),
        }
        Ok(())
    }

    fn remove_object(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != id);
        if self.entries.len() == before {
            return Err(StoreError::Missing(id.to_string()));
        }
        Ok(())
    }

    fn list_objects(&self) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        Ok(self.entries.clone())
    }
}
