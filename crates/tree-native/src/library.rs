use std::path::Path;

use tree_core::PhotoAsset;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read the preloaded photos from `dir`, sorted by file name, as
/// `static_<n>` assets. Unreadable files are skipped.
pub fn load_static_photos(dir: &Path) -> anyhow::Result<Vec<PhotoAsset>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_image_path(p))
        .collect();
    paths.sort();

    let mut assets = Vec::with_capacity(paths.len());
    for path in paths {
        match std::fs::read(&path) {
            Ok(bytes) => {
                let id = format!("static_{}", assets.len() + 1);
                log::debug!("[photos] {id} <- {}", path.display());
                assets.push(PhotoAsset::new(id, bytes));
            }
            Err(e) => log::warn!("[photos] skipping {}: {e}", path.display()),
        }
    }
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extensions_are_case_insensitive() {
        assert!(is_image_path(Path::new("a/b/photo.JPG")));
        assert!(is_image_path(Path::new("x.webp")));
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("no_extension")));
    }

    #[test]
    fn static_photos_are_numbered_in_name_order() {
        let dir = std::env::temp_dir().join(format!("tree-native-lib-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.png"), b"\x89PNG\r\n\x1a\nrest").unwrap();
        std::fs::write(dir.join("a.jpg"), [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        std::fs::write(dir.join("readme.txt"), b"ignored").unwrap();

        let assets = load_static_photos(&dir).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        let ids: Vec<_> = assets.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["static_1", "static_2"]);
        assert!(assets.iter().all(|a| !a.is_placeholder()));
    }
}
