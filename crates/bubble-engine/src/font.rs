//! Font lookup by file path or face name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ab_glyph::FontArc;
use tracing::{debug, info};

use crate::{BubbleError, Result};

const VALID_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// Directory depth searched below each font directory.
const MAX_SEARCH_DEPTH: usize = 4;

/// Resolves font faces to loaded fonts, caching each face after first use.
#[derive(Clone, Default)]
pub struct FontLibrary {
    search_dirs: Vec<PathBuf>,
    cache: Arc<Mutex<HashMap<String, FontArc>>>,
}

impl FontLibrary {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self {
            search_dirs,
            cache: Arc::default(),
        }
    }

    /// Load the font for `face`, which is either a font file path or a face name.
    pub fn load(&self, face: &str) -> Result<FontArc> {
        if let Some(font) = self
            .cache
            .lock()
            .map_err(|_| BubbleError::Render("font cache lock poisoned".into()))?
            .get(face)
        {
            return Ok(font.clone());
        }

        let path = self
            .resolve(face)
            .ok_or_else(|| BubbleError::FontNotFound(face.to_string()))?;
        let data = std::fs::read(&path)?;
        let font = FontArc::try_from_vec(data)
            .map_err(|_| BubbleError::FontNotFound(format!("{face} ({})", path.display())))?;
        info!(face, path = %path.display(), "Font loaded");

        self.cache
            .lock()
            .map_err(|_| BubbleError::Render("font cache lock poisoned".into()))?
            .insert(face.to_string(), font.clone());
        Ok(font)
    }

    /// Find the font file for a face without loading it.
    pub fn resolve(&self, face: &str) -> Option<PathBuf> {
        let direct = Path::new(face);
        if direct.is_file() && has_font_extension(direct) {
            return Some(direct.to_path_buf());
        }

        let wanted = normalize_name(face);
        for dir in &self.search_dirs {
            if let Some(found) = find_in_dir(dir, &wanted, 0) {
                debug!(face, path = %found.display(), "Resolved font face");
                return Some(found);
            }
        }
        None
    }
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| VALID_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Lowercase and drop separators so "Noto Sans-Bold" matches "notosans_bold".
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn find_in_dir(dir: &Path, wanted: &str, depth: usize) -> Option<PathBuf> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|e| e.path())
        .collect();
    entries.sort();

    let mut subdirs = Vec::new();
    for path in entries {
        if path.is_dir() {
            subdirs.push(path);
        } else if has_font_extension(&path) {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
            if normalize_name(stem) == wanted {
                return Some(path);
            }
        }
    }

    if depth >= MAX_SEARCH_DEPTH {
        return None;
    }
    subdirs
        .iter()
        .find_map(|sub| find_in_dir(sub, wanted, depth + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bubble-engine-font-{}-{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Noto Sans-Bold"), "notosansbold");
        assert_eq!(normalize_name("DejaVu_Sans"), "dejavusans");
    }

    #[test]
    fn test_resolve_by_name_in_nested_dir() {
        let dir = scratch_dir("nested");
        let nested = dir.join("truetype").join("demo");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("Demo-Regular.ttf"), b"not a real font").unwrap();
        std::fs::write(nested.join("readme.txt"), b"ignored").unwrap();

        let lib = FontLibrary::new(vec![dir.clone()]);
        assert_eq!(
            lib.resolve("demo regular"),
            Some(nested.join("Demo-Regular.ttf"))
        );
        assert_eq!(lib.resolve("readme"), None);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_unknown_face_is_font_not_found() {
        let lib = FontLibrary::new(Vec::new());
        assert!(matches!(
            lib.load("No Such Face"),
            Err(BubbleError::FontNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_font_data_is_rejected() {
        let dir = scratch_dir("invalid");
        std::fs::write(dir.join("Broken.ttf"), b"garbage").unwrap();

        let lib = FontLibrary::new(vec![dir.clone()]);
        assert!(matches!(lib.load("Broken"), Err(BubbleError::FontNotFound(_))));

        std::fs::remove_dir_all(dir).unwrap();
    }
}
