//! Default values and environment keys.

use std::path::PathBuf;

/// Extra font directories, separated like `PATH`.
pub const ENV_FONT_DIRS: &str = "SPEECH_BUBBLE_FONT_DIRS";
/// `native` or `magick`.
pub const ENV_BACKEND: &str = "SPEECH_BUBBLE_BACKEND";
/// ImageMagick program used by the `magick` backend.
pub const ENV_MAGICK: &str = "SPEECH_BUBBLE_MAGICK";

/// Output name for the caption at `index`: `000.png`, `001.png`, ...
pub fn caption_output_name(index: usize) -> String {
    format!("{index:03}.png")
}

/// Output name for an overlaid frame file.
pub fn overlay_output_name(frame_file_name: &str) -> String {
    format!("output_{frame_file_name}")
}

/// Font directories searched after any configured ones.
pub fn default_font_dirs() -> Vec<PathBuf> {
    let mut dirs_out = Vec::new();
    if let Some(dir) = dirs::font_dir() {
        dirs_out.push(dir);
    }
    if let Some(home) = dirs::home_dir() {
        dirs_out.push(home.join(".fonts"));
    }
    if let Some(data) = dirs::data_local_dir() {
        dirs_out.push(data.join("fonts"));
    }

    let system: &[&str] = if cfg!(target_os = "macos") {
        &["/Library/Fonts", "/System/Library/Fonts"]
    } else if cfg!(windows) {
        &["C:\\Windows\\Fonts"]
    } else {
        &["/usr/local/share/fonts", "/usr/share/fonts"]
    };
    dirs_out.extend(system.iter().map(PathBuf::from));
    dirs_out.dedup();
    dirs_out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_output_name_is_zero_padded() {
        assert_eq!(caption_output_name(0), "000.png");
        assert_eq!(caption_output_name(42), "042.png");
        assert_eq!(caption_output_name(1234), "1234.png");
    }

    #[test]
    fn test_overlay_output_name() {
        assert_eq!(overlay_output_name("007.png"), "output_007.png");
    }

    #[test]
    fn test_default_font_dirs_not_empty() {
        assert!(!default_font_dirs().is_empty());
    }
}
