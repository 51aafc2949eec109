//! Wallpaper image discovery and validation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;

/// Supported image file extensions (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Errors raised when an image cannot be used as a wallpaper.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The file could not be opened or read.
    #[error("Failed to read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The file is not a decodable image.
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Checks if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Lists the regular files in `dir` with a supported image extension.
///
/// The result is in directory order; callers sort it as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_images_in_directory(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.is_file() && is_supported_image(&path) {
            images.push(path);
        }
    }

    Ok(images)
}

/// Checks that the file decodes as an image.
///
/// The whole image is decoded, so truncated files are rejected too. The
/// format is sniffed from the content rather than trusted from the extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn validate_image(path: &Path) -> Result<(), ImageError> {
    let read_err = |source| ImageError::Read { path: path.display().to_string(), source };

    ImageReader::open(path)
        .map_err(read_err)?
        .with_guessed_format()
        .map_err(read_err)?
        .decode()
        .map_err(|source| ImageError::Decode { path: path.display().to_string(), source })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(4, 3, Rgb([10, 20, 30]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();
        path
    }

    // ========================================================================
    // is_supported_image tests
    // ========================================================================

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("test.png")));
        assert!(is_supported_image(Path::new("test.jpg")));
        assert!(is_supported_image(Path::new("test.jpeg")));
        assert!(is_supported_image(Path::new("test.bmp")));
        assert!(is_supported_image(Path::new("test.gif")));
        assert!(!is_supported_image(Path::new("test.webp")));
        assert!(!is_supported_image(Path::new("test.tiff")));
        assert!(!is_supported_image(Path::new("test.txt")));
    }

    #[test]
    fn test_is_supported_image_mixed_case() {
        assert!(is_supported_image(Path::new("Sunset.PNG")));
        assert!(is_supported_image(Path::new("beach.JpEg")));
    }

    #[test]
    fn test_is_supported_image_no_extension() {
        assert!(!is_supported_image(Path::new("png")));
        assert!(!is_supported_image(Path::new(".png")));
    }

    #[test]
    fn test_is_supported_image_double_extension() {
        assert!(is_supported_image(Path::new("archive.tar.png")));
        assert!(!is_supported_image(Path::new("image.png.bak")));
    }

    #[test]
    fn test_supported_extensions_are_lowercase() {
        for ext in SUPPORTED_EXTENSIONS {
            assert_eq!(*ext, ext.to_lowercase());
        }
    }

    // ========================================================================
    // list_images_in_directory tests
    // ========================================================================

    #[test]
    fn test_list_images_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png");
        fs::write(dir.path().join("B.JPG"), b"jpeg").unwrap();
        fs::write(dir.path().join("notes.txt"), b"text").unwrap();

        let mut names: Vec<String> = list_images_in_directory(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["B.JPG", "a.png"]);
    }

    #[test]
    fn test_list_images_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("folder.png")).unwrap();
        assert!(list_images_in_directory(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_list_images_missing_directory_is_error() {
        let result = list_images_in_directory(Path::new("/nonexistent/wallpapers"));
        assert!(result.is_err());
    }

    // ========================================================================
    // validate_image tests
    // ========================================================================

    #[test]
    fn test_validate_image_accepts_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "ok.png");
        assert!(validate_image(&path).is_ok());
    }

    #[test]
    fn test_validate_image_sniffs_content_over_extension() {
        let dir = tempfile::tempdir().unwrap();
        let png = write_png(dir.path(), "real.png");
        let renamed = dir.path().join("actually_png.jpg");
        fs::rename(&png, &renamed).unwrap();
        assert!(validate_image(&renamed).is_ok());
    }

    #[test]
    fn test_validate_image_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not an image").unwrap();
        assert!(matches!(validate_image(&path), Err(ImageError::Decode { .. })));
    }

    #[test]
    fn test_validate_image_rejects_truncated_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "truncated.png");
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
        assert!(validate_image(&path).is_err());
    }

    #[test]
    fn test_validate_image_missing_file_is_read_error() {
        let result = validate_image(Path::new("/nonexistent/missing.png"));
        assert!(matches!(result, Err(ImageError::Read { .. })));
    }

    #[test]
    fn test_image_error_display_includes_path() {
        let err = ImageError::Read {
            path: "C:/walls/a.png".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read image"));
        assert!(msg.contains("C:/walls/a.png"));
    }
}
