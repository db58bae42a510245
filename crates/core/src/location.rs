//! Path string to native URL

use std::path::Path;

use url::Url;

use crate::error::{Error, Result};

/// Turn a path or URL string into a URL
///
/// Absolute URLs are kept as given; anything else is a filesystem path,
/// resolved against the working directory.
pub fn path_to_url(path: &str) -> Result<Url> {
    if path.is_empty() {
        return Err(Error::InvalidPath("empty path".to_string()));
    }

    // Single-letter schemes are drive letters, not URLs.
    if let Ok(url) = Url::parse(path) {
        if url.scheme().len() > 1 {
            return Ok(url);
        }
    }

    let path = Path::new(path);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| Error::InvalidPath(format!("{}: {}", path.display(), e)))?
            .join(path)
    };

    Url::from_file_path(&absolute)
        .map_err(|()| Error::InvalidPath(absolute.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_kept() {
        let url = path_to_url("https://example.com/model.bin").unwrap();
        assert_eq!(url.as_str(), "https://example.com/model.bin");
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_path() {
        let url = path_to_url("/tmp/my model.pkg").unwrap();
        assert_eq!(url.scheme(), "file");
        assert_eq!(url.path(), "/tmp/my%20model.pkg");
    }

    #[test]
    fn test_relative_path_is_resolved() {
        let url = path_to_url("model.pkg").unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("/model.pkg"));
    }

    #[test]
    fn test_empty_path() {
        assert!(matches!(path_to_url(""), Err(Error::InvalidPath(_))));
    }
}
