use std::path::{Path, PathBuf};

/// Normalize a path for display (strip Windows long-path prefixes).
pub fn display_path(path: &Path) -> String {
    let path_str = path.to_string_lossy().to_string();
    #[cfg(windows)]
    {
        if let Some(stripped) = path_str.strip_prefix(r"\\?\UNC\") {
            return format!(r"\\{}", stripped);
        }
        if let Some(stripped) = path_str.strip_prefix(r"\\?\") {
            return stripped.to_string();
        }
    }
    path_str
}

/// Make a path absolute without touching the filesystem
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

/// Cache key for a document path.
///
/// Canonical form when the file exists (resolves `..` and symlinks), plain
/// absolute form otherwise. On Windows separators are unified to `/` and the
/// key is lowercased for case-insensitive matching; elsewhere `\` is an
/// ordinary file name character and is kept.
pub fn cache_key(path: &Path) -> String {
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| absolute_path(path));
    let key = display_path(&resolved);
    #[cfg(windows)]
    {
        key.replace('\\', "/").to_lowercase()
    }
    #[cfg(not(windows))]
    {
        key
    }
}

/// True when the file name ends with `.<extension>` (case-sensitive)
pub fn has_extension(name: &str, extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    name.len() > extension.len()
        && name.ends_with(extension)
        && name[..name.len() - extension.len()].ends_with('.')
}

/// Safe metadata that falls back to long path on Windows when normal access fails
///
/// Handles ERROR_PATH_NOT_FOUND (3) which occurs when paths exceed 260 chars
#[cfg(windows)]
pub fn safe_metadata(path: &Path) -> std::io::Result<std::fs::Metadata> {
    match std::fs::metadata(path) {
        Ok(m) => Ok(m),
        Err(e) if e.raw_os_error() == Some(3) => std::fs::metadata(to_long_path(path)),
        Err(e) => Err(e),
    }
}

#[cfg(not(windows))]
pub fn safe_metadata(path: &Path) -> std::io::Result<std::fs::Metadata> {
    std::fs::metadata(path)
}

/// Safe read_dir that falls back to long path on Windows
#[cfg(windows)]
pub fn safe_read_dir(path: &Path) -> std::io::Result<std::fs::ReadDir> {
    match std::fs::read_dir(path) {
        Ok(rd) => Ok(rd),
        Err(e) if e.raw_os_error() == Some(3) => std::fs::read_dir(to_long_path(path)),
        Err(e) => Err(e),
    }
}

#[cfg(not(windows))]
pub fn safe_read_dir(path: &Path) -> std::io::Result<std::fs::ReadDir> {
    std::fs::read_dir(path)
}

/// Convert to long path format for Windows (\\?\)
#[cfg(windows)]
fn to_long_path(path: &Path) -> PathBuf {
    let absolute = absolute_path(path);
    match absolute.to_str() {
        Some(s) if s.starts_with(r"\\?\") => absolute,
        Some(s) => PathBuf::from(format!(r"\\?\{}", s)),
        None => absolute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_has_extension() {
        assert!(has_extension("report.pdf", "pdf"));
        assert!(has_extension("report.pdf", ".pdf"));
        assert!(has_extension("archive.tar.pdf", "pdf"));
        assert!(!has_extension("report.PDF", "pdf"));
        assert!(!has_extension("reportpdf", "pdf"));
        assert!(!has_extension("pdf", "pdf"));
        assert!(!has_extension("report.pdf.bak", "pdf"));
    }

    #[test]
    fn test_cache_key_resolves_dot_segments() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let file = temp_dir.path().join("a.pdf");
        fs::write(&file, b"x").unwrap();

        let indirect = sub.join("..").join("a.pdf");
        assert_eq!(cache_key(&file), cache_key(&indirect));
    }

    #[cfg(windows)]
    #[test]
    fn test_cache_key_uses_forward_slashes() {
        let temp_dir = TempDir::new().unwrap();
        let key = cache_key(&temp_dir.path().join("missing.pdf"));
        assert!(!key.contains('\\'));
        assert!(key.ends_with("/missing.pdf"));
    }

    #[cfg(unix)]
    #[test]
    fn test_cache_key_keeps_backslash_in_name() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("a");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("b.pdf"), b"x").unwrap();
        fs::write(temp_dir.path().join("a\\b.pdf"), b"y").unwrap();

        let nested = cache_key(&sub.join("b.pdf"));
        let escaped = cache_key(&temp_dir.path().join("a\\b.pdf"));
        assert_ne!(nested, escaped);
        assert!(escaped.ends_with("a\\b.pdf"));
    }

    #[test]
    fn test_absolute_path_keeps_absolute() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(absolute_path(temp_dir.path()), temp_dir.path());
        assert!(absolute_path(Path::new("relative.pdf")).is_absolute());
    }
}
