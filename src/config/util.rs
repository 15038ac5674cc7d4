//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Returns the first `start/../config_name` that exists. An absolute
/// `config_name` is only checked as is.
///
/// # Example
/// ```text
/// /home/user/icons/brand/   ← start
/// /home/user/icons/tinct.toml ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("icons/brand");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("tinct.toml"), "").unwrap();

        let found = find_config_file(&nested, Path::new("tinct.toml")).unwrap();
        assert_eq!(found, dir.path().join("tinct.toml"));
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(find_config_file(dir.path(), &path), None);

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(Path::new("/"), &path), Some(path));
    }
}
