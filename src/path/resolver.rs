use crate::error::ShellError;
use std::path::{Path, PathBuf};

/// Resolves user-supplied paths against the session's working directory
/// rather than the process working directory.
#[derive(Clone, Copy)]
pub struct PathResolver;

impl Default for PathResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PathResolver {
    pub fn new() -> Self {
        Self
    }

    /// Absolute paths pass through, `~` expands to the home directory,
    /// anything else is joined onto `current_dir`.
    pub fn resolve(&self, path: &str, current_dir: &Path) -> Result<PathBuf, ShellError> {
        if path.starts_with('~') {
            self.expand_tilde(path)
        } else {
            let candidate = Path::new(path);
            if candidate.is_absolute() {
                Ok(candidate.to_path_buf())
            } else {
                Ok(current_dir.join(candidate))
            }
        }
    }

    fn expand_tilde(&self, path: &str) -> Result<PathBuf, ShellError> {
        let home = dirs::home_dir().ok_or(ShellError::HomeDirNotFound)?;
        if path.len() == 1 {
            return Ok(home);
        }

        match path[1..].strip_prefix('/') {
            Some(rest) => {
                let mut expanded = home;
                for part in rest.split('/') {
                    if !part.is_empty() {
                        expanded.push(part);
                    }
                }
                Ok(expanded)
            }
            // "~user/..." is not handled; taken literally
            None => Ok(Path::new(path).to_path_buf()),
        }
    }

    pub fn home_dir(&self) -> Result<PathBuf, ShellError> {
        dirs::home_dir().ok_or(ShellError::HomeDirNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_passthrough() {
        let resolver = PathResolver::new();
        let resolved = resolver.resolve("/usr/bin", Path::new("/tmp")).unwrap();
        assert_eq!(resolved, PathBuf::from("/usr/bin"));
    }

    #[test]
    fn test_relative_joins_current_dir() {
        let resolver = PathResolver::new();
        let resolved = resolver.resolve("sub/file.txt", Path::new("/work")).unwrap();
        assert_eq!(resolved, PathBuf::from("/work/sub/file.txt"));
    }

    #[test]
    fn test_tilde_expands_to_home() {
        let resolver = PathResolver::new();
        let home = dirs::home_dir().unwrap();
        assert_eq!(resolver.resolve("~", Path::new("/tmp")).unwrap(), home);
        assert_eq!(
            resolver.resolve("~/notes", Path::new("/tmp")).unwrap(),
            home.join("notes")
        );
    }

    #[test]
    fn test_tilde_user_taken_literally() {
        let resolver = PathResolver::new();
        let resolved = resolver.resolve("~other/x", Path::new("/tmp")).unwrap();
        assert_eq!(resolved, PathBuf::from("~other/x"));
    }
}
