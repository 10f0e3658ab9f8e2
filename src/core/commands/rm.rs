use std::fs;
use std::io;

use super::args::scan;
use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

#[derive(Clone)]
pub struct RmCommand {
    resolver: PathResolver,
}

impl Default for RmCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl RmCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for RmCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        let parsed = scan(args, &[])?;
        let recursive = parsed.has('r') || parsed.has('R');
        let force = parsed.has('f');

        let paths = parsed.into_operands();
        if paths.is_empty() {
            return Err(CommandError::InvalidArguments(
                "usage: rm [-r] [-f] file...".to_string(),
            ));
        }

        for path in &paths {
            let resolved = self
                .resolver
                .resolve(path, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

            let meta = match fs::symlink_metadata(&resolved) {
                Ok(meta) => meta,
                Err(e) => {
                    // -f swallows only the missing-file report
                    if !(force && e.kind() == io::ErrorKind::NotFound) {
                        eprintln!("rm: cannot remove '{}': {}", path, describe_io(&e));
                    }
                    continue;
                }
            };

            if meta.is_dir() && !recursive {
                eprintln!("rm: cannot remove '{}': Is a directory", path);
                continue;
            }

            let result = if meta.is_dir() {
                fs::remove_dir_all(&resolved)
            } else {
                fs::remove_file(&resolved)
            };
            if let Err(e) = result {
                eprintln!("rm: cannot remove '{}': {}", path, describe_io(&e));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{scratch_dir, test_session};
    use super::*;

    #[test]
    fn test_rm_file() {
        let dir = scratch_dir("rm_file");
        fs::write(dir.join("gone.txt"), "x").unwrap();

        let mut session = test_session();
        session.enter_directory(dir.clone());
        let cmd = RmCommand::new();

        cmd.execute(&["gone.txt".to_string()], &mut session).unwrap();
        assert!(!dir.join("gone.txt").exists());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_rm_directory_requires_recursive() {
        let dir = scratch_dir("rm_dir");
        fs::create_dir(dir.join("sub")).unwrap();

        let mut session = test_session();
        session.enter_directory(dir.clone());
        let cmd = RmCommand::new();

        cmd.execute(&["sub".to_string()], &mut session).unwrap();
        assert!(dir.join("sub").is_dir());

        cmd.execute(&["-r".to_string(), "sub".to_string()], &mut session)
            .unwrap();
        assert!(!dir.join("sub").exists());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_rm_force_suppresses_missing() {
        let mut session = test_session();
        let cmd = RmCommand::new();
        assert!(cmd
            .execute(
                &["-f".to_string(), "/no/such/file".to_string()],
                &mut session
            )
            .is_ok());
    }

    #[test]
    fn test_rm_no_operand_is_invalid() {
        let mut session = test_session();
        let cmd = RmCommand::new();
        assert!(matches!(
            cmd.execute(&[], &mut session),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
