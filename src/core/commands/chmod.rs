use std::fs;
use std::os::unix::fs::PermissionsExt;

use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

const EXEC_BITS: u32 = 0o111;

#[derive(Clone)]
pub struct ChmodCommand {
    resolver: PathResolver,
}

impl Default for ChmodCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ChmodCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for ChmodCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        if args.len() < 2 {
            return Err(CommandError::InvalidArguments(
                "usage: chmod mode file...".to_string(),
            ));
        }

        let mode = &args[0];
        let octal = if mode.starts_with('+') {
            // only "+x" is understood in symbolic form
            if !mode.contains('x') {
                return Err(CommandError::InvalidArguments(format!(
                    "invalid mode: '{}'",
                    mode
                )));
            }
            None
        } else {
            Some(u32::from_str_radix(mode, 8).map_err(|_| {
                CommandError::InvalidArguments(format!("invalid mode: '{}'", mode))
            })?)
        };

        for filename in &args[1..] {
            let resolved = self
                .resolver
                .resolve(filename, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

            let new_mode = match octal {
                Some(bits) => bits,
                None => match fs::metadata(&resolved) {
                    Ok(meta) => meta.permissions().mode() | EXEC_BITS,
                    Err(e) => {
                        eprintln!("chmod: cannot access '{}': {}", filename, describe_io(&e));
                        continue;
                    }
                },
            };

            if let Err(e) =
                fs::set_permissions(&resolved, fs::Permissions::from_mode(new_mode))
            {
                eprintln!(
                    "chmod: changing permissions of '{}': {}",
                    filename,
                    describe_io(&e)
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{scratch_dir, test_session};
    use super::*;

    fn mode_of(path: &std::path::Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn test_chmod_octal() {
        let dir = scratch_dir("chmod_octal");
        let file = dir.join("f");
        fs::write(&file, "x").unwrap();

        let mut session = test_session();
        session.enter_directory(dir.clone());
        let cmd = ChmodCommand::new();

        cmd.execute(&["600".to_string(), "f".to_string()], &mut session)
            .unwrap();
        assert_eq!(mode_of(&file), 0o600);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_chmod_plus_x() {
        let dir = scratch_dir("chmod_plusx");
        let file = dir.join("script");
        fs::write(&file, "x").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();

        let mut session = test_session();
        session.enter_directory(dir.clone());
        let cmd = ChmodCommand::new();

        cmd.execute(&["+x".to_string(), "script".to_string()], &mut session)
            .unwrap();
        assert_eq!(mode_of(&file), 0o755);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_chmod_invalid_mode() {
        let mut session = test_session();
        let cmd = ChmodCommand::new();
        assert!(matches!(
            cmd.execute(&["zzz".to_string(), "f".to_string()], &mut session),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_chmod_missing_file_is_reported_not_fatal() {
        let mut session = test_session();
        let cmd = ChmodCommand::new();
        assert!(cmd
            .execute(
                &["644".to_string(), "/no/such/file".to_string()],
                &mut session
            )
            .is_ok());
    }
}
