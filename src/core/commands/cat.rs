use std::fs;
use std::io::Write;

use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

#[derive(Clone)]
pub struct CatCommand {
    resolver: PathResolver,
}

impl Default for CatCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CatCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for CatCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        if args.is_empty() {
            return Err(CommandError::InvalidArguments(
                "usage: cat file...".to_string(),
            ));
        }

        for filename in args {
            let resolved = self
                .resolver
                .resolve(filename, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

            // raw bytes, so the output is exactly the file content
            match fs::read(&resolved) {
                Ok(bytes) => {
                    let mut stdout = std::io::stdout();
                    stdout.write_all(&bytes)?;
                    stdout.flush()?;
                }
                Err(e) => eprintln!("cat: {}: {}", filename, describe_io(&e)),
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
    fn test_execute_prints_file() {
        let dir = scratch_dir("cat_exec");
        fs::write(dir.join("f.txt"), "hello\nworld\n").unwrap();

        let mut session = test_session();
        session.enter_directory(dir.clone());
        let cmd = CatCommand::new();
        assert!(cmd.execute(&["f.txt".to_string()], &mut session).is_ok());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_execute_directory_is_reported_not_fatal() {
        let dir = scratch_dir("cat_dir");
        let mut session = test_session();
        session.enter_directory(dir.clone());

        let cmd = CatCommand::new();
        assert!(cmd.execute(&[".".to_string()], &mut session).is_ok());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_execute_no_args_is_invalid() {
        let mut session = test_session();
        let cmd = CatCommand::new();
        assert!(matches!(
            cmd.execute(&[], &mut session),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
