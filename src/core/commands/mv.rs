use std::fs;

use super::args::scan;
use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

#[derive(Clone)]
pub struct MvCommand {
    resolver: PathResolver,
}

impl Default for MvCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl MvCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for MvCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        let parsed = scan(args, &[])?;
        let operands = parsed.into_operands();
        if operands.len() < 2 {
            return Err(CommandError::InvalidArguments(
                "usage: mv source... destination".to_string(),
            ));
        }

        let (sources, dest) = operands.split_at(operands.len() - 1);
        let dest_base = self
            .resolver
            .resolve(&dest[0], session.current_dir())
            .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

        for src in sources {
            let src_path = self
                .resolver
                .resolve(src, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

            let mut dest_path = dest_base.clone();
            if dest_path.is_dir() {
                if let Some(name) = src_path.file_name() {
                    dest_path.push(name);
                }
            }

            if let Err(e) = fs::rename(&src_path, &dest_path) {
                eprintln!("mv: cannot move '{}': {}", src, describe_io(&e));
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
    fn test_mv_renames_file() {
        let dir = scratch_dir("mv_rename");
        fs::write(dir.join("old.txt"), "data").unwrap();

        let mut session = test_session();
        session.enter_directory(dir.clone());
        let cmd = MvCommand::new();

        cmd.execute(
            &["old.txt".to_string(), "new.txt".to_string()],
            &mut session,
        )
        .unwrap();
        assert!(!dir.join("old.txt").exists());
        assert_eq!(fs::read_to_string(dir.join("new.txt")).unwrap(), "data");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_mv_into_directory_appends_name() {
        let dir = scratch_dir("mv_into_dir");
        fs::write(dir.join("file.txt"), "data").unwrap();
        fs::create_dir(dir.join("target")).unwrap();

        let mut session = test_session();
        session.enter_directory(dir.clone());
        let cmd = MvCommand::new();

        cmd.execute(
            &["file.txt".to_string(), "target".to_string()],
            &mut session,
        )
        .unwrap();
        assert!(dir.join("target/file.txt").is_file());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_mv_missing_source_is_reported_not_fatal() {
        let dir = scratch_dir("mv_missing");
        let mut session = test_session();
        session.enter_directory(dir.clone());

        let cmd = MvCommand::new();
        assert!(cmd
            .execute(&["ghost".to_string(), "dst".to_string()], &mut session)
            .is_ok());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_mv_too_few_operands() {
        let mut session = test_session();
        let cmd = MvCommand::new();
        assert!(matches!(
            cmd.execute(&["only".to_string()], &mut session),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
