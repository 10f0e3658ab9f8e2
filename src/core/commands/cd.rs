use std::fs;

use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

#[derive(Clone)]
pub struct CdCommand {
    resolver: PathResolver,
}

impl Default for CdCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CdCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for CdCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        let target = match args.first().map(String::as_str) {
            None => self
                .resolver
                .home_dir()
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?,
            Some("-") => match session.previous_dir() {
                Some(prev) => prev.to_path_buf(),
                None => {
                    eprintln!("cd: no previous directory");
                    return Ok(());
                }
            },
            Some(path) => self
                .resolver
                .resolve(path, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?,
        };

        // Canonicalize so "a/.." collapses; the session keeps its old
        // directory on any failure.
        match fs::canonicalize(&target) {
            Ok(canonical) if canonical.is_dir() => {
                session.enter_directory(canonical);
            }
            Ok(_) => eprintln!("cd: {}: Not a directory", target.display()),
            Err(e) => eprintln!("cd: {}: {}", target.display(), describe_io(&e)),
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct PwdCommand;

impl Default for PwdCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl PwdCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for PwdCommand {
    fn execute(&self, _args: &[String], session: &mut Session) -> Result<(), CommandError> {
        println!("{}", session.current_dir().display());
        Ok(())
    }
}
