use std::fs;

use super::args::scan;
use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

#[derive(Clone)]
pub struct MkdirCommand {
    resolver: PathResolver,
}

impl Default for MkdirCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl MkdirCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for MkdirCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        let parsed = scan(args, &[])?;
        let parents = parsed.has('p');

        let paths = parsed.into_operands();
        if paths.is_empty() {
            return Err(CommandError::InvalidArguments(
                "usage: mkdir [-p] directory...".to_string(),
            ));
        }

        for path in &paths {
            let resolved = self
                .resolver
                .resolve(path, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

            let result = if parents {
                fs::create_dir_all(&resolved)
            } else {
                fs::create_dir(&resolved)
            };
            if let Err(e) = result {
                eprintln!(
                    "mkdir: cannot create directory '{}': {}",
                    path,
                    describe_io(&e)
                );
            }
        }
        Ok(())
    }
}
