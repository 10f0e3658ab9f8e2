use super::{Command, CommandError};
use crate::core::Session;

fn print_environment(session: &Session) {
    for (name, value) in session.env_iter() {
        println!("{}={}", name, value);
    }
}

#[derive(Clone)]
pub struct EnvCommand;

impl Default for EnvCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for EnvCommand {
    fn execute(&self, _args: &[String], session: &mut Session) -> Result<(), CommandError> {
        print_environment(session);
        Ok(())
    }
}

/// `export NAME=VALUE` mutates the session environment; with no
/// arguments it prints it, like `env`. Arguments without `=` are
/// ignored.
#[derive(Clone)]
pub struct ExportCommand;

impl Default for ExportCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExportCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        if args.is_empty() {
            print_environment(session);
            return Ok(());
        }

        for arg in args {
            if let Some((name, value)) = arg.split_once('=') {
                session.env_set(name.trim(), value);
            }
        }
        Ok(())
    }
}
