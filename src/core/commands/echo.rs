use super::{Command, CommandError};
use crate::core::Session;

/// Joins arguments with single spaces. An argument of the form `$NAME`
/// is replaced by the session environment value, or the empty string
/// when unset; substitution applies to whole arguments only.
fn expand_args(args: &[String], session: &Session) -> String {
    args.iter()
        .map(|arg| match arg.strip_prefix('$') {
            Some(name) => session.env_get(name).unwrap_or(""),
            None => arg.as_str(),
        })
        .collect::<Vec<&str>>()
        .join(" ")
}

#[derive(Clone)]
pub struct EchoCommand;

impl Default for EchoCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl EchoCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for EchoCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        println!("{}", expand_args(args, session));
        Ok(())
    }
}
