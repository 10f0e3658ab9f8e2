use super::{Command, CommandError};
use crate::core::Session;

const SHOWN_ENTRIES: usize = 20;

#[derive(Clone)]
pub struct HistoryCommand;

impl Default for HistoryCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for HistoryCommand {
    fn execute(&self, _args: &[String], session: &mut Session) -> Result<(), CommandError> {
        let history = session.history();
        let start = history.len().saturating_sub(SHOWN_ENTRIES);
        for (i, line) in history[start..].iter().enumerate() {
            println!("{:>5}  {}", i + 1, line);
        }
        Ok(())
    }
}
