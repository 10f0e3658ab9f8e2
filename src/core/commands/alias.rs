use super::{Command, CommandError};
use crate::core::Session;

fn strip_quotes(value: &str) -> &str {
    if (value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2)
        || (value.starts_with('"') && value.ends_with('"') && value.len() >= 2)
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[derive(Clone)]
pub struct AliasCommand;

impl Default for AliasCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl AliasCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for AliasCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        if args.is_empty() {
            for (name, expansion) in session.aliases() {
                println!("alias {}='{}'", name, expansion);
            }
            return Ok(());
        }

        // re-join so an expansion containing spaces survives tokenizing
        let joined = args.join(" ");
        if let Some((name, expansion)) = joined.split_once('=') {
            let name = name.trim();
            if name.is_empty() {
                return Err(CommandError::InvalidArguments(
                    "usage: alias name='command'".to_string(),
                ));
            }
            session.alias_set(name, strip_quotes(expansion.trim()));
            return Ok(());
        }

        for name in args {
            match session.alias_get(name) {
                Some(expansion) => println!("alias {}='{}'", name, expansion),
                None => eprintln!("alias: {}: not found", name),
            }
        }
        Ok(())
    }
}
