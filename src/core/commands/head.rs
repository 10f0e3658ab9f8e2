use std::fs::File;
use std::io::{BufRead, BufReader};

use super::args::scan;
use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

const DEFAULT_LINES: usize = 10;

pub(crate) fn parse_line_count(value: Option<&str>) -> Result<usize, CommandError> {
    match value {
        None => Ok(DEFAULT_LINES),
        Some(v) => v.parse().map_err(|_| {
            CommandError::InvalidArguments(format!("invalid number of lines: '{}'", v))
        }),
    }
}

#[derive(Clone)]
pub struct HeadCommand {
    resolver: PathResolver,
}

impl Default for HeadCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for HeadCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        let parsed = scan(args, &['n'])?;
        let count = parse_line_count(parsed.value('n'))?;

        let files = parsed.into_operands();
        if files.is_empty() {
            return Err(CommandError::InvalidArguments(
                "usage: head [-n lines] file...".to_string(),
            ));
        }

        let multiple = files.len() > 1;
        for (i, filename) in files.iter().enumerate() {
            let resolved = self
                .resolver
                .resolve(filename, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

            let file = match File::open(&resolved) {
                Ok(file) => file,
                Err(e) => {
                    eprintln!(
                        "head: cannot open '{}' for reading: {}",
                        filename,
                        describe_io(&e)
                    );
                    continue;
                }
            };

            if multiple {
                println!("==> {} <==", filename);
            }

            // streaming: only the first N lines are ever read
            for line in BufReader::new(file).lines().take(count) {
                match line {
                    Ok(line) => println!("{}", line.trim_end()),
                    Err(e) => {
                        eprintln!("head: error reading '{}': {}", filename, describe_io(&e));
                        break;
                    }
                }
            }

            if multiple && i + 1 < files.len() {
                println!();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{scratch_dir, test_session};
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_line_count_default() {
        assert_eq!(parse_line_count(None).unwrap(), 10);
    }

    #[test]
    fn test_parse_line_count_explicit() {
        assert_eq!(parse_line_count(Some("2")).unwrap(), 2);
    }

    #[test]
    fn test_parse_line_count_invalid() {
        assert!(matches!(
            parse_line_count(Some("two")),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_execute_on_file() {
        let dir = scratch_dir("head_exec");
        fs::write(dir.join("five.txt"), "1\n2\n3\n4\n5\n").unwrap();

        let mut session = test_session();
        session.enter_directory(dir.clone());
        let cmd = HeadCommand::new();

        assert!(cmd
            .execute(
                &["-n".to_string(), "2".to_string(), "five.txt".to_string()],
                &mut session
            )
            .is_ok());
        assert!(cmd.execute(&["five.txt".to_string()], &mut session).is_ok());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_execute_missing_file_is_reported_not_fatal() {
        let mut session = test_session();
        let cmd = HeadCommand::new();
        assert!(cmd
            .execute(&["/no/such/file".to_string()], &mut session)
            .is_ok());
    }

    #[test]
    fn test_execute_without_files_is_invalid() {
        let mut session = test_session();
        let cmd = HeadCommand::new();
        assert!(matches!(
            cmd.execute(&[], &mut session),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
