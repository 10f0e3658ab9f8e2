use std::fs::File;
use std::io::{BufReader, Read};
use std::thread;
use std::time::Duration;

use super::args::scan;
use super::head::parse_line_count;
use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// The last `count` lines of `content`.
fn tail_lines(content: &str, count: usize) -> Vec<&str> {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].to_vec()
}

#[derive(Clone)]
pub struct TailCommand {
    resolver: PathResolver,
}

impl Default for TailCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl TailCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }

    /// Polls the open file for appended content once a second until an
    /// interrupt arrives. Blocks the whole interpreter; no other input
    /// is processed while following.
    fn follow(&self, reader: &mut BufReader<File>, session: &Session) {
        session.clear_interrupt();
        loop {
            let mut appended = String::new();
            if reader.read_to_string(&mut appended).is_ok() && !appended.is_empty() {
                for line in appended.lines() {
                    println!("{}", line.trim_end());
                }
            }
            if session.take_interrupt() {
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Command for TailCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        let parsed = scan(args, &['n'])?;
        let count = parse_line_count(parsed.value('n'))?;
        let follow = parsed.has('f');

        let files = parsed.into_operands();
        if files.is_empty() {
            return Err(CommandError::InvalidArguments(
                "usage: tail [-n lines] [-f] file...".to_string(),
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
                        "tail: cannot open '{}' for reading: {}",
                        filename,
                        describe_io(&e)
                    );
                    continue;
                }
            };

            if multiple {
                println!("==> {} <==", filename);
            }

            let mut reader = BufReader::new(file);
            let mut content = String::new();
            if let Err(e) = reader.read_to_string(&mut content) {
                eprintln!("tail: error reading '{}': {}", filename, describe_io(&e));
                continue;
            }

            for line in tail_lines(&content, count) {
                println!("{}", line.trim_end());
            }

            if follow {
                println!("\ntail: following '{}'; press Ctrl-C to stop", filename);
                self.follow(&mut reader, session);
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
    fn test_tail_lines_slices_last_n() {
        assert_eq!(tail_lines("1\n2\n3\n4\n5\n", 2), ["4", "5"]);
    }

    #[test]
    fn test_tail_lines_short_input() {
        assert_eq!(tail_lines("only\n", 10), ["only"]);
    }

    #[test]
    fn test_tail_lines_zero() {
        assert!(tail_lines("a\nb\n", 0).is_empty());
    }

    #[test]
    fn test_execute_on_file() {
        let dir = scratch_dir("tail_exec");
        fs::write(dir.join("five.txt"), "1\n2\n3\n4\n5\n").unwrap();

        let mut session = test_session();
        session.enter_directory(dir.clone());
        let cmd = TailCommand::new();

        assert!(cmd
            .execute(
                &["-n".to_string(), "2".to_string(), "five.txt".to_string()],
                &mut session
            )
            .is_ok());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_execute_missing_file_is_reported_not_fatal() {
        let mut session = test_session();
        let cmd = TailCommand::new();
        assert!(cmd
            .execute(&["/no/such/file".to_string()], &mut session)
            .is_ok());
    }
}
