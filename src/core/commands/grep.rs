use std::fs;

use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    IgnoreCase,
    CountOnly,
    LineNumbers,
    InvertMatch,
}

#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    pattern: String,
    files: Vec<String>,
    modifier: Option<Modifier>,
}

/// Only the first recognized flag token before the pattern is honored,
/// checked in `-i`, `-c`, `-n`, `-v` order. Longstanding behavior;
/// callers combining flags get the remainder treated as the pattern.
fn parse_invocation(args: &[String]) -> Invocation {
    let first = &args[0];
    if first.starts_with('-') {
        let modifier = if first.contains("-i") {
            Some(Modifier::IgnoreCase)
        } else if first.contains("-c") {
            Some(Modifier::CountOnly)
        } else if first.contains("-n") {
            Some(Modifier::LineNumbers)
        } else if first.contains("-v") {
            Some(Modifier::InvertMatch)
        } else {
            None
        };

        if modifier.is_some() && args.len() > 1 {
            return Invocation {
                pattern: args[1].clone(),
                files: args[2..].to_vec(),
                modifier,
            };
        }
    }

    Invocation {
        pattern: first.clone(),
        files: args[1..].to_vec(),
        modifier: None,
    }
}

/// Substring containment scan; returns 1-based line numbers with the
/// matching (or, inverted, non-matching) lines.
fn matching_lines<'a>(
    content: &'a str,
    pattern: &str,
    ignore_case: bool,
    invert: bool,
) -> Vec<(usize, &'a str)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let hit = if ignore_case {
                line.to_lowercase().contains(pattern)
            } else {
                line.contains(pattern)
            };
            hit != invert
        })
        .map(|(i, line)| (i + 1, line))
        .collect()
}

#[derive(Clone)]
pub struct GrepCommand {
    resolver: PathResolver,
}

impl Default for GrepCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl GrepCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for GrepCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        if args.is_empty() {
            return Err(CommandError::InvalidArguments(
                "usage: grep [-i|-c|-n|-v] pattern file...".to_string(),
            ));
        }

        let invocation = parse_invocation(args);
        let ignore_case = invocation.modifier == Some(Modifier::IgnoreCase);
        let count_only = invocation.modifier == Some(Modifier::CountOnly);
        let line_numbers = invocation.modifier == Some(Modifier::LineNumbers);
        let invert = invocation.modifier == Some(Modifier::InvertMatch);

        let pattern = if ignore_case {
            invocation.pattern.to_lowercase()
        } else {
            invocation.pattern.clone()
        };

        if invocation.files.is_empty() {
            eprintln!("grep: reading from standard input is not supported in the emulator");
            return Ok(());
        }

        let multiple = invocation.files.len() > 1;
        for filename in &invocation.files {
            let resolved = self
                .resolver
                .resolve(filename, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

            let content = match fs::read_to_string(&resolved) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("grep: {}: {}", filename, describe_io(&e));
                    continue;
                }
            };

            let matches = matching_lines(&content, &pattern, ignore_case, invert);
            if count_only {
                if multiple {
                    println!("{}:{}", filename, matches.len());
                } else {
                    println!("{}", matches.len());
                }
                continue;
            }

            for (number, line) in matches {
                let mut prefix = String::new();
                if multiple {
                    prefix.push_str(filename);
                    prefix.push(':');
                }
                if line_numbers {
                    prefix.push_str(&number.to_string());
                    prefix.push(':');
                }
                println!("{}{}", prefix, line.trim_end());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{scratch_dir, test_session};
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matching_lines_substring() {
        let content = "alpha\nbeta\ngamma\nalphabet\n";
        let hits = matching_lines(content, "alpha", false, false);
        assert_eq!(hits, vec![(1, "alpha"), (4, "alphabet")]);
    }

    #[test]
    fn test_matching_lines_ignore_case() {
        let content = "Alpha\nbeta\n";
        let hits = matching_lines(content, "alpha", true, false);
        assert_eq!(hits, vec![(1, "Alpha")]);
    }

    #[test]
    fn test_matching_lines_invert() {
        let content = "alpha\nbeta\ngamma\n";
        let hits = matching_lines(content, "a", false, true);
        assert!(hits.is_empty());
        let hits = matching_lines(content, "alpha", false, true);
        assert_eq!(hits, vec![(2, "beta"), (3, "gamma")]);
    }

    #[test]
    fn test_parse_plain_pattern() {
        let inv = parse_invocation(&strings(&["pat", "f1", "f2"]));
        assert_eq!(inv.pattern, "pat");
        assert_eq!(inv.files, strings(&["f1", "f2"]));
        assert_eq!(inv.modifier, None);
    }

    #[test]
    fn test_parse_single_flag() {
        let inv = parse_invocation(&strings(&["-n", "pat", "f"]));
        assert_eq!(inv.modifier, Some(Modifier::LineNumbers));
        assert_eq!(inv.pattern, "pat");
        assert_eq!(inv.files, strings(&["f"]));
    }

    #[test]
    fn test_parse_only_first_flag_honored() {
        // the second flag token is consumed as the pattern
        let inv = parse_invocation(&strings(&["-i", "-c", "pat", "f"]));
        assert_eq!(inv.modifier, Some(Modifier::IgnoreCase));
        assert_eq!(inv.pattern, "-c");
        assert_eq!(inv.files, strings(&["pat", "f"]));
    }

    #[test]
    fn test_parse_unrecognized_flag_is_pattern() {
        let inv = parse_invocation(&strings(&["-x", "f"]));
        assert_eq!(inv.modifier, None);
        assert_eq!(inv.pattern, "-x");
        assert_eq!(inv.files, strings(&["f"]));
    }

    #[test]
    fn test_execute_count_matches() {
        let dir = scratch_dir("grep_count");
        std::fs::write(dir.join("data.txt"), "one\ntwo\nneither\ntone\nxxx\n").unwrap();

        let mut session = test_session();
        session.enter_directory(dir.clone());
        let cmd = GrepCommand::new();

        assert!(cmd
            .execute(&strings(&["-c", "one", "data.txt"]), &mut session)
            .is_ok());
        assert!(cmd
            .execute(&strings(&["one", "data.txt"]), &mut session)
            .is_ok());

        let content = std::fs::read_to_string(dir.join("data.txt")).unwrap();
        assert_eq!(matching_lines(&content, "one", false, false).len(), 2);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_execute_missing_file_is_reported_not_fatal() {
        let mut session = test_session();
        let cmd = GrepCommand::new();
        assert!(cmd
            .execute(&strings(&["pat", "/no/such/file"]), &mut session)
            .is_ok());
    }

    #[test]
    fn test_execute_no_args_is_invalid() {
        let mut session = test_session();
        let cmd = GrepCommand::new();
        assert!(matches!(
            cmd.execute(&[], &mut session),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
