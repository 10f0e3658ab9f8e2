use std::collections::HashSet;
use std::fs;

use super::args::scan;
use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

#[derive(Debug, Clone, Copy, Default)]
struct SortOptions {
    reverse: bool,
    numeric: bool,
    unique: bool,
}

/// Numeric key for one line. Empty lines sort as zero.
fn whole_line_key(line: &str) -> Result<f64, ()> {
    if line.is_empty() {
        return Ok(0.0);
    }
    line.trim().parse::<f64>().map_err(|_| ())
}

fn first_token_key(line: &str) -> Result<f64, CommandError> {
    if line.is_empty() {
        return Ok(0.0);
    }
    line.split_whitespace()
        .next()
        .and_then(|token| token.parse::<f64>().ok())
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid number: '{}'", line)))
}

/// Numeric sort parses every line as a number; if any line fails, the
/// whole file is retried with only the first whitespace token, and a
/// second failure aborts the invocation.
fn sort_lines(lines: &mut Vec<String>, opts: SortOptions) -> Result<(), CommandError> {
    if opts.numeric {
        let keys: Vec<f64> = match lines
            .iter()
            .map(|l| whole_line_key(l))
            .collect::<Result<Vec<_>, ()>>()
        {
            Ok(keys) => keys,
            Err(()) => lines
                .iter()
                .map(|l| first_token_key(l))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let mut keyed: Vec<(f64, String)> = keys.into_iter().zip(lines.drain(..)).collect();
        if opts.reverse {
            keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
        } else {
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        }
        lines.extend(keyed.into_iter().map(|(_, line)| line));
    } else if opts.reverse {
        lines.sort_by(|a, b| b.cmp(a));
    } else {
        lines.sort();
    }

    if opts.unique {
        let mut seen = HashSet::new();
        lines.retain(|line| seen.insert(line.clone()));
    }

    Ok(())
}

#[derive(Clone)]
pub struct SortCommand {
    resolver: PathResolver,
}

impl Default for SortCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl SortCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for SortCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        let parsed = scan(args, &[])?;
        let opts = SortOptions {
            reverse: parsed.has('r'),
            numeric: parsed.has('n'),
            unique: parsed.has('u'),
        };

        let files = parsed.into_operands();
        if files.is_empty() {
            return Err(CommandError::InvalidArguments(
                "usage: sort [-r] [-n] [-u] file...".to_string(),
            ));
        }

        for filename in &files {
            let resolved = self
                .resolver
                .resolve(filename, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

            let content = match fs::read_to_string(&resolved) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("sort: cannot read '{}': {}", filename, describe_io(&e));
                    continue;
                }
            };

            let mut lines: Vec<String> =
                content.lines().map(|l| l.trim_end().to_string()).collect();
            sort_lines(&mut lines, opts)?;

            for line in lines {
                println!("{}", line);
            }
        }
        Ok(())
    }
}
