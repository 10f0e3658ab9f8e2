use std::fs;

use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

/// Index-by-index comparison. Lines keep their endings, so a missing
/// final newline counts as a difference. Shifted-alignment edits show
/// up as runs of change records, not as a minimal edit script; this is
/// long-standing behavior and kept as-is.
fn positional_diff(first: &[&str], second: &[&str]) -> Vec<String> {
    let mut out = Vec::new();

    let overlap = first.len().min(second.len());
    for i in 0..overlap {
        if first[i] != second[i] {
            out.push(format!("{}c{}", i + 1, i + 1));
            out.push(format!("< {}", first[i].trim_end()));
            out.push(format!("> {}", second[i].trim_end()));
        }
    }

    if first.len() > second.len() {
        for (i, line) in first.iter().enumerate().skip(second.len()) {
            out.push(format!("{}d{}", i + 1, i));
            out.push(format!("< {}", line.trim_end()));
        }
    } else if second.len() > first.len() {
        for (i, line) in second.iter().enumerate().skip(first.len()) {
            out.push(format!("{}a{}", i, i + 1));
            out.push(format!("> {}", line.trim_end()));
        }
    }

    out
}

#[derive(Clone)]
pub struct DiffCommand {
    resolver: PathResolver,
}

impl Default for DiffCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for DiffCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        if args.len() != 2 {
            return Err(CommandError::InvalidArguments(
                "usage: diff file1 file2".to_string(),
            ));
        }

        let mut contents = Vec::with_capacity(2);
        for filename in &args[..2] {
            let resolved = self
                .resolver
                .resolve(filename, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;
            match fs::read_to_string(&resolved) {
                Ok(content) => contents.push(content),
                Err(e) => {
                    eprintln!("diff: {}: {}", filename, describe_io(&e));
                    return Ok(());
                }
            }
        }

        let first: Vec<&str> = contents[0].split_inclusive('\n').collect();
        let second: Vec<&str> = contents[1].split_inclusive('\n').collect();

        for line in positional_diff(&first, &second) {
            println!("{}", line);
        }
        Ok(())
    }
}
