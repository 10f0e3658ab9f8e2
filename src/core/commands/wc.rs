use std::fs;

use super::args::scan;
use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Counts {
    lines: usize,
    words: usize,
    chars: usize,
}

#[derive(Debug, Clone, Copy)]
struct Selection {
    lines: bool,
    words: bool,
    chars: bool,
}

fn count(content: &str) -> Counts {
    Counts {
        lines: content.matches('\n').count(),
        words: content.split_whitespace().count(),
        chars: content.chars().count(),
    }
}

fn format_row(counts: Counts, selection: Selection, label: &str) -> String {
    let mut fields = Vec::new();
    if selection.lines {
        fields.push(format!("{:>8}", counts.lines));
    }
    if selection.words {
        fields.push(format!("{:>8}", counts.words));
    }
    if selection.chars {
        fields.push(format!("{:>8}", counts.chars));
    }
    format!("{} {}", fields.join(" "), label)
}

#[derive(Clone)]
pub struct WcCommand {
    resolver: PathResolver,
}

impl Default for WcCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl WcCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for WcCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        if args.is_empty() {
            return Err(CommandError::InvalidArguments(
                "usage: wc [-l] [-w] [-c] file...".to_string(),
            ));
        }

        let parsed = scan(args, &[])?;
        let mut selection = Selection {
            lines: parsed.has('l'),
            words: parsed.has('w'),
            chars: parsed.has('c'),
        };
        if !selection.lines && !selection.words && !selection.chars {
            selection = Selection {
                lines: true,
                words: true,
                chars: true,
            };
        }

        let files = parsed.into_operands();
        let mut totals = Counts {
            lines: 0,
            words: 0,
            chars: 0,
        };

        for filename in &files {
            let resolved = self
                .resolver
                .resolve(filename, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

            let content = match fs::read_to_string(&resolved) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("wc: cannot read '{}': {}", filename, describe_io(&e));
                    continue;
                }
            };

            let counts = count(&content);
            println!("{}", format_row(counts, selection, filename));

            totals.lines += counts.lines;
            totals.words += counts.words;
            totals.chars += counts.chars;
        }

        if files.len() > 1 {
            println!("{}", format_row(totals, selection, "total"));
        }
        Ok(())
    }
}
