use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::highlight::SyntaxHighlighter;

/// Tab completion for the line editor: registered command names and
/// aliases in the first word position, paths afterwards. Also applies
/// the prompt and command-line coloring.
#[derive(Clone)]
pub struct ShellCompleter {
    commands: BTreeSet<String>,
    aliases: BTreeMap<String, String>,
}

impl ShellCompleter {
    pub fn new<'a>(commands: impl Iterator<Item = &'a str>) -> Self {
        ShellCompleter {
            commands: commands.map(str::to_string).collect(),
            aliases: BTreeMap::new(),
        }
    }

    pub fn update_aliases(&mut self, aliases: &BTreeMap<String, String>) {
        self.aliases = aliases.clone();
    }

    fn complete_command(&self, prefix: &str) -> Vec<Pair> {
        let mut matches = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(prefix) {
                matches.push(Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                });
            }
        }

        for alias in self.aliases.keys() {
            if alias.starts_with(prefix) {
                matches.push(Pair {
                    display: format!("{} (alias)", alias),
                    replacement: alias.clone(),
                });
            }
        }

        matches
    }

    fn complete_path(&self, incomplete: &str) -> Vec<Pair> {
        let (dir_to_search, file_prefix) = split_path_input(incomplete);

        let mut matches = Vec::new();
        if let Ok(entries) = fs::read_dir(&dir_to_search) {
            for entry in entries.filter_map(Result::ok) {
                let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                    continue;
                };
                if !name.starts_with(&file_prefix) {
                    continue;
                }

                let mut replacement = if dir_to_search == Path::new(".") {
                    name.clone()
                } else {
                    dir_to_search.join(&name).to_string_lossy().into_owned()
                };
                if entry.path().is_dir() {
                    replacement.push('/');
                } else {
                    replacement.push(' ');
                }
                matches.push(Pair {
                    display: name,
                    replacement,
                });
            }
        }

        matches.sort_by(|a, b| a.display.cmp(&b.display));
        matches
    }
}

fn split_path_input(incomplete: &str) -> (PathBuf, String) {
    if incomplete.is_empty() {
        return (PathBuf::from("."), String::new());
    }
    if incomplete.ends_with('/') {
        return (PathBuf::from(incomplete), String::new());
    }

    let path = Path::new(incomplete);
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => (
            parent.to_path_buf(),
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        ),
        _ => (PathBuf::from("."), incomplete.to_string()),
    }
}

impl Helper for ShellCompleter {}

impl Highlighter for ShellCompleter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let highlighter = SyntaxHighlighter::new();
        Cow::Owned(highlighter.highlight_command(line))
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            let highlighter = SyntaxHighlighter::new();
            Cow::Owned(highlighter.highlight_prompt(prompt))
        } else {
            Cow::Borrowed(prompt)
        }
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;
}

impl Validator for ShellCompleter {}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_up_to_cursor = &line[..pos];

        let mut words: Vec<&str> = line_up_to_cursor.split_whitespace().collect();
        if line_up_to_cursor.ends_with(' ') || words.is_empty() {
            words.push("");
        }

        if words.len() == 1 {
            let word = words[0];
            let start = line_up_to_cursor.rfind(word).unwrap_or(0);
            return Ok((start, self.complete_command(word)));
        }

        let last_word = words.last().copied().unwrap_or("");
        let start = if last_word.is_empty() {
            pos
        } else {
            line_up_to_cursor.rfind(last_word).unwrap_or(pos)
        };
        Ok((start, self.complete_path(last_word)))
    }
}
