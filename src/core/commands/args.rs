use std::collections::{BTreeMap, BTreeSet};

use super::CommandError;

/// Scanned invocation arguments: clustered short flags, valued flags
/// and positional operands.
#[derive(Debug, Default)]
pub(crate) struct CommandArgs {
    flags: BTreeSet<char>,
    values: BTreeMap<char, String>,
    operands: Vec<String>,
}

impl CommandArgs {
    pub(crate) fn has(&self, flag: char) -> bool {
        self.flags.contains(&flag)
    }

    pub(crate) fn value(&self, flag: char) -> Option<&str> {
        self.values.get(&flag).map(String::as_str)
    }

    pub(crate) fn operands(&self) -> &[String] {
        &self.operands
    }

    pub(crate) fn into_operands(self) -> Vec<String> {
        self.operands
    }
}

/// Scans `args` for `-x` short flags (clustered as in `-la`) and the
/// valued flags listed in `valued`, which take the rest of their token
/// (`-n5`) or the following token (`-n 5`). Everything else is an
/// operand; a lone `-` is an operand too.
pub(crate) fn scan(args: &[String], valued: &[char]) -> Result<CommandArgs, CommandError> {
    let mut out = CommandArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let body = match arg.strip_prefix('-') {
            Some(body) if !body.is_empty() => body,
            _ => {
                out.operands.push(arg.clone());
                continue;
            }
        };

        let mut chars = body.char_indices();
        while let Some((idx, c)) = chars.next() {
            if valued.contains(&c) {
                let rest = &body[idx + c.len_utf8()..];
                let value = if rest.is_empty() {
                    iter.next().cloned().ok_or_else(|| {
                        CommandError::InvalidArguments(format!("option -{} requires a value", c))
                    })?
                } else {
                    rest.to_string()
                };
                out.values.insert(c, value);
                break;
            }
            out.flags.insert(c);
        }
    }

    Ok(out)
}
