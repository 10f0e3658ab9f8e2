use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeFilter {
    File,
    Directory,
}

#[derive(Debug, Default)]
struct Predicates {
    name: Option<Pattern>,
    kind: Option<TypeFilter>,
}

/// Parses `-name <glob>` / `-type f|d` pairs; stray tokens are
/// ignored.
fn parse_predicates(args: &[String]) -> Result<Predicates, CommandError> {
    let mut predicates = Predicates::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-name" if i + 1 < args.len() => {
                let pattern = Pattern::new(&args[i + 1]).map_err(|e| {
                    CommandError::InvalidArguments(format!(
                        "invalid pattern '{}': {}",
                        args[i + 1],
                        e
                    ))
                })?;
                predicates.name = Some(pattern);
                i += 2;
            }
            "-type" if i + 1 < args.len() => {
                predicates.kind = match args[i + 1].as_str() {
                    "f" => Some(TypeFilter::File),
                    "d" => Some(TypeFilter::Directory),
                    other => {
                        return Err(CommandError::InvalidArguments(format!(
                            "unknown type '{}'",
                            other
                        )))
                    }
                };
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(predicates)
}

/// Depth-first walk below `root` (the root itself is not a candidate),
/// keeping entries whose name and kind satisfy the conjunctive
/// predicates.
fn collect_matches(root: &Path, predicates: &Predicates) -> Vec<PathBuf> {
    let mut matches = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if let Some(pattern) = &predicates.name {
            if !pattern.matches(&entry.file_name().to_string_lossy()) {
                continue;
            }
        }
        if let Some(kind) = predicates.kind {
            let is_dir = entry.file_type().is_dir();
            match kind {
                TypeFilter::File if is_dir => continue,
                TypeFilter::Directory if !is_dir => continue,
                _ => {}
            }
        }
        matches.push(entry.path().to_path_buf());
    }
    matches
}

#[derive(Clone)]
pub struct FindCommand {
    resolver: PathResolver,
}

impl Default for FindCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl FindCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for FindCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        let Some(path) = args.first() else {
            return Err(CommandError::InvalidArguments(
                "usage: find path [-name pattern] [-type f|d]".to_string(),
            ));
        };

        let predicates = parse_predicates(&args[1..])?;
        let root = self
            .resolver
            .resolve(path, session.current_dir())
            .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

        if let Err(e) = fs::symlink_metadata(&root) {
            eprintln!("find: '{}': {}", path, describe_io(&e));
            return Ok(());
        }

        for found in collect_matches(&root, &predicates) {
            println!("{}", found.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::scratch_dir;
    use super::*;

    fn setup_tree(name: &str) -> PathBuf {
        let dir = scratch_dir(name);
        fs::create_dir_all(dir.join("sub/inner")).unwrap();
        fs::write(dir.join("a.txt"), "x").unwrap();
        fs::write(dir.join("b.log"), "x").unwrap();
        fs::write(dir.join("sub/c.txt"), "x").unwrap();
        dir
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_collect_all_entries_excludes_root() {
        let dir = setup_tree("find_all");
        let found = collect_matches(&dir, &Predicates::default());
        let mut found = names(&found);
        found.sort();
        assert_eq!(found, ["a.txt", "b.log", "c.txt", "inner", "sub"]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_collect_by_name_glob() {
        let dir = setup_tree("find_glob");
        let predicates = Predicates {
            name: Some(Pattern::new("*.txt").unwrap()),
            kind: None,
        };
        let mut found = names(&collect_matches(&dir, &predicates));
        found.sort();
        assert_eq!(found, ["a.txt", "c.txt"]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_collect_by_type_directory() {
        let dir = setup_tree("find_type");
        let predicates = Predicates {
            name: None,
            kind: Some(TypeFilter::Directory),
        };
        let mut found = names(&collect_matches(&dir, &predicates));
        found.sort();
        assert_eq!(found, ["inner", "sub"]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_conjunctive_predicates() {
        let dir = setup_tree("find_both");
        let predicates = Predicates {
            name: Some(Pattern::new("*.txt").unwrap()),
            kind: Some(TypeFilter::Directory),
        };
        assert!(collect_matches(&dir, &predicates).is_empty());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_parse_bad_type() {
        let args: Vec<String> = vec!["-type".to_string(), "x".to_string()];
        assert!(matches!(
            parse_predicates(&args),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
