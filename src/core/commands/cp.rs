use std::fs;
use std::path::Path;

use super::args::scan;
use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

fn copy_dir_all(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[derive(Clone)]
pub struct CpCommand {
    resolver: PathResolver,
}

impl Default for CpCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CpCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for CpCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        let parsed = scan(args, &[])?;
        let recursive = parsed.has('r') || parsed.has('R');

        let operands = parsed.into_operands();
        if operands.len() < 2 {
            return Err(CommandError::InvalidArguments(
                "usage: cp [-r] source... destination".to_string(),
            ));
        }

        let (sources, dest) = operands.split_at(operands.len() - 1);
        let dest_base = self
            .resolver
            .resolve(&dest[0], session.current_dir())
            .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

        for src in sources {
            let src_path = self
                .resolver
                .resolve(src, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

            let mut dest_path = dest_base.clone();
            if dest_path.is_dir() {
                if let Some(name) = src_path.file_name() {
                    dest_path.push(name);
                }
            }

            if same_file(&src_path, &dest_path) {
                eprintln!("cp: '{}' and '{}' are the same file", src, dest[0]);
                continue;
            }

            let meta = match fs::metadata(&src_path) {
                Ok(meta) => meta,
                Err(e) => {
                    eprintln!("cp: cannot open '{}': {}", src, describe_io(&e));
                    continue;
                }
            };

            if meta.is_dir() && !recursive {
                eprintln!("cp: -r not specified; omitting directory '{}'", src);
                continue;
            }

            let result = if meta.is_dir() {
                copy_dir_all(&src_path, &dest_path)
            } else {
                fs::copy(&src_path, &dest_path).map(|_| ())
            };
            if let Err(e) = result {
                eprintln!("cp: cannot create '{}': {}", dest[0], describe_io(&e));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{scratch_dir, test_session};
    use super::*;

    #[test]
    fn test_cp_file() {
        let dir = scratch_dir("cp_file");
        fs::write(dir.join("src.txt"), "payload").unwrap();

        let mut session = test_session();
        session.enter_directory(dir.clone());
        let cmd = CpCommand::new();

        cmd.execute(
            &["src.txt".to_string(), "dst.txt".to_string()],
            &mut session,
        )
        .unwrap();
        assert_eq!(fs::read_to_string(dir.join("dst.txt")).unwrap(), "payload");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_cp_into_directory_appends_name() {
        let dir = scratch_dir("cp_into_dir");
        fs::write(dir.join("src.txt"), "payload").unwrap();
        fs::create_dir(dir.join("target")).unwrap();

        let mut session = test_session();
        session.enter_directory(dir.clone());
        let cmd = CpCommand::new();

        cmd.execute(&["src.txt".to_string(), "target".to_string()], &mut session)
            .unwrap();
        assert_eq!(
            fs::read_to_string(dir.join("target/src.txt")).unwrap(),
            "payload"
        );

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_cp_directory_requires_recursive() {
        let dir = scratch_dir("cp_dir");
        fs::create_dir(dir.join("tree")).unwrap();
        fs::write(dir.join("tree/inner.txt"), "x").unwrap();

        let mut session = test_session();
        session.enter_directory(dir.clone());
        let cmd = CpCommand::new();

        cmd.execute(&["tree".to_string(), "copy".to_string()], &mut session)
            .unwrap();
        assert!(!dir.join("copy").exists());

        cmd.execute(
            &["-r".to_string(), "tree".to_string(), "copy".to_string()],
            &mut session,
        )
        .unwrap();
        assert_eq!(fs::read_to_string(dir.join("copy/inner.txt")).unwrap(), "x");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_cp_too_few_operands() {
        let mut session = test_session();
        let cmd = CpCommand::new();
        assert!(matches!(
            cmd.execute(&["only".to_string()], &mut session),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
