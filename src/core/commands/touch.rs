use std::ffi::CString;
use std::fs::OpenOptions;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use super::{describe_io, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

/// Sets both timestamps of an existing path to now.
fn bump_times(path: &Path) -> std::io::Result<()> {
    let cpath = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| std::io::Error::from(std::io::ErrorKind::InvalidInput))?;
    let rc = unsafe { libc::utimes(cpath.as_ptr(), std::ptr::null()) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[derive(Clone)]
pub struct TouchCommand {
    resolver: PathResolver,
}

impl Default for TouchCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

impl Command for TouchCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        if args.is_empty() {
            return Err(CommandError::InvalidArguments(
                "usage: touch file...".to_string(),
            ));
        }

        for filename in args {
            let resolved = self
                .resolver
                .resolve(filename, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

            if !resolved.exists() {
                if let Err(e) = OpenOptions::new()
                    .append(true)
                    .create(true)
                    .open(&resolved)
                {
                    eprintln!("touch: {}: {}", filename, describe_io(&e));
                    continue;
                }
            }
            if let Err(e) = bump_times(&resolved) {
                eprintln!("touch: {}: {}", filename, describe_io(&e));
            }
        }
        Ok(())
    }
}
