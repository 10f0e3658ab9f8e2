use std::ffi::CStr;
use std::io::Write;

use chrono::Local;
use walkdir::WalkDir;

use super::args::scan;
use super::{describe_io, human_size, Command, CommandError};
use crate::core::Session;
use crate::path::PathResolver;

fn utsname_field(field: &[libc::c_char]) -> String {
    unsafe { CStr::from_ptr(field.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

fn uname_info() -> Option<libc::utsname> {
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    if unsafe { libc::uname(&mut uts) } == 0 {
        Some(uts)
    } else {
        None
    }
}

#[derive(Clone)]
pub struct UnameCommand;

impl Default for UnameCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl UnameCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for UnameCommand {
    fn execute(&self, args: &[String], _session: &mut Session) -> Result<(), CommandError> {
        let parsed = scan(args, &[])?;
        let all = parsed.has('a');
        // no selection at all prints the kernel name
        let default = !all
            && !parsed.has('s')
            && !parsed.has('n')
            && !parsed.has('r')
            && !parsed.has('v')
            && !parsed.has('m');

        let uts = uname_info().ok_or_else(|| {
            CommandError::ExecutionError("cannot read system information".to_string())
        })?;

        let mut info = Vec::new();
        if all || default || parsed.has('s') {
            info.push(utsname_field(&uts.sysname));
        }
        if all || parsed.has('n') {
            info.push(utsname_field(&uts.nodename));
        }
        if all || parsed.has('r') {
            info.push(utsname_field(&uts.release));
        }
        if all || parsed.has('v') {
            info.push(utsname_field(&uts.version));
        }
        if all || parsed.has('m') {
            info.push(utsname_field(&uts.machine));
        }

        println!("{}", info.join(" "));
        Ok(())
    }
}

#[derive(Clone)]
pub struct WhoamiCommand;

impl Default for WhoamiCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl WhoamiCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for WhoamiCommand {
    fn execute(&self, _args: &[String], _session: &mut Session) -> Result<(), CommandError> {
        println!("{}", whoami::username());
        Ok(())
    }
}

#[derive(Clone)]
pub struct DateCommand;

impl Default for DateCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl DateCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for DateCommand {
    fn execute(&self, _args: &[String], _session: &mut Session) -> Result<(), CommandError> {
        println!("{}", Local::now().format("%a %b %d %H:%M:%S %Y"));
        Ok(())
    }
}

/// The emulator has no process table; only its own process shows up.
#[derive(Clone)]
pub struct PsCommand;

impl Default for PsCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl PsCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for PsCommand {
    fn execute(&self, _args: &[String], _session: &mut Session) -> Result<(), CommandError> {
        println!("  PID TTY          TIME CMD");
        println!("{:>5} ?        00:00:00 cortex", std::process::id());
        Ok(())
    }
}

#[derive(Clone)]
pub struct KillCommand;

impl Default for KillCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl KillCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for KillCommand {
    fn execute(&self, args: &[String], _session: &mut Session) -> Result<(), CommandError> {
        if args.is_empty() {
            return Err(CommandError::InvalidArguments(
                "usage: kill pid...".to_string(),
            ));
        }

        for pid_str in args {
            match pid_str.parse::<u32>() {
                Ok(pid) if pid == std::process::id() => {
                    println!("kill: the emulator process cannot be killed")
                }
                Ok(pid) => println!("kill: ({}) - No such process", pid),
                Err(_) => eprintln!("kill: invalid argument: {}", pid_str),
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct DfCommand;

impl Default for DfCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl DfCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for DfCommand {
    fn execute(&self, _args: &[String], _session: &mut Session) -> Result<(), CommandError> {
        let mut vfs: libc::statvfs = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::statvfs(c"/".as_ptr(), &mut vfs) };
        if rc != 0 {
            return Err(CommandError::ExecutionError(
                "cannot read filesystem information".to_string(),
            ));
        }

        let frsize = vfs.f_frsize as u64;
        let total = vfs.f_blocks as u64 * frsize;
        let avail = vfs.f_bavail as u64 * frsize;
        let used = total - vfs.f_bfree as u64 * frsize;
        let percent = if total > 0 {
            (used as f64 / total as f64 * 100.0).round() as u64
        } else {
            0
        };

        println!("Filesystem      Size     Used    Avail Use% Mounted on");
        println!(
            "{:<12} {:>7} {:>8} {:>8} {:>3}% /",
            "rootfs",
            human_size(total),
            human_size(used),
            human_size(avail),
            percent
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct DuCommand {
    resolver: PathResolver,
}

impl Default for DuCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl DuCommand {
    pub fn new() -> Self {
        Self {
            resolver: PathResolver::new(),
        }
    }
}

/// Sum of regular-file sizes below `root`; unreadable entries are
/// skipped.
fn tree_size(root: &std::path::Path) -> u64 {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum()
}

impl Command for DuCommand {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError> {
        let parsed = scan(args, &[])?;
        let human_readable = parsed.has('h');

        let mut paths = parsed.into_operands();
        if paths.is_empty() {
            paths.push(".".to_string());
        }

        for path in &paths {
            let resolved = self
                .resolver
                .resolve(path, session.current_dir())
                .map_err(|e| CommandError::ExecutionError(e.to_string()))?;

            if let Err(e) = std::fs::symlink_metadata(&resolved) {
                eprintln!("du: cannot access '{}': {}", path, describe_io(&e));
                continue;
            }

            let total = tree_size(&resolved);
            let size_str = if human_readable {
                human_size(total)
            } else {
                (total / 1024).to_string()
            };
            println!("{}\t{}", size_str, path);
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct ClearCommand;

impl Default for ClearCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ClearCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ClearCommand {
    fn execute(&self, _args: &[String], _session: &mut Session) -> Result<(), CommandError> {
        // ANSI clear-screen plus cursor home
        print!("\x1b[2J\x1b[1;1H");
        std::io::stdout().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{scratch_dir, test_session};
    use super::*;
    use std::fs;

    #[test]
    fn test_uname_variants_are_ok() {
        let mut session = test_session();
        let cmd = UnameCommand::new();
        assert!(cmd.execute(&[], &mut session).is_ok());
        assert!(cmd.execute(&["-a".to_string()], &mut session).is_ok());
        assert!(cmd.execute(&["-r".to_string()], &mut session).is_ok());
    }

    #[test]
    fn test_uname_reports_kernel_name() {
        let uts = uname_info().unwrap();
        assert!(!utsname_field(&uts.sysname).is_empty());
    }

    #[test]
    fn test_kill_rejects_non_numeric() {
        let mut session = test_session();
        let cmd = KillCommand::new();
        assert!(cmd.execute(&["abc".to_string()], &mut session).is_ok());
        assert!(matches!(
            cmd.execute(&[], &mut session),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_tree_size_sums_files() {
        let dir = scratch_dir("du_tree");
        fs::create_dir(dir.join("sub")).unwrap();
        fs::write(dir.join("a"), vec![0u8; 100]).unwrap();
        fs::write(dir.join("sub/b"), vec![0u8; 200]).unwrap();

        assert_eq!(tree_size(&dir), 300);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_du_missing_path_is_reported_not_fatal() {
        let mut session = test_session();
        let cmd = DuCommand::new();
        assert!(cmd
            .execute(&["/no/such/tree".to_string()], &mut session)
            .is_ok());
    }

    #[test]
    fn test_df_prints_a_row() {
        let mut session = test_session();
        let cmd = DfCommand::new();
        assert!(cmd.execute(&[], &mut session).is_ok());
    }

    #[test]
    fn test_date_and_whoami_and_ps() {
        let mut session = test_session();
        assert!(DateCommand::new().execute(&[], &mut session).is_ok());
        assert!(WhoamiCommand::new().execute(&[], &mut session).is_ok());
        assert!(PsCommand::new().execute(&[], &mut session).is_ok());
    }
}
