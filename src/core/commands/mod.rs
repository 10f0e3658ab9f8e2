use std::collections::BTreeMap;
use std::io;

mod args;
mod builtin;

mod alias;
mod cat;
mod cd;
mod chmod;
mod cp;
mod diff;
mod echo;
mod env;
mod find;
mod grep;
mod head;
mod help;
mod history;
mod ls;
mod mkdir;
mod mv;
mod rm;
mod sort;
mod system;
mod tail;
mod touch;
mod wc;

pub use alias::AliasCommand;
pub use builtin::{ExitCommand, UnsupportedCommand};
pub use cat::CatCommand;
pub use cd::{CdCommand, PwdCommand};
pub use chmod::ChmodCommand;
pub use cp::CpCommand;
pub use diff::DiffCommand;
pub use echo::EchoCommand;
pub use env::{EnvCommand, ExportCommand};
pub use find::FindCommand;
pub use grep::GrepCommand;
pub use head::HeadCommand;
pub use help::HelpCommand;
pub use history::HistoryCommand;
pub use ls::LsCommand;
pub use mkdir::MkdirCommand;
pub use mv::MvCommand;
pub use rm::RmCommand;
pub use sort::SortCommand;
pub use system::{
    ClearCommand, DateCommand, DfCommand, DuCommand, KillCommand, PsCommand, UnameCommand,
    WhoamiCommand,
};
pub use tail::TailCommand;
pub use touch::TouchCommand;
pub use wc::WcCommand;

use crate::core::Session;
use crate::input::history::HistoryError;
use crate::process::{HostExecutor, ProcessError};

#[derive(Debug)]
pub enum CommandError {
    NotFound(String),
    InvalidArguments(String),
    ExecutionError(String),
    IoError(std::io::Error),
    ProcessError(ProcessError),
    HistoryError(HistoryError),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::NotFound(cmd) => write!(f, "command not found: {}", cmd),
            CommandError::InvalidArguments(msg) => write!(f, "invalid arguments: {}", msg),
            CommandError::ExecutionError(msg) => write!(f, "execution error: {}", msg),
            CommandError::IoError(err) => write!(f, "IO error: {}", err),
            CommandError::ProcessError(err) => write!(f, "Process error: {}", err),
            CommandError::HistoryError(err) => write!(f, "History error: {}", err),
        }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::IoError(err)
    }
}

impl From<ProcessError> for CommandError {
    fn from(err: ProcessError) -> Self {
        CommandError::ProcessError(err)
    }
}

impl From<HistoryError> for CommandError {
    fn from(err: HistoryError) -> Self {
        CommandError::HistoryError(err)
    }
}

/// A command bound to a name in the dispatch table. Handlers report
/// per-item failures themselves and keep going; an `Err` return aborts
/// only the current invocation.
pub trait Command {
    fn execute(&self, args: &[String], session: &mut Session) -> Result<(), CommandError>;
}

/// Short message for per-item error reports, in the style of the
/// coreutils originals.
pub(crate) fn describe_io(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "No such file or directory".to_string(),
        io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
        io::ErrorKind::IsADirectory => "Is a directory".to_string(),
        io::ErrorKind::NotADirectory => "Not a directory".to_string(),
        io::ErrorKind::AlreadyExists => "File exists".to_string(),
        _ => err.to_string(),
    }
}

/// Binary-prefix size with one decimal, as `ls -h` and `du -h` print
/// it.
pub(crate) fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["", "K", "M", "G", "T"] {
        if size < 1024.0 {
            return format!("{:.1}{}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1}P", size)
}

const UNSUPPORTED: &[(&str, &str)] = &[
    ("ssh", "remote connections are not supported in the emulator"),
    ("scp", "remote file copying is not supported in the emulator"),
    ("wget", "downloading files is not supported in the emulator"),
    ("curl", "HTTP requests are not supported in the emulator"),
    ("ping", "network probes are not supported in the emulator"),
    (
        "ifconfig",
        "network interface information is not supported in the emulator",
    ),
    ("sudo", "running commands as root is not supported in the emulator"),
    (
        "chown",
        "changing file ownership is not supported in the emulator",
    ),
];

/// Maps command names to handlers. Names missing from the table are
/// handed to the host shell, executed in the session's working
/// directory.
pub struct Dispatcher {
    commands: BTreeMap<&'static str, Box<dyn Command>>,
    host: HostExecutor,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        let mut commands: BTreeMap<&'static str, Box<dyn Command>> = BTreeMap::new();

        commands.insert("cd", Box::new(CdCommand::new()));
        commands.insert("pwd", Box::new(PwdCommand::new()));
        commands.insert("ls", Box::new(LsCommand::new()));
        commands.insert("echo", Box::new(EchoCommand::new()));
        commands.insert("cat", Box::new(CatCommand::new()));
        commands.insert("mkdir", Box::new(MkdirCommand::new()));
        commands.insert("rm", Box::new(RmCommand::new()));
        commands.insert("cp", Box::new(CpCommand::new()));
        commands.insert("mv", Box::new(MvCommand::new()));
        commands.insert("touch", Box::new(TouchCommand::new()));
        commands.insert("chmod", Box::new(ChmodCommand::new()));
        commands.insert("grep", Box::new(GrepCommand::new()));
        commands.insert("find", Box::new(FindCommand::new()));
        commands.insert("diff", Box::new(DiffCommand::new()));
        commands.insert("sort", Box::new(SortCommand::new()));
        commands.insert("wc", Box::new(WcCommand::new()));
        commands.insert("head", Box::new(HeadCommand::new()));
        commands.insert("tail", Box::new(TailCommand::new()));
        commands.insert("alias", Box::new(AliasCommand::new()));
        commands.insert("env", Box::new(EnvCommand::new()));
        commands.insert("export", Box::new(ExportCommand::new()));
        commands.insert("history", Box::new(HistoryCommand::new()));
        commands.insert("uname", Box::new(UnameCommand::new()));
        commands.insert("whoami", Box::new(WhoamiCommand::new()));
        commands.insert("date", Box::new(DateCommand::new()));
        commands.insert("ps", Box::new(PsCommand::new()));
        commands.insert("kill", Box::new(KillCommand::new()));
        commands.insert("df", Box::new(DfCommand::new()));
        commands.insert("du", Box::new(DuCommand::new()));
        commands.insert("clear", Box::new(ClearCommand::new()));
        commands.insert("help", Box::new(HelpCommand::new()));
        commands.insert("exit", Box::new(ExitCommand::new()));

        for &(name, reason) in UNSUPPORTED {
            commands.insert(name, Box::new(UnsupportedCommand::new(name, reason)));
        }

        Self {
            commands,
            host: HostExecutor::new(),
        }
    }

    pub fn dispatch(
        &self,
        name: &str,
        args: &[String],
        line: &str,
        session: &mut Session,
    ) -> Result<(), CommandError> {
        if let Some(cmd) = self.commands.get(name) {
            return cmd.execute(args, session);
        }

        match self.host.run(line, session.current_dir()) {
            Ok(()) => Ok(()),
            Err(ProcessError::CommandNotFound(cmd)) => Err(CommandError::NotFound(cmd)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn command_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    pub(crate) fn test_session() -> Session {
        Session::new(Arc::new(AtomicBool::new(false))).unwrap()
    }

    /// Unique scratch directory for a test, removed by the caller.
    pub(crate) fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("cortex_test_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_builtin_command_detection() {
        let dispatcher = Dispatcher::new();

        assert!(dispatcher.is_builtin("cd"));
        assert!(dispatcher.is_builtin("ls"));
        assert!(dispatcher.is_builtin("exit"));
        assert!(dispatcher.is_builtin("ssh"));
        assert!(!dispatcher.is_builtin("unknown"));
        assert!(!dispatcher.is_builtin(""));
    }

    #[test]
    fn test_dispatch_unknown_command_reports_not_found() {
        let dispatcher = Dispatcher::new();
        let mut session = test_session();

        let result = dispatcher.dispatch(
            "cortex_no_such_command",
            &[],
            "cortex_no_such_command",
            &mut session,
        );
        assert!(matches!(result, Err(CommandError::NotFound(_))));
    }

    #[test]
    fn test_dispatch_unsupported_command_is_ok() {
        let dispatcher = Dispatcher::new();
        let mut session = test_session();

        assert!(dispatcher
            .dispatch("ssh", &["host".to_string()], "ssh host", &mut session)
            .is_ok());
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(500), "500.0");
        assert_eq!(human_size(1536), "1.5K");
        assert_eq!(human_size(1024 * 1024), "1.0M");
    }

    #[test]
    fn test_command_error_display() {
        let errors = vec![
            CommandError::NotFound("test".to_string()),
            CommandError::InvalidArguments("bad args".to_string()),
            CommandError::ExecutionError("failed".to_string()),
            CommandError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "io error")),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}
