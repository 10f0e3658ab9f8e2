use std::borrow::Cow;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::ShellError;

/// Mutable interpreter state for one REPL run: working directory,
/// environment, aliases and command history. The working directory is
/// tracked here and never written back to the process working
/// directory, so `cd` stays local to the emulator.
pub struct Session {
    current_dir: PathBuf,
    previous_dir: Option<PathBuf>,
    env: BTreeMap<String, String>,
    aliases: BTreeMap<String, String>,
    history: Vec<String>,
    exit_requested: bool,
    interrupt: Arc<AtomicBool>,
}

impl Session {
    pub fn new(interrupt: Arc<AtomicBool>) -> Result<Self, ShellError> {
        let current_dir = env::current_dir()?;
        let home = dirs::home_dir().ok_or(ShellError::HomeDirNotFound)?;

        let mut env_vars: BTreeMap<String, String> = env::vars().collect();
        env_vars.insert("USER".to_string(), whoami::username());
        env_vars.insert("HOME".to_string(), home.to_string_lossy().into_owned());
        env_vars.insert("SHELL".to_string(), "cortex".to_string());

        let mut aliases = BTreeMap::new();
        aliases.insert("ll".to_string(), "ls -l".to_string());
        aliases.insert("la".to_string(), "ls -a".to_string());
        aliases.insert("l".to_string(), "ls -la".to_string());

        Ok(Session {
            current_dir,
            previous_dir: None,
            env: env_vars,
            aliases,
            history: Vec::new(),
            exit_requested: false,
            interrupt,
        })
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn previous_dir(&self) -> Option<&Path> {
        self.previous_dir.as_deref()
    }

    /// Records the old working directory as the previous one and moves
    /// to `dir`. Callers validate the target first; a failed `cd` must
    /// not reach this point.
    pub fn enter_directory(&mut self, dir: PathBuf) {
        self.previous_dir = Some(std::mem::replace(&mut self.current_dir, dir));
    }

    pub fn env_get(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    pub fn env_set(&mut self, name: &str, value: &str) {
        if !name.is_empty() {
            self.env.insert(name.to_string(), value.to_string());
        }
    }

    pub fn env_iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.env.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn alias_get(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn alias_set(&mut self, name: &str, expansion: &str) {
        self.aliases
            .insert(name.to_string(), expansion.to_string());
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Replaces the leading token with its alias expansion, once. The
    /// result is not expanded again, so self-referential aliases do not
    /// loop.
    pub fn expand_aliases<'a>(&'a self, command: &'a str) -> Cow<'a, str> {
        let mut parts: Vec<&str> = command.split_whitespace().collect();
        if let Some(first) = parts.first() {
            if let Some(expansion) = self.aliases.get(*first) {
                parts[0] = expansion;
                return Cow::Owned(parts.join(" "));
            }
        }
        Cow::Borrowed(command)
    }

    /// Appends the raw, pre-expansion line. Blank lines are not
    /// recorded.
    pub fn record_history(&mut self, line: &str) {
        if !line.trim().is_empty() {
            self.history.push(line.to_string());
        }
    }

    pub fn preload_history(&mut self, lines: Vec<String>) {
        self.history = lines;
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn clear_interrupt(&self) {
        self.interrupt.store(false, Ordering::SeqCst);
    }

    /// Consumes a pending interrupt, returning whether one was seen.
    pub fn take_interrupt(&self) -> bool {
        self.interrupt.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> Session {
        Session::new(Arc::new(AtomicBool::new(false))).unwrap()
    }

    #[test]
    fn test_seeded_environment() {
        let session = test_session();
        assert_eq!(session.env_get("SHELL"), Some("cortex"));
        assert!(session.env_get("USER").is_some());
        assert!(session.env_get("HOME").is_some());
    }

    #[test]
    fn test_default_aliases() {
        let session = test_session();
        assert_eq!(session.alias_get("ll"), Some("ls -l"));
        assert_eq!(session.alias_get("la"), Some("ls -a"));
        assert_eq!(session.alias_get("l"), Some("ls -la"));
    }

    #[test]
    fn test_alias_expansion_single_pass() {
        let mut session = test_session();
        session.alias_set("ls", "ls -l");
        let expanded = session.expand_aliases("ls /tmp");
        assert_eq!(expanded, "ls -l /tmp");
    }

    #[test]
    fn test_alias_expansion_untouched_without_match() {
        let session = test_session();
        let expanded = session.expand_aliases("cat file");
        assert!(matches!(expanded, Cow::Borrowed(_)));
    }

    #[test]
    fn test_enter_directory_records_previous() {
        let mut session = test_session();
        let original = session.current_dir().to_path_buf();
        session.enter_directory(PathBuf::from("/tmp"));
        assert_eq!(session.current_dir(), Path::new("/tmp"));
        assert_eq!(session.previous_dir(), Some(original.as_path()));
    }

    #[test]
    fn test_history_skips_blank_lines() {
        let mut session = test_session();
        session.record_history("ls -l");
        session.record_history("   ");
        session.record_history("");
        assert_eq!(session.history(), ["ls -l"]);
    }

    #[test]
    fn test_interrupt_flag_is_consumed() {
        let flag = Arc::new(AtomicBool::new(false));
        let session = Session::new(Arc::clone(&flag)).unwrap();
        flag.store(true, Ordering::SeqCst);
        assert!(session.take_interrupt());
        assert!(!session.take_interrupt());
    }
}
