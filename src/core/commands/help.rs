use super::{Command, CommandError};
use crate::core::Session;

const HELP_TEXT: &str = "\
Available commands:
  cd [dir]               change directory ('-' returns to the previous one)
  ls [-alhrt] [path...]  list directory contents
  pwd                    print the working directory
  echo [text]            print text; $NAME expands from the environment
  cat file...            print file contents
  mkdir [-p] dir...      create directories
  rm [-r] [-f] path...   remove files or directories
  cp [-r] src... dest    copy files
  mv src... dest         move or rename files
  touch file...          create files or update their timestamps
  chmod mode file...     change permissions (octal or +x)
  grep [flag] pat file.. search for text in files (-i, -c, -n, -v)
  find path [opts]       find files (-name pattern, -type f|d)
  diff file1 file2       compare two files line by line
  sort [-rnu] file...    sort lines
  wc [-lwc] file...      count lines, words and characters
  head [-n N] file...    first lines of files
  tail [-n N] [-f] file  last lines of files; -f follows appends
  alias [name[=value]]   list, query or define aliases
  env                    print the environment
  export NAME=VALUE      set an environment variable
  history                recent command history
  uname [-asnrvm]        system information
  whoami                 current user
  date                   current date and time
  ps                     process list
  kill pid...            terminate a process
  df                     filesystem usage
  du [-h] [path...]      disk usage of a tree
  clear                  clear the screen
  exit                   leave the emulator
  help                   this text

This is a simplified Linux command emulator; not every option of the
real utilities is supported. Unknown commands are passed to the host
shell.";

#[derive(Clone)]
pub struct HelpCommand;

impl Default for HelpCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for HelpCommand {
    fn execute(&self, _args: &[String], _session: &mut Session) -> Result<(), CommandError> {
        println!("{}", HELP_TEXT);
        Ok(())
    }
}
