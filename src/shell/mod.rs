use rustyline::{config::Configurer, history::FileHistory, Editor};

mod executor;
mod prompt;

use crate::{
    core::{commands::Dispatcher, Session},
    error::ShellError,
    flags::Flags,
    input::{history::HistoryStore, ShellCompleter},
    process::signal,
};

use executor::LineExecutor;

const HISTORY_FILE: &str = ".cortex_history";
const HISTORY_LIMIT: usize = 1000;

pub struct Shell {
    pub(crate) editor: Editor<ShellCompleter, FileHistory>,
    pub(crate) session: Session,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) history_store: HistoryStore,
    pub(crate) flags: Flags,
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let interrupt = signal::install_interrupt_flag()?;
        let mut session = Session::new(interrupt)?;

        let history_path = dirs::home_dir()
            .ok_or(ShellError::HomeDirNotFound)?
            .join(HISTORY_FILE);
        let history_store = HistoryStore::new(history_path, HISTORY_LIMIT);
        match history_store.load() {
            Ok(lines) => session.preload_history(lines),
            Err(e) => {
                if !flags.is_set("quiet") {
                    eprintln!("Warning: couldn't load history: {}", e);
                }
            }
        }

        let dispatcher = Dispatcher::new();

        let mut completer = ShellCompleter::new(dispatcher.command_names());
        completer.update_aliases(session.aliases());

        let mut editor = Editor::<ShellCompleter, FileHistory>::new()?;
        editor.set_helper(Some(completer));
        editor.set_auto_add_history(true);

        Ok(Shell {
            editor,
            session,
            dispatcher,
            history_store,
            flags,
        })
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            let prompt = prompt::render(&self.session);
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if let Err(e) = self.execute_line(&line) {
                        if !self.flags.is_set("quiet") {
                            eprintln!("{}", e);
                        }
                    }
                    if self.session.exit_requested() {
                        break;
                    }
                }
                Err(rustyline::error::ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(rustyline::error::ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(e) => {
                    if !self.flags.is_set("quiet") {
                        eprintln!("Error: {}", e);
                    }
                    continue;
                }
            }
        }

        if !self.flags.is_set("quiet") {
            println!("Leaving the cortex emulator");
        }
        if let Err(e) = self.history_store.save(self.session.history()) {
            if !self.flags.is_set("quiet") {
                eprintln!("Warning: couldn't save history: {}", e);
            }
        }
        Ok(())
    }
}
