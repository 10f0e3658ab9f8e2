use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::ShellError;

/// Installs the process-wide SIGINT handler. Ctrl-C only raises the
/// returned flag; long-running handlers poll it and the REPL ignores
/// it between commands, so the interpreter itself never dies on ^C.
pub fn install_interrupt_flag() -> Result<Arc<AtomicBool>, ShellError> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);

    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })?;

    Ok(flag)
}
