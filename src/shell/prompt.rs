use std::path::Path;

use crate::core::Session;

/// `user@host:path$ ` with the home directory abbreviated to `~`.
/// Color is applied by the line editor's prompt highlighter, not here.
pub(crate) fn render(session: &Session) -> String {
    let user = whoami::username();
    let host = whoami::fallible::hostname().unwrap_or_else(|_| "localhost".to_string());
    let path = abbreviate_home(session.current_dir(), dirs::home_dir().as_deref());
    format!("{}@{}:{}$ ", user, host, path)
}

fn abbreviate_home(path: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home {
        if let Ok(rest) = path.strip_prefix(home) {
            return if rest.as_os_str().is_empty() {
                "~".to_string()
            } else {
                format!("~/{}", rest.display())
            };
        }
    }
    path.display().to_string()
}
