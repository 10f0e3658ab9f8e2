use crate::error::ShellError;

/// Takes one raw input line through the interpreter: history first,
/// then a single alias pass, then whitespace tokenization and
/// dispatch.
pub(crate) trait LineExecutor {
    fn execute_line(&mut self, line: &str) -> Result<(), ShellError>;
}

impl LineExecutor for super::Shell {
    fn execute_line(&mut self, line: &str) -> Result<(), ShellError> {
        if line.trim().is_empty() {
            return Ok(());
        }

        // the raw, pre-expansion line is what history remembers,
        // whether or not the command succeeds
        self.session.record_history(line);

        let expanded = self.session.expand_aliases(line).into_owned();
        let mut parts = expanded.split_whitespace();
        let Some(name) = parts.next() else {
            return Ok(());
        };
        let name = name.to_string();
        let args: Vec<String> = parts.map(str::to_string).collect();

        self.dispatcher
            .dispatch(&name, &args, &expanded, &mut self.session)
            .map_err(ShellError::Command)
    }
}
