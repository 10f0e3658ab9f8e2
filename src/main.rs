use cortex::flags::Flags;
use cortex::shell::Shell;
use std::env;

fn main() -> Result<(), cortex::error::ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(());
    }

    if flags.is_set("version") {
        println!("cortex {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if !flags.is_set("quiet") {
        println!("Welcome to cortex, a Linux command emulator.");
        println!("Type 'help' for the command list, 'exit' to leave.\n");
    }

    let mut shell = Shell::new(flags)?;
    shell.run()
}
