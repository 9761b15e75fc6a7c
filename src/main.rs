use std::env;
use venule::flags::Flags;
use venule::shell::Shell;

fn main() -> Result<(), venule::error::ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(());
    }

    if flags.is_set("version") {
        println!("venule {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    venule::logging::init(flags.is_set("debug"), flags.is_set("quiet"))?;

    let mut shell = Shell::new(&flags)?;
    let code = shell.run()?;
    std::process::exit(code);
}
