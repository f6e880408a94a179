use crate::runner::RunConfig;
use clap::{Arg, ArgAction, ArgMatches, Command};

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    File(String),
    Eval(String),
    Repl,
}

pub fn command() -> Command {
    Command::new("dew")
        .about("An expression interpreter for the Dew scripting language")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("file")
                .help("The script file to execute")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("eval")
                .short('e')
                .long("eval")
                .help("Execute CODE instead of a file")
                .value_name("CODE")
                .conflicts_with("file"),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode (the default without FILE or CODE)")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["file", "eval"]),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .help("Print the token sequence before parsing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ast")
                .long("ast")
                .help("Print the syntax tree before evaluation")
                .action(ArgAction::SetTrue),
        )
}

pub fn run_config(matches: &ArgMatches) -> RunConfig {
    RunConfig {
        dump_tokens: matches.get_flag("tokens"),
        dump_ast: matches.get_flag("ast"),
    }
}

pub fn mode(matches: &ArgMatches) -> Mode {
    if let Some(file) = matches.get_one::<String>("file") {
        Mode::File(file.clone())
    } else if let Some(code) = matches.get_one::<String>("eval") {
        Mode::Eval(code.clone())
    } else {
        Mode::Repl
    }
}
