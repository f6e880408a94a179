use dew::cli::{self, Mode};
use dew::runner::{self, RunConfig};
use std::fs;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = cli::command().get_matches();
    let config = cli::run_config(&matches);

    match cli::mode(&matches) {
        Mode::File(file_path) => run_file(&file_path, config),
        Mode::Eval(code) => exit_code(runner::run(&code, Some("<eval>"), config).is_ok()),
        Mode::Repl => {
            dew::start_repl(config);
            ExitCode::SUCCESS
        }
    }
}

fn run_file(path: &str, config: RunConfig) -> ExitCode {
    let path = Path::new(path);

    match fs::read_to_string(path) {
        Ok(source) => {
            let filename = path.display().to_string();
            exit_code(runner::run(&source, Some(&filename), config).is_ok())
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
