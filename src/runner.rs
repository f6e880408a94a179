use crate::ast::Program;
use crate::lexer::Token;
use crate::script::{RunFailure, RunObserver, Script};
use crate::value::Value;

/// Output switches shared by the file runner and the REPL.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunConfig {
    pub dump_tokens: bool,
    pub dump_ast: bool,
}

struct Dumper {
    config: RunConfig,
}

impl RunObserver for Dumper {
    fn tokens(&mut self, tokens: &[Token]) {
        if self.config.dump_tokens {
            for token in tokens {
                println!("{}", token);
            }
        }
    }

    fn program(&mut self, program: &Program) {
        if self.config.dump_ast && !program.statements.is_empty() {
            println!("{}", program);
        }
    }
}

/// Runs one whole source text in a fresh script, printing each statement's
/// value and then every diagnostic.
pub fn run(source: &str, filename: Option<&str>, config: RunConfig) -> Result<(), RunFailure> {
    let mut script = Script::new();
    let outcome = execute(&mut script, source, filename, config);
    outcome.map(|_| ())
}

/// Runs `source` against an existing script, prints the results and drains
/// the script's diagnostics.
pub fn execute(
    script: &mut Script,
    source: &str,
    filename: Option<&str>,
    config: RunConfig,
) -> Result<Vec<Value>, RunFailure> {
    let outcome = script.run_observed(source, &mut Dumper { config });

    if let Ok(values) = &outcome {
        for value in values {
            println!("{}", value);
        }
    }

    report_errors(script, source, filename);
    outcome
}

/// Prints every queued diagnostic in source order and empties the queue.
pub fn report_errors(script: &mut Script, source: &str, filename: Option<&str>) {
    let mut errors = script.drain_errors();
    errors.sort_by_key(|error| error.offset());

    for error in &errors {
        error.report(source, filename);
    }
}
