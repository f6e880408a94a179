use crate::ast::Program;
use crate::error::{Diagnostics, DewError};
use crate::evaluator::Evaluator;
use crate::lexer::{Lexer, Token};
use crate::parser::Parser;
use crate::value::Value;

/// Why a run stopped before evaluation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RunFailure {
    #[error("no tokens to be had, which cannot be a valid input")]
    NoTokens,
    #[error("tokenising failed")]
    LexErrors,
    #[error("parsing failed")]
    ParseErrors,
}

/// One value per evaluated expression statement on success.
pub type RunOutcome = Result<Vec<Value>, RunFailure>;

/// Stages of a run that observers may want to look at, e.g. for `--tokens`
/// and `--ast` dumps.
pub trait RunObserver {
    fn tokens(&mut self, _tokens: &[Token]) {}
    fn program(&mut self, _program: &Program) {}
}

impl RunObserver for () {}

/// A script context: owns the diagnostics channel shared by every run.
///
/// Diagnostics accumulate across runs until drained with
/// [`Script::pop_error`] or dropped with [`Script::reset`].
#[derive(Debug, Default)]
pub struct Script {
    diagnostics: Diagnostics,
}

impl Script {
    pub fn new() -> Self {
        Self {
            diagnostics: Diagnostics::new(),
        }
    }

    /// Tokenize, parse and evaluate `source`.
    pub fn run(&mut self, source: &str) -> RunOutcome {
        self.run_observed(source, &mut ())
    }

    pub fn run_observed(&mut self, source: &str, observer: &mut dyn RunObserver) -> RunOutcome {
        // Diagnostics left over from earlier runs do not fail this one
        let errors_before = self.diagnostics.len();

        let tokens = Lexer::new(source).scan_tokens(&mut self.diagnostics);
        observer.tokens(&tokens);

        if tokens.is_empty() {
            return Err(RunFailure::NoTokens);
        }

        if self.diagnostics.len() > errors_before {
            return Err(RunFailure::LexErrors);
        }

        let program = match Parser::new(&tokens).parse() {
            Ok(program) => program,
            Err(error) => {
                self.diagnostics.push(error);
                return Err(RunFailure::ParseErrors);
            }
        };
        drop(tokens);
        observer.program(&program);

        Ok(Evaluator::new(&mut self.diagnostics).evaluate_program(&program))
    }

    /// Oldest diagnostic first; `None` once drained.
    pub fn pop_error(&mut self) -> Option<DewError> {
        self.diagnostics.pop()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn errors(&self) -> impl Iterator<Item = &DewError> {
        self.diagnostics.iter()
    }

    pub fn reset(&mut self) {
        self.diagnostics.clear();
    }

    /// Drains every queued diagnostic, oldest first.
    pub fn drain_errors(&mut self) -> Vec<DewError> {
        std::iter::from_fn(|| self.pop_error()).collect()
    }
}

/// Runs `source` once in a temporary script and hands back the outcome
/// together with everything it reported.
pub fn run_source(source: &str) -> (RunOutcome, Vec<DewError>) {
    let mut script = Script::new();
    let outcome = script.run(source);
    (outcome, script.drain_errors())
}
