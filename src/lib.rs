// Dew Language Interpreter Library
//
// Lexer, parser and tree-walking evaluator for Dew expressions, with a
// per-script diagnostics channel that every stage reports into.

// Public modules
pub mod ast;
pub mod cli;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod script;
pub mod value;

// Re-export commonly used items
pub use ast::{BinaryOp, Expr, Program, Stmt, UnaryOp};
pub use error::{Diagnostics, DewError, ErrorKind, Span};
pub use evaluator::Evaluator;
pub use lexer::{Lexer, Literal, Token, TokenType};
pub use parser::Parser;
pub use script::{run_source, RunFailure, RunObserver, RunOutcome, Script};
pub use value::Value;

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::{run, RunConfig};
