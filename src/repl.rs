use crate::runner::{self, RunConfig};
use crate::script::Script;
use std::io::{self, Write};

/// Line-at-a-time prompt. The script, and so its diagnostics channel, lives
/// for the whole session; diagnostics are drained after every line.
pub fn start(config: RunConfig) {
    println!("Dew Interpreter v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' or press Ctrl+D to quit");
    println!();

    let mut script = Script::new();

    loop {
        print!("> ");
        if let Err(error) = io::stdout().flush() {
            eprintln!("Error writing prompt: {}", error);
            break;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    println!("Goodbye!");
                    break;
                }

                // Failures are already reported; the session carries on
                let _ = runner::execute(&mut script, line, None, config);
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}
