// ABOUTME: CLI entry point: script runner and interactive REPL

use clap::Parser;
use log::debug;
use mal::config::{HISTORY_FILE, HISTORY_MAX, PROMPT, VERSION};
use mal::interpreter::Interpreter;
use mal::value::Value;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{Config, Editor};
use std::path::PathBuf;
use std::process::ExitCode;

/// MAL interpreter
#[derive(Parser, Debug)]
#[command(name = "mal")]
#[command(version = VERSION)]
#[command(about = "A Make-A-Lisp interpreter")]
struct CliArgs {
    /// Stay in the REPL after executing the script file
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Script file to execute (optional - if not provided, starts the REPL)
    #[arg(value_name = "FILE")]
    filename: Option<String>,

    /// Arguments passed to the program as *ARGV*
    #[arg(value_name = "ARGS", trailing_var_arg = true)]
    prog_args: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = CliArgs::parse();

    let interpreter = match Interpreter::new() {
        Ok(interpreter) => interpreter,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    interpreter.define("*ARGV*", argv_values(&args.prog_args));

    if let Some(filename) = &args.filename {
        interpreter.define("*FILENAME*", Value::string(filename.clone()));
        debug!("loading {}", filename);
        if let Err(e) = interpreter.rep("(load-file *FILENAME*)") {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
        if !args.interactive {
            return ExitCode::SUCCESS;
        }
    }

    match repl(&interpreter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Digit-only arguments enter `*ARGV*` as numbers, everything else as
/// strings.
fn argv_values(args: &[String]) -> Value {
    let values = args
        .iter()
        .map(|arg| {
            if !arg.is_empty() && arg.chars().all(|c| c.is_ascii_digit()) {
                arg.parse::<i64>()
                    .map(Value::Int)
                    .unwrap_or_else(|_| Value::Str(arg.clone()))
            } else {
                Value::Str(arg.clone())
            }
        })
        .collect();
    Value::list(values)
}

fn history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(HISTORY_FILE))
}

fn repl(interpreter: &Interpreter) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder()
        .max_history_size(HISTORY_MAX)?
        .auto_add_history(true)
        .build();
    let mut rl: Editor<(), FileHistory> = Editor::with_config(config)?;

    let history = history_path();
    if let Some(path) = &history {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                match interpreter.rep(&line) {
                    Ok(result) => println!("{}", result),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            // Interrupt and EOF both end the prompt loop.
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(path) = &history {
        let _ = rl.save_history(path);
    }
    Ok(())
}
