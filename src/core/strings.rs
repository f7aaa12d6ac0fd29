//! String building and I/O: pr-str, str, prn, println, read-string,
//! slurp, readline

use crate::env::Env;
use crate::error::MalError;
use crate::printer::pr_seq;
use crate::reader;
use crate::value::Value;
use std::io::{BufRead, Write};
use std::rc::Rc;

/// Readable rendering of all arguments joined with spaces.
pub fn pr_str(args: &[Value]) -> Result<Value, MalError> {
    Ok(Value::Str(pr_seq(args, true)))
}

/// Display rendering of all arguments concatenated.
pub fn str_(args: &[Value]) -> Result<Value, MalError> {
    let joined = args
        .iter()
        .map(|arg| crate::printer::pr_str(arg, false))
        .collect::<String>();
    Ok(Value::Str(joined))
}

pub fn prn(args: &[Value]) -> Result<Value, MalError> {
    println!("{}", pr_seq(args, true));
    Ok(Value::Nil)
}

pub fn println_(args: &[Value]) -> Result<Value, MalError> {
    println!("{}", pr_seq(args, false));
    Ok(Value::Nil)
}

pub fn read_string(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [Value::Str(source)] => reader::read_str(source),
        [other] => Err(MalError::type_error("read-string", "string", other)),
        _ => Err(MalError::arity("1", args.len())),
    }
}

/// Reads a file, stripping `;`-comments line by line so comment-only
/// lines do not break the reader when the contents are wrapped in a
/// `(do …)` form.
pub fn slurp(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [Value::Str(path)] => {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| MalError::Argument(format!("slurp: {}: {}", path, e)))?;
            let stripped = contents
                .lines()
                .map(|line| line.split(';').next().unwrap_or(""))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(Value::Str(stripped))
        }
        [other] => Err(MalError::type_error("slurp", "string", other)),
        _ => Err(MalError::arity("1", args.len())),
    }
}

/// Prompts on stdout and reads one line from stdin; `nil` on EOF.
pub fn readline(args: &[Value]) -> Result<Value, MalError> {
    let prompt = match args {
        [] => "",
        [Value::Str(prompt)] => prompt,
        [other] => return Err(MalError::type_error("readline", "string", other)),
        _ => return Err(MalError::arity("0-1", args.len())),
    };
    print!("{}", prompt);
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) => Ok(Value::Nil),
        Ok(_) => {
            if line.ends_with('\n') {
                line.pop();
            }
            Ok(Value::Str(line))
        }
        Err(e) => Err(MalError::Argument(format!("readline: {}", e))),
    }
}

/// Register all string and I/O builtins in the environment.
pub fn register(env: &Rc<Env>) {
    env.set("pr-str", Value::builtin("pr-str", pr_str));
    env.set("str", Value::builtin("str", str_));
    env.set("prn", Value::builtin("prn", prn));
    env.set("println", Value::builtin("println", println_));
    env.set("read-string", Value::builtin("read-string", read_string));
    env.set("slurp", Value::builtin("slurp", slurp));
    env.set("readline", Value::builtin("readline", readline));
}
