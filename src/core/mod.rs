//! # Core Namespace
//!
//! Built-in functions of the language, organized by category. Each
//! sub-module defines plain `fn(&[Value]) -> Result<Value, MalError>`
//! builtins plus a `register` function that binds them; `install` wires
//! the whole namespace into an environment.
//!
//! The `eval` builtin is not here: it must close over a root
//! environment, so the Interpreter installs it itself.

use crate::env::Env;
use std::rc::Rc;

pub mod arithmetic;
pub mod atoms;
pub mod comparison;
pub mod maps;
pub mod misc;
pub mod seqs;
pub mod strings;
pub mod types;

/// Register every builtin category in the environment.
pub fn install(env: &Rc<Env>) {
    arithmetic::register(env);
    comparison::register(env);
    types::register(env);
    seqs::register(env);
    maps::register(env);
    atoms::register(env);
    strings::register(env);
    misc::register(env);
}
