//! Atoms: the single mutable cell of the language

use crate::env::Env;
use crate::error::MalError;
use crate::eval;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

fn as_atom<'a>(name: &str, value: &'a Value) -> Result<&'a Rc<RefCell<Value>>, MalError> {
    match value {
        Value::Atom(cell) => Ok(cell),
        other => Err(MalError::type_error(name, "atom", other)),
    }
}

pub fn atom(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [value] => Ok(Value::atom(value.clone())),
        _ => Err(MalError::arity("1", args.len())),
    }
}

pub fn is_atom(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [value] => Ok(Value::Bool(matches!(value, Value::Atom(_)))),
        _ => Err(MalError::arity("1", args.len())),
    }
}

pub fn deref(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [value] => Ok(as_atom("deref", value)?.borrow().clone()),
        _ => Err(MalError::arity("1", args.len())),
    }
}

pub fn reset(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [target, value] => {
            *as_atom("reset!", target)?.borrow_mut() = value.clone();
            Ok(value.clone())
        }
        _ => Err(MalError::arity("2", args.len())),
    }
}

/// `(swap! a f x…)` stores `(f (deref a) x…)` in the cell and returns
/// it. Closures go through the evaluator.
pub fn swap(args: &[Value]) -> Result<Value, MalError> {
    if args.len() < 2 {
        return Err(MalError::arity("at least 2", args.len()));
    }
    let cell = as_atom("swap!", &args[0])?;
    let func = &args[1];
    let mut call_args = vec![cell.borrow().clone()];
    call_args.extend_from_slice(&args[2..]);
    let result = eval::apply(func, &call_args)?;
    *cell.borrow_mut() = result.clone();
    Ok(result)
}

/// Register all atom builtins in the environment.
pub fn register(env: &Rc<Env>) {
    env.set("atom", Value::builtin("atom", atom));
    env.set("atom?", Value::builtin("atom?", is_atom));
    env.set("deref", Value::builtin("deref", deref));
    env.set("reset!", Value::builtin("reset!", reset));
    env.set("swap!", Value::builtin("swap!", swap));
}
