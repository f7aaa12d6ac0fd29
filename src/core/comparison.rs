//! Comparison operations: =, <, <=, >, >=
//!
//! `=` is the structural equality of the value model; the ordering
//! operators require exactly two numeric operands.

use crate::env::Env;
use crate::error::MalError;
use crate::value::Value;
use std::rc::Rc;

pub fn equal(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 2 {
        return Err(MalError::arity("2", args.len()));
    }
    Ok(Value::Bool(args[0] == args[1]))
}

fn compare(name: &str, args: &[Value], op: fn(f64, f64) -> bool) -> Result<Value, MalError> {
    if args.len() != 2 {
        return Err(MalError::arity("2", args.len()));
    }
    let a = args[0]
        .as_number()
        .ok_or_else(|| MalError::type_error(name, "number", &args[0]))?;
    let b = args[1]
        .as_number()
        .ok_or_else(|| MalError::type_error(name, "number", &args[1]))?;
    Ok(Value::Bool(op(a, b)))
}

pub fn lt(args: &[Value]) -> Result<Value, MalError> {
    compare("<", args, |a, b| a < b)
}

pub fn le(args: &[Value]) -> Result<Value, MalError> {
    compare("<=", args, |a, b| a <= b)
}

pub fn gt(args: &[Value]) -> Result<Value, MalError> {
    compare(">", args, |a, b| a > b)
}

pub fn ge(args: &[Value]) -> Result<Value, MalError> {
    compare(">=", args, |a, b| a >= b)
}

/// Register all comparison builtins in the environment.
pub fn register(env: &Rc<Env>) {
    env.set("=", Value::builtin("=", equal));
    env.set("<", Value::builtin("<", lt));
    env.set("<=", Value::builtin("<=", le));
    env.set(">", Value::builtin(">", gt));
    env.set(">=", Value::builtin(">=", ge));
}
