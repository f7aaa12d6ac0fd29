//! Arithmetic operations: +, -, *, /
//!
//! Each takes two or more numeric arguments. Any float operand
//! promotes the result to float; whole results collapse back to
//! integers. Integer overflow continues in floats rather than
//! wrapping.

use crate::env::Env;
use crate::error::MalError;
use crate::value::Value;
use std::rc::Rc;

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(n) => n,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Num::Int(n) => Value::Int(n),
            Num::Float(n) => Value::number(n),
        }
    }
}

fn as_num(name: &str, value: &Value, position: usize) -> Result<Num, MalError> {
    match value {
        Value::Int(n) => Ok(Num::Int(*n)),
        Value::Float(n) => Ok(Num::Float(*n)),
        other => Err(MalError::Type {
            context: format!("{}: argument {}", name, position),
            expected: "number".to_string(),
            actual: other.type_name().to_string(),
        }),
    }
}

fn fold_numeric(
    name: &str,
    args: &[Value],
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, MalError> {
    if args.len() < 2 {
        return Err(MalError::arity("at least 2", args.len()));
    }
    let mut acc = as_num(name, &args[0], 1)?;
    for (i, arg) in args[1..].iter().enumerate() {
        let rhs = as_num(name, arg, i + 2)?;
        acc = match (acc, rhs) {
            (Num::Int(a), Num::Int(b)) => match int_op(a, b) {
                Some(n) => Num::Int(n),
                None => Num::Float(float_op(a as f64, b as f64)),
            },
            (a, b) => Num::Float(float_op(a.as_f64(), b.as_f64())),
        };
    }
    Ok(acc.into_value())
}

pub fn add(args: &[Value]) -> Result<Value, MalError> {
    fold_numeric("+", args, i64::checked_add, |a, b| a + b)
}

pub fn sub(args: &[Value]) -> Result<Value, MalError> {
    fold_numeric("-", args, i64::checked_sub, |a, b| a - b)
}

pub fn mul(args: &[Value]) -> Result<Value, MalError> {
    fold_numeric("*", args, i64::checked_mul, |a, b| a * b)
}

/// Integer division by zero is an error; float division follows IEEE,
/// so `(/ 1.0 0)` is infinity. An inexact integer quotient yields a
/// float.
pub fn div(args: &[Value]) -> Result<Value, MalError> {
    if args.len() < 2 {
        return Err(MalError::arity("at least 2", args.len()));
    }
    let mut acc = as_num("/", &args[0], 1)?;
    for (i, arg) in args[1..].iter().enumerate() {
        let rhs = as_num("/", arg, i + 2)?;
        acc = match (acc, rhs) {
            (Num::Int(a), Num::Int(b)) => {
                if b == 0 {
                    return Err(MalError::Argument("division by zero".to_string()));
                }
                match (a.checked_rem(b), a.checked_div(b)) {
                    (Some(0), Some(q)) => Num::Int(q),
                    _ => Num::Float(a as f64 / b as f64),
                }
            }
            (a, b) => Num::Float(a.as_f64() / b.as_f64()),
        };
    }
    Ok(acc.into_value())
}

/// Register all arithmetic builtins in the environment.
pub fn register(env: &Rc<Env>) {
    env.set("+", Value::builtin("+", add));
    env.set("-", Value::builtin("-", sub));
    env.set("*", Value::builtin("*", mul));
    env.set("/", Value::builtin("/", div));
}
