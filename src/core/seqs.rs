//! Sequence operations over lists and vectors

use crate::env::Env;
use crate::error::MalError;
use crate::eval;
use crate::value::Value;
use std::rc::Rc;

fn as_seq<'a>(name: &str, value: &'a Value) -> Result<&'a [Value], MalError> {
    value
        .as_seq()
        .ok_or_else(|| MalError::type_error(name, "sequence", value))
}

pub fn list(args: &[Value]) -> Result<Value, MalError> {
    Ok(Value::list(args.to_vec()))
}

pub fn vector(args: &[Value]) -> Result<Value, MalError> {
    Ok(Value::vector(args.to_vec()))
}

/// New list with the element prepended; the tail may be a list or a
/// vector.
pub fn cons(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [head, tail] => {
            let rest = as_seq("cons", tail)?;
            let mut items = Vec::with_capacity(rest.len() + 1);
            items.push(head.clone());
            items.extend_from_slice(rest);
            Ok(Value::list(items))
        }
        _ => Err(MalError::arity("2", args.len())),
    }
}

/// Flat list of the elements of every argument; `nil` counts as an
/// empty sequence.
pub fn concat(args: &[Value]) -> Result<Value, MalError> {
    let mut items = Vec::new();
    for arg in args {
        match arg {
            Value::Nil => {}
            other => items.extend_from_slice(as_seq("concat", other)?),
        }
    }
    Ok(Value::list(items))
}

/// A vector with the same elements; the identity on vectors.
pub fn vec(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [Value::Vector(..)] => Ok(args[0].clone()),
        [Value::List(items, _)] => Ok(Value::vector(items.to_vec())),
        [Value::Nil] => Ok(Value::vector(vec![])),
        [other] => Err(MalError::type_error("vec", "sequence", other)),
        _ => Err(MalError::arity("1", args.len())),
    }
}

pub fn nth(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [seq, Value::Int(index)] => {
            let items = as_seq("nth", seq)?;
            usize::try_from(*index)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .ok_or_else(|| {
                    MalError::Argument(format!("nth: index {} out of range", index))
                })
        }
        [_, other] => Err(MalError::type_error("nth", "number", other)),
        _ => Err(MalError::arity("2", args.len())),
    }
}

/// First element, or `nil` for an empty sequence or `nil`.
pub fn first(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [Value::Nil] => Ok(Value::Nil),
        [seq] => Ok(as_seq("first", seq)?.first().cloned().unwrap_or(Value::Nil)),
        _ => Err(MalError::arity("1", args.len())),
    }
}

/// Everything after the first element as a list; empty for an empty
/// sequence or `nil`.
pub fn rest(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [Value::Nil] => Ok(Value::list(vec![])),
        [seq] => {
            let items = as_seq("rest", seq)?;
            Ok(Value::list(items.get(1..).unwrap_or(&[]).to_vec()))
        }
        _ => Err(MalError::arity("1", args.len())),
    }
}

pub fn count(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [Value::Nil] => Ok(Value::Int(0)),
        [seq] => Ok(Value::Int(as_seq("count", seq)?.len() as i64)),
        _ => Err(MalError::arity("1", args.len())),
    }
}

/// Prepends each element in order onto a list (so the result reads
/// reversed), or appends onto a vector.
pub fn conj(args: &[Value]) -> Result<Value, MalError> {
    let (target, rest) = args
        .split_first()
        .ok_or_else(|| MalError::arity("at least 1", args.len()))?;
    match target {
        Value::List(items, _) => {
            let mut result: Vec<Value> = rest.iter().rev().cloned().collect();
            result.extend_from_slice(items);
            Ok(Value::list(result))
        }
        Value::Vector(items, _) => {
            let mut result = items.to_vec();
            result.extend_from_slice(rest);
            Ok(Value::vector(result))
        }
        other => Err(MalError::type_error("conj", "sequence", other)),
    }
}

/// A list view of a value: characters of a non-empty string, elements
/// of a non-empty sequence, `nil` for anything empty or `nil` itself.
pub fn seq(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [Value::Nil] => Ok(Value::Nil),
        [Value::Str(s)] => {
            if s.is_empty() {
                Ok(Value::Nil)
            } else {
                Ok(Value::list(
                    s.chars().map(|c| Value::Str(c.to_string())).collect(),
                ))
            }
        }
        [value @ (Value::List(..) | Value::Vector(..))] => {
            let items = as_seq("seq", value)?;
            if items.is_empty() {
                Ok(Value::Nil)
            } else {
                Ok(Value::list(items.to_vec()))
            }
        }
        [other] => Err(MalError::type_error("seq", "sequence or string", other)),
        _ => Err(MalError::arity("1", args.len())),
    }
}

/// `(apply f a b (c d))` calls `f` with `a b c d`: the final sequence
/// argument is flattened into the call.
pub fn apply(args: &[Value]) -> Result<Value, MalError> {
    if args.len() < 2 {
        return Err(MalError::arity("at least 2", args.len()));
    }
    let func = &args[0];
    let last = &args[args.len() - 1];
    let mut call_args = args[1..args.len() - 1].to_vec();
    call_args.extend_from_slice(as_seq("apply", last)?);
    eval::apply(func, &call_args)
}

pub fn map(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [func, seq] => {
            let items = as_seq("map", seq)?;
            let mut result = Vec::with_capacity(items.len());
            for item in items {
                result.push(eval::apply(func, &[item.clone()])?);
            }
            Ok(Value::list(result))
        }
        _ => Err(MalError::arity("2", args.len())),
    }
}

/// Register all sequence builtins in the environment.
pub fn register(env: &Rc<Env>) {
    env.set("list", Value::builtin("list", list));
    env.set("vector", Value::builtin("vector", vector));
    env.set("cons", Value::builtin("cons", cons));
    env.set("concat", Value::builtin("concat", concat));
    env.set("vec", Value::builtin("vec", vec));
    env.set("nth", Value::builtin("nth", nth));
    env.set("first", Value::builtin("first", first));
    env.set("rest", Value::builtin("rest", rest));
    env.set("count", Value::builtin("count", count));
    env.set("conj", Value::builtin("conj", conj));
    env.set("seq", Value::builtin("seq", seq));
    env.set("apply", Value::builtin("apply", apply));
    env.set("map", Value::builtin("map", map));
}
