//! Type predicates and the symbol/keyword constructors

use crate::env::Env;
use crate::error::MalError;
use crate::value::Value;
use std::rc::Rc;

fn one_arg(args: &[Value]) -> Result<&Value, MalError> {
    match args {
        [arg] => Ok(arg),
        _ => Err(MalError::arity("1", args.len())),
    }
}

macro_rules! predicate {
    ($fn_name:ident, $pattern:pat) => {
        pub fn $fn_name(args: &[Value]) -> Result<Value, MalError> {
            let arg = one_arg(args)?;
            Ok(Value::Bool(matches!(arg, $pattern)))
        }
    };
}

predicate!(is_nil, Value::Nil);
predicate!(is_true, Value::Bool(true));
predicate!(is_false, Value::Bool(false));
predicate!(is_symbol, Value::Sym(_));
predicate!(is_keyword, Value::Keyword(_));
predicate!(is_string, Value::Str(_));
predicate!(is_number, Value::Int(_) | Value::Float(_));
predicate!(is_list, Value::List(..));
predicate!(is_vector, Value::Vector(..));
predicate!(is_sequential, Value::List(..) | Value::Vector(..));
predicate!(is_map, Value::Map(..));

pub fn is_fn(args: &[Value]) -> Result<Value, MalError> {
    let arg = one_arg(args)?;
    let result = match arg {
        Value::Builtin(..) => true,
        Value::Closure(closure, _) => !closure.is_macro,
        _ => false,
    };
    Ok(Value::Bool(result))
}

pub fn is_macro(args: &[Value]) -> Result<Value, MalError> {
    let arg = one_arg(args)?;
    let result = matches!(arg, Value::Closure(closure, _) if closure.is_macro);
    Ok(Value::Bool(result))
}

/// True for an empty list or vector; `nil` counts as empty.
pub fn is_empty(args: &[Value]) -> Result<Value, MalError> {
    let arg = one_arg(args)?;
    match arg {
        Value::Nil => Ok(Value::Bool(true)),
        _ => match arg.as_seq() {
            Some(items) => Ok(Value::Bool(items.is_empty())),
            None => Err(MalError::type_error("empty?", "sequence", arg)),
        },
    }
}

pub fn symbol(args: &[Value]) -> Result<Value, MalError> {
    match one_arg(args)? {
        Value::Str(name) => Ok(Value::symbol(name.clone())),
        Value::Sym(name) => Ok(Value::symbol(name.clone())),
        other => Err(MalError::type_error("symbol", "string", other)),
    }
}

pub fn keyword(args: &[Value]) -> Result<Value, MalError> {
    match one_arg(args)? {
        Value::Str(name) => Ok(Value::Keyword(name.clone())),
        Value::Keyword(name) => Ok(Value::Keyword(name.clone())),
        other => Err(MalError::type_error("keyword", "string", other)),
    }
}

/// Register all type builtins in the environment.
pub fn register(env: &Rc<Env>) {
    env.set("nil?", Value::builtin("nil?", is_nil));
    env.set("true?", Value::builtin("true?", is_true));
    env.set("false?", Value::builtin("false?", is_false));
    env.set("symbol?", Value::builtin("symbol?", is_symbol));
    env.set("keyword?", Value::builtin("keyword?", is_keyword));
    env.set("string?", Value::builtin("string?", is_string));
    env.set("number?", Value::builtin("number?", is_number));
    env.set("list?", Value::builtin("list?", is_list));
    env.set("vector?", Value::builtin("vector?", is_vector));
    env.set("sequential?", Value::builtin("sequential?", is_sequential));
    env.set("map?", Value::builtin("map?", is_map));
    env.set("fn?", Value::builtin("fn?", is_fn));
    env.set("macro?", Value::builtin("macro?", is_macro));
    env.set("empty?", Value::builtin("empty?", is_empty));
    env.set("symbol", Value::builtin("symbol", symbol));
    env.set("keyword", Value::builtin("keyword", keyword));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_predicates() {
        assert_eq!(is_nil(&[Value::Nil]).unwrap(), Value::Bool(true));
        assert_eq!(is_nil(&[Value::Int(0)]).unwrap(), Value::Bool(false));
        assert_eq!(is_true(&[Value::Bool(true)]).unwrap(), Value::Bool(true));
        assert_eq!(is_false(&[Value::Bool(false)]).unwrap(), Value::Bool(true));
        assert_eq!(is_false(&[Value::Nil]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_sequence_predicates() {
        let list = Value::list(vec![]);
        let vector = Value::vector(vec![]);
        assert_eq!(is_list(&[list.clone()]).unwrap(), Value::Bool(true));
        assert_eq!(is_list(&[vector.clone()]).unwrap(), Value::Bool(false));
        assert_eq!(is_vector(&[vector.clone()]).unwrap(), Value::Bool(true));
        assert_eq!(is_sequential(&[list]).unwrap(), Value::Bool(true));
        assert_eq!(is_sequential(&[vector]).unwrap(), Value::Bool(true));
        assert_eq!(is_sequential(&[Value::Int(1)]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_empty() {
        assert_eq!(is_empty(&[Value::list(vec![])]).unwrap(), Value::Bool(true));
        assert_eq!(
            is_empty(&[Value::list(vec![Value::Int(1)])]).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(is_empty(&[Value::Nil]).unwrap(), Value::Bool(true));
        assert!(is_empty(&[Value::Int(1)]).is_err());
    }

    #[test]
    fn test_symbol_and_keyword_constructors() {
        assert_eq!(symbol(&[Value::string("spam")]).unwrap(), Value::symbol("spam"));
        assert_eq!(
            keyword(&[Value::string("a")]).unwrap(),
            Value::Keyword("a".to_string())
        );
        // keyword on a keyword is the identity
        assert_eq!(
            keyword(&[Value::Keyword("a".to_string())]).unwrap(),
            Value::Keyword("a".to_string())
        );
        assert!(symbol(&[Value::Int(1)]).is_err());
    }

    #[test]
    fn test_fn_and_macro_predicates() {
        let builtin = Value::builtin("id", |args| Ok(args[0].clone()));
        assert_eq!(is_fn(&[builtin]).unwrap(), Value::Bool(true));
        assert_eq!(is_fn(&[Value::Int(1)]).unwrap(), Value::Bool(false));
        assert_eq!(is_macro(&[Value::Int(1)]).unwrap(), Value::Bool(false));
    }
}
