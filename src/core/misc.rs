//! Exceptions, metadata, and the clock

use crate::env::Env;
use crate::error::MalError;
use crate::value::Value;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Raises its argument as an exception; `catch*` binds it unchanged.
pub fn throw(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [value] => Err(MalError::Throw(value.clone())),
        _ => Err(MalError::arity("1", args.len())),
    }
}

pub fn meta(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [value] => value.meta(),
        _ => Err(MalError::arity("1", args.len())),
    }
}

pub fn with_meta(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [value, meta] => value.with_meta(meta.clone()),
        _ => Err(MalError::arity("2", args.len())),
    }
}

/// Milliseconds since the Unix epoch.
pub fn time_ms(args: &[Value]) -> Result<Value, MalError> {
    if !args.is_empty() {
        return Err(MalError::arity("0", args.len()));
    }
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    Ok(Value::Int(ms))
}

/// Register the remaining builtins in the environment.
pub fn register(env: &Rc<Env>) {
    env.set("throw", Value::builtin("throw", throw));
    env.set("meta", Value::builtin("meta", meta));
    env.set("with-meta", Value::builtin("with-meta", with_meta));
    env.set("time-ms", Value::builtin("time-ms", time_ms));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throw_carries_payload() {
        match throw(&[Value::Keyword("boom".to_string())]) {
            Err(MalError::Throw(payload)) => {
                assert_eq!(payload, Value::Keyword("boom".to_string()))
            }
            other => panic!("expected thrown value, got {:?}", other),
        }
    }

    #[test]
    fn test_meta_roundtrip() {
        let list = Value::list(vec![Value::Int(1)]);
        assert_eq!(meta(&[list.clone()]).unwrap(), Value::Nil);
        let tagged = with_meta(&[list, Value::Keyword("m".to_string())]).unwrap();
        assert_eq!(meta(&[tagged]).unwrap(), Value::Keyword("m".to_string()));
    }

    #[test]
    fn test_time_ms_is_monotonic_enough() {
        let a = time_ms(&[]).unwrap();
        let b = time_ms(&[]).unwrap();
        match (a, b) {
            (Value::Int(a), Value::Int(b)) => assert!(b >= a),
            other => panic!("expected integers, got {:?}", other),
        }
    }
}
