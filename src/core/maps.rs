//! Hash-map operations
//!
//! Maps keep insertion order for printing; keys are strings or
//! keywords only.

use crate::env::Env;
use crate::error::MalError;
use crate::value::{map_from_pairs, MapEntries, MapKey, Value};
use std::rc::Rc;

fn as_map<'a>(name: &str, value: &'a Value) -> Result<&'a MapEntries, MalError> {
    match value {
        Value::Map(entries, _) => Ok(entries),
        other => Err(MalError::type_error(name, "hash-map", other)),
    }
}

pub fn hash_map(args: &[Value]) -> Result<Value, MalError> {
    Ok(Value::map(map_from_pairs(args)?))
}

/// New map with the given key/value pairs added or replaced.
pub fn assoc(args: &[Value]) -> Result<Value, MalError> {
    let (map, pairs) = args
        .split_first()
        .ok_or_else(|| MalError::arity("at least 1", args.len()))?;
    let mut entries = as_map("assoc", map)?.clone();
    for (key, value) in map_from_pairs(pairs)? {
        entries.insert(key, value);
    }
    Ok(Value::map(entries))
}

/// New map without the given keys; missing keys are ignored.
pub fn dissoc(args: &[Value]) -> Result<Value, MalError> {
    let (map, keys) = args
        .split_first()
        .ok_or_else(|| MalError::arity("at least 1", args.len()))?;
    let mut entries = as_map("dissoc", map)?.clone();
    for key in keys {
        entries.shift_remove(&MapKey::from_value(key)?);
    }
    Ok(Value::map(entries))
}

/// Value at a key, `nil` when missing. `(get nil k)` is `nil`.
pub fn get(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [Value::Nil, _] => Ok(Value::Nil),
        [map, key] => {
            let entries = as_map("get", map)?;
            match MapKey::from_value(key) {
                Ok(key) => Ok(entries.get(&key).cloned().unwrap_or(Value::Nil)),
                Err(_) => Ok(Value::Nil),
            }
        }
        _ => Err(MalError::arity("2", args.len())),
    }
}

pub fn contains(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [Value::Nil, _] => Ok(Value::Bool(false)),
        [map, key] => {
            let entries = as_map("contains?", map)?;
            match MapKey::from_value(key) {
                Ok(key) => Ok(Value::Bool(entries.contains_key(&key))),
                Err(_) => Ok(Value::Bool(false)),
            }
        }
        _ => Err(MalError::arity("2", args.len())),
    }
}

pub fn keys(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [map] => {
            let entries = as_map("keys", map)?;
            Ok(Value::list(entries.keys().map(MapKey::to_value).collect()))
        }
        _ => Err(MalError::arity("1", args.len())),
    }
}

pub fn vals(args: &[Value]) -> Result<Value, MalError> {
    match args {
        [map] => {
            let entries = as_map("vals", map)?;
            Ok(Value::list(entries.values().cloned().collect()))
        }
        _ => Err(MalError::arity("1", args.len())),
    }
}

/// Register all hash-map builtins in the environment.
pub fn register(env: &Rc<Env>) {
    env.set("hash-map", Value::builtin("hash-map", hash_map));
    env.set("assoc", Value::builtin("assoc", assoc));
    env.set("dissoc", Value::builtin("dissoc", dissoc));
    env.set("get", Value::builtin("get", get));
    env.set("contains?", Value::builtin("contains?", contains));
    env.set("keys", Value::builtin("keys", keys));
    env.set("vals", Value::builtin("vals", vals));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        hash_map(&[
            Value::string("1"),
            Value::Int(2),
            Value::string("3"),
            Value::Int(4),
        ])
        .unwrap()
    }

    #[test]
    fn test_hash_map_and_get() {
        let map = sample();
        assert_eq!(
            get(&[map.clone(), Value::string("1")]).unwrap(),
            Value::Int(2)
        );
        assert_eq!(get(&[map, Value::string("2")]).unwrap(), Value::Nil);
        assert_eq!(get(&[Value::Nil, Value::string("1")]).unwrap(), Value::Nil);
    }

    #[test]
    fn test_hash_map_odd_arguments() {
        assert!(hash_map(&[Value::string("1")]).is_err());
    }

    #[test]
    fn test_contains() {
        let map = sample();
        assert_eq!(
            contains(&[map.clone(), Value::string("1")]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            contains(&[map, Value::string("2")]).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_assoc_leaves_original_unchanged() {
        let map = sample();
        let longer = assoc(&[map.clone(), Value::string("5"), Value::Int(6)]).unwrap();
        assert_eq!(
            get(&[longer.clone(), Value::string("5")]).unwrap(),
            Value::Int(6)
        );
        assert_eq!(get(&[map, Value::string("5")]).unwrap(), Value::Nil);
        assert_eq!(
            keys(&[longer]).unwrap(),
            Value::list(vec![
                Value::string("1"),
                Value::string("3"),
                Value::string("5"),
            ])
        );
    }

    #[test]
    fn test_dissoc_ignores_missing_keys() {
        let map = sample();
        let shorter = dissoc(&[map, Value::string("3"), Value::string("missing")]).unwrap();
        assert_eq!(keys(&[shorter]).unwrap(), Value::list(vec![Value::string("1")]));
    }

    #[test]
    fn test_keys_and_vals_in_insertion_order() {
        let map = sample();
        assert_eq!(
            keys(&[map.clone()]).unwrap(),
            Value::list(vec![Value::string("1"), Value::string("3")])
        );
        assert_eq!(
            vals(&[map]).unwrap(),
            Value::list(vec![Value::Int(2), Value::Int(4)])
        );
    }

    #[test]
    fn test_assoc_rejects_bad_keys() {
        assert!(assoc(&[sample(), Value::Int(1), Value::Int(2)]).is_err());
    }
}
