// ABOUTME: Environment module for lexical scopes and parameter binding

use crate::error::MalError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub struct Env {
    bindings: RefCell<HashMap<String, Value>>,
    outer: Option<Rc<Env>>,
}

impl Env {
    /// Creates a root environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Env {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    /// Creates a child environment chained to `outer`.
    pub fn with_outer(outer: Rc<Env>) -> Rc<Self> {
        Rc::new(Env {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Creates a child of `outer` with `params` bound to `args`.
    ///
    /// `&` in the parameter list must be followed by exactly one
    /// symbol, which collects the remaining arguments as a list.
    pub fn bind(outer: Rc<Env>, params: &[String], args: &[Value]) -> Result<Rc<Self>, MalError> {
        let env = Env::with_outer(outer);
        match params.iter().position(|p| p == "&") {
            None => {
                if params.len() != args.len() {
                    return Err(MalError::arity(params.len().to_string(), args.len()));
                }
                for (param, arg) in params.iter().zip(args) {
                    env.set(param, arg.clone());
                }
            }
            Some(fixed) => {
                if fixed + 2 != params.len() {
                    return Err(MalError::SpecialForm(
                        "& must be followed by exactly one binding".to_string(),
                    ));
                }
                if args.len() < fixed {
                    return Err(MalError::arity(format!("at least {}", fixed), args.len()));
                }
                for (param, arg) in params[..fixed].iter().zip(args) {
                    env.set(param, arg.clone());
                }
                env.set(&params[fixed + 1], Value::list(args[fixed..].to_vec()));
            }
        }
        Ok(env)
    }

    /// Defines a binding in THIS scope, shadowing any outer one.
    pub fn set(&self, name: &str, value: Value) {
        self.bindings.borrow_mut().insert(name.to_string(), value);
    }

    /// The innermost scope where `name` is bound, if any.
    pub fn find(self: Rc<Self>, name: &str) -> Option<Rc<Env>> {
        if self.bindings.borrow().contains_key(name) {
            return Some(self);
        }
        self.outer.clone().and_then(|outer| outer.find(name))
    }

    /// Looks `name` up through the scope chain.
    pub fn get(&self, name: &str) -> Result<Value, MalError> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Ok(value.clone());
        }
        match &self.outer {
            Some(outer) => outer.get(name),
            None => Err(MalError::NotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_set_and_get() {
        let env = Env::new();
        env.set("x", Value::Int(42));
        assert_eq!(env.get("x").unwrap(), Value::Int(42));
    }

    #[test]
    fn test_missing_symbol() {
        let env = Env::new();
        let err = env.get("missing").unwrap_err();
        assert_eq!(err.to_string(), "'missing' not found");
    }

    #[test]
    fn test_shadowing() {
        let parent = Env::new();
        parent.set("x", Value::Int(1));
        let child = Env::with_outer(parent.clone());
        child.set("x", Value::Int(2));

        assert_eq!(child.get("x").unwrap(), Value::Int(2));
        assert_eq!(parent.get("x").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_lookup_walks_outer_chain() {
        let grandparent = Env::new();
        grandparent.set("a", Value::Int(1));
        let parent = Env::with_outer(grandparent);
        let child = Env::with_outer(parent);
        assert_eq!(child.get("a").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_find_returns_owning_scope() {
        let parent = Env::new();
        parent.set("x", Value::Int(1));
        let child = Env::with_outer(parent.clone());
        let owner = child.clone().find("x").unwrap();
        assert!(Rc::ptr_eq(&owner, &parent));
        assert!(child.clone().find("y").is_none());
    }

    #[test]
    fn test_bind_exact() {
        let env = Env::bind(
            Env::new(),
            &params(&["a", "b"]),
            &[Value::Int(1), Value::Int(2)],
        )
        .unwrap();
        assert_eq!(env.get("a").unwrap(), Value::Int(1));
        assert_eq!(env.get("b").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_bind_arity_mismatch() {
        let result = Env::bind(Env::new(), &params(&["a", "b"]), &[Value::Int(1)]);
        assert!(matches!(result, Err(MalError::Arity { .. })));
    }

    #[test]
    fn test_bind_variadic() {
        let env = Env::bind(
            Env::new(),
            &params(&["a", "&", "rest"]),
            &[Value::Int(1), Value::Int(2), Value::Int(3)],
        )
        .unwrap();
        assert_eq!(env.get("a").unwrap(), Value::Int(1));
        assert_eq!(
            env.get("rest").unwrap(),
            Value::list(vec![Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn test_bind_variadic_empty_rest() {
        let env = Env::bind(Env::new(), &params(&["a", "&", "rest"]), &[Value::Int(1)]).unwrap();
        assert_eq!(env.get("rest").unwrap(), Value::list(vec![]));
    }

    #[test]
    fn test_bind_variadic_too_few_fixed() {
        let result = Env::bind(Env::new(), &params(&["a", "b", "&", "rest"]), &[Value::Int(1)]);
        assert!(matches!(result, Err(MalError::Arity { .. })));
    }

    #[test]
    fn test_bind_misplaced_ampersand() {
        let result = Env::bind(
            Env::new(),
            &params(&["a", "&", "b", "c"]),
            &[Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)],
        );
        assert!(matches!(result, Err(MalError::SpecialForm(_))));
    }
}
