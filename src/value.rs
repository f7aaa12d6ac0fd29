// ABOUTME: Value types representing MAL data structures and code forms

use crate::env::Env;
use crate::error::MalError;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Key of a hash-map. Only strings and keywords may be used as keys;
/// the reader and `hash-map`/`assoc` reject anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Str(String),
    Keyword(String),
}

impl MapKey {
    pub fn from_value(value: &Value) -> Result<MapKey, MalError> {
        match value {
            Value::Str(s) => Ok(MapKey::Str(s.clone())),
            Value::Keyword(k) => Ok(MapKey::Keyword(k.clone())),
            other => Err(MalError::type_error(
                "hash-map",
                "string or keyword key",
                other,
            )),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            MapKey::Str(s) => Value::Str(s.clone()),
            MapKey::Keyword(k) => Value::Keyword(k.clone()),
        }
    }
}

pub type MapEntries = IndexMap<MapKey, Value>;

/// A function implemented in Rust. Most builtins are plain `fn` items;
/// `eval` is a closure holding a handle to its interpreter's root
/// environment.
pub struct Builtin {
    pub name: &'static str,
    pub func: Box<dyn Fn(&[Value]) -> Result<Value, MalError>>,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// A user-defined function created by `fn*`. The defining environment
/// is captured by reference; `is_macro` is set on the copy bound by
/// `defmacro!`.
pub struct Closure {
    pub params: Vec<String>,
    pub body: Value,
    pub env: Rc<Env>,
    pub is_macro: bool,
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .field("is_macro", &self.is_macro)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Sym(String),
    Keyword(String),
    List(Rc<Vec<Value>>, Rc<Value>),
    Vector(Rc<Vec<Value>>, Rc<Value>),
    Map(Rc<MapEntries>, Rc<Value>),
    Atom(Rc<RefCell<Value>>),
    Builtin(Rc<Builtin>, Rc<Value>),
    Closure(Rc<Closure>, Rc<Value>),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items), Rc::new(Value::Nil))
    }

    pub fn vector(items: Vec<Value>) -> Value {
        Value::Vector(Rc::new(items), Rc::new(Value::Nil))
    }

    pub fn map(entries: MapEntries) -> Value {
        Value::Map(Rc::new(entries), Rc::new(Value::Nil))
    }

    pub fn symbol(name: impl Into<String>) -> Value {
        Value::Sym(name.into())
    }

    pub fn string(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    pub fn atom(value: Value) -> Value {
        Value::Atom(Rc::new(RefCell::new(value)))
    }

    pub fn builtin(name: &'static str, func: fn(&[Value]) -> Result<Value, MalError>) -> Value {
        Value::closure_builtin(name, func)
    }

    pub fn closure_builtin(
        name: &'static str,
        func: impl Fn(&[Value]) -> Result<Value, MalError> + 'static,
    ) -> Value {
        Value::Builtin(
            Rc::new(Builtin {
                name,
                func: Box::new(func),
            }),
            Rc::new(Value::Nil),
        )
    }

    /// Numbers that come out whole collapse back to integers, so
    /// `(/ 8 2)` is `4` while `(/ 7 2)` stays `3.5`.
    pub fn number(n: f64) -> Value {
        if n.fract() == 0.0 && n.is_finite() && n >= i64::MIN as f64 && n < i64::MAX as f64 {
            Value::Int(n as i64)
        } else {
            Value::Float(n)
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::Float(_) => "number",
            Value::Str(_) => "string",
            Value::Sym(_) => "symbol",
            Value::Keyword(_) => "keyword",
            Value::List(..) => "list",
            Value::Vector(..) => "vector",
            Value::Map(..) => "hash-map",
            Value::Atom(_) => "atom",
            Value::Builtin(..) | Value::Closure(..) => "function",
        }
    }

    /// Only `false` and `nil` are falsey; `0`, `""`, and empty
    /// collections are all truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// The elements of a list or vector, `None` for anything else.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::List(items, _) | Value::Vector(items, _) => Some(items),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// The metadata slot, for types that carry one.
    pub fn meta(&self) -> Result<Value, MalError> {
        match self {
            Value::List(_, meta)
            | Value::Vector(_, meta)
            | Value::Map(_, meta)
            | Value::Builtin(_, meta)
            | Value::Closure(_, meta) => Ok((**meta).clone()),
            other => Err(MalError::type_error("meta", "collection or function", other)),
        }
    }

    /// Shallow copy with the metadata slot replaced. The original
    /// value is unchanged.
    pub fn with_meta(&self, meta: Value) -> Result<Value, MalError> {
        let meta = Rc::new(meta);
        match self {
            Value::List(items, _) => Ok(Value::List(items.clone(), meta)),
            Value::Vector(items, _) => Ok(Value::Vector(items.clone(), meta)),
            Value::Map(entries, _) => Ok(Value::Map(entries.clone(), meta)),
            Value::Builtin(b, _) => Ok(Value::Builtin(b.clone(), meta)),
            Value::Closure(c, _) => Ok(Value::Closure(c.clone(), meta)),
            other => Err(MalError::type_error(
                "with-meta",
                "collection or function",
                other,
            )),
        }
    }
}

/// Pair an even run of forms into map entries, checking key types.
pub fn map_from_pairs(forms: &[Value]) -> Result<MapEntries, MalError> {
    if forms.len() % 2 != 0 {
        return Err(MalError::Argument(
            "hash-map requires an even number of forms".to_string(),
        ));
    }
    let mut entries = MapEntries::with_capacity(forms.len() / 2);
    for pair in forms.chunks(2) {
        entries.insert(MapKey::from_value(&pair[0])?, pair[1].clone());
    }
    Ok(entries)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Sym(a), Value::Sym(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            // Lists and vectors compare element-wise regardless of kind.
            (
                Value::List(a, _) | Value::Vector(a, _),
                Value::List(b, _) | Value::Vector(b, _),
            ) => a == b,
            (Value::Map(a, _), Value::Map(b, _)) => a == b,
            (Value::Atom(a), Value::Atom(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a, _), Value::Builtin(b, _)) => Rc::ptr_eq(a, b),
            (Value::Closure(a, _), Value::Closure(b, _)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::printer::pr_str(self, true))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::printer::pr_str(self, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Int(0).is_truthy());
        assert!(Value::Str(String::new()).is_truthy());
        assert!(Value::list(vec![]).is_truthy());
    }

    #[test]
    fn test_number_normalization() {
        assert_eq!(Value::number(4.0), Value::Int(4));
        assert_eq!(Value::number(3.5), Value::Float(3.5));
        assert_eq!(Value::number(-0.5), Value::Float(-0.5));
    }

    #[test]
    fn test_list_vector_cross_equality() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2)]);
        let vector = Value::vector(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(list, vector);

        let shorter = Value::vector(vec![Value::Int(1)]);
        assert_ne!(list, shorter);
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let a = map_from_pairs(&[
            Value::Keyword("a".to_string()),
            Value::Int(1),
            Value::Keyword("b".to_string()),
            Value::Int(2),
        ])
        .unwrap();
        let b = map_from_pairs(&[
            Value::Keyword("b".to_string()),
            Value::Int(2),
            Value::Keyword("a".to_string()),
            Value::Int(1),
        ])
        .unwrap();
        assert_eq!(Value::map(a), Value::map(b));
    }

    #[test]
    fn test_atom_identity_equality() {
        let a = Value::atom(Value::Int(1));
        let b = Value::atom(Value::Int(1));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_map_rejects_non_string_keys() {
        let result = map_from_pairs(&[Value::Int(1), Value::Int(2)]);
        assert!(matches!(result, Err(MalError::Type { .. })));
    }

    #[test]
    fn test_with_meta_replaces_without_mutating() {
        let original = Value::list(vec![Value::Int(1)]);
        let tagged = original
            .with_meta(Value::Keyword("tag".to_string()))
            .unwrap();
        assert_eq!(original.meta().unwrap(), Value::Nil);
        assert_eq!(tagged.meta().unwrap(), Value::Keyword("tag".to_string()));
        assert_eq!(original, tagged);
    }

    #[test]
    fn test_with_meta_rejects_primitives() {
        assert!(Value::Int(1).with_meta(Value::Nil).is_err());
        assert!(Value::Nil.meta().is_err());
    }
}
