// ABOUTME: Error types for reading and evaluating MAL programs

use crate::value::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum MalError {
    /// Tokenization or parsing failure, with a byte position where one
    /// is known (mismatched brackets, stray closers).
    #[error("{message}{}", .position.map(|p| format!(" at position {}", p)).unwrap_or_default())]
    Read { message: String, position: Option<usize> },

    /// Symbol lookup miss.
    #[error("'{0}' not found")]
    NotFound(String),

    /// Wrong operand kind: arithmetic on a string, calling a
    /// non-function, an invalid map key.
    #[error("{context}: expected {expected}, got {actual}")]
    Type {
        context: String,
        expected: String,
        actual: String,
    },

    /// Wrong number of arguments to a function or binding form.
    #[error("expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    Arity { expected: String, actual: usize },

    /// Syntactically malformed special form.
    #[error("{0}")]
    SpecialForm(String),

    /// Out-of-range index, division by zero, bad file path.
    #[error("{0}")]
    Argument(String),

    /// A value raised by `(throw v)`; the payload is the value itself.
    #[error("{}", crate::printer::pr_str(.0, true))]
    Throw(Value),
}

impl MalError {
    pub fn read(message: impl Into<String>) -> Self {
        MalError::Read {
            message: message.into(),
            position: None,
        }
    }

    pub fn read_at(message: impl Into<String>, position: usize) -> Self {
        MalError::Read {
            message: message.into(),
            position: Some(position),
        }
    }

    pub fn type_error(context: &str, expected: &str, actual: &Value) -> Self {
        MalError::Type {
            context: context.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
        }
    }

    pub fn arity(expected: impl Into<String>, actual: usize) -> Self {
        MalError::Arity {
            expected: expected.into(),
            actual,
        }
    }

    /// The value a `catch*` clause binds: `throw` payloads pass
    /// through unchanged, every other error is caught as its message.
    pub fn into_payload(self) -> Value {
        match self {
            MalError::Throw(value) => value,
            other => Value::Str(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_positions() {
        assert_eq!(MalError::read("unexpected end of input").to_string(), "unexpected end of input");
        assert_eq!(
            MalError::read_at("unexpected ')'", 4).to_string(),
            "unexpected ')' at position 4"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = MalError::NotFound("spam".to_string());
        assert_eq!(err.to_string(), "'spam' not found");
    }

    #[test]
    fn test_arity_pluralization() {
        assert_eq!(
            MalError::arity("1", 3).to_string(),
            "expected 1 argument, got 3"
        );
        assert_eq!(
            MalError::arity("2", 1).to_string(),
            "expected 2 arguments, got 1"
        );
        assert_eq!(
            MalError::arity("at least 2", 0).to_string(),
            "expected at least 2 arguments, got 0"
        );
    }

    #[test]
    fn test_throw_payload_passes_through() {
        let err = MalError::Throw(Value::Keyword("boom".to_string()));
        assert_eq!(err.into_payload(), Value::Keyword("boom".to_string()));
    }

    #[test]
    fn test_builtin_error_payload_is_message_string() {
        let err = MalError::NotFound("x".to_string());
        assert_eq!(err.into_payload(), Value::Str("'x' not found".to_string()));
    }
}
