// ABOUTME: Interpreter wiring reader, evaluator, and printer around a root environment

use crate::core;
use crate::env::Env;
use crate::error::MalError;
use crate::eval::eval;
use crate::printer::pr_str;
use crate::reader::read_str;
use crate::value::Value;
use log::debug;
use std::rc::Rc;

/// Language features defined in the language itself, evaluated when an
/// interpreter is built.
const PRELUDE: [&str; 3] = [
    "(def! not (fn* (a) (if a false true)))",
    r#"(def! load-file (fn* (f) (eval (read-string (str "(do " (slurp f) "\nnil)")))))"#,
    r#"(defmacro! cond (fn* (& xs) (if (> (count xs) 0) (list 'if (first xs) (if (> (count xs) 1) (nth xs 1) (throw "odd number of forms to cond")) (cons 'cond (rest (rest xs)))))))"#,
];

/// A self-contained interpreter instance: root environment, core
/// namespace, and prelude. Instances are independent, so several can
/// coexist in one process.
pub struct Interpreter {
    env: Rc<Env>,
}

impl Interpreter {
    pub fn new() -> Result<Self, MalError> {
        let env = Env::new();
        core::install(&env);

        // `eval` always runs in the root environment, never the
        // caller's, so the builtin closes over it here.
        let root = env.clone();
        env.set(
            "eval",
            Value::closure_builtin("eval", move |args| match args {
                [form] => eval(form.clone(), root.clone()),
                _ => Err(MalError::arity("1", args.len())),
            }),
        );
        env.set("*ARGV*", Value::list(vec![]));

        let interpreter = Interpreter { env };
        for form in PRELUDE {
            interpreter.rep(form)?;
        }
        debug!("interpreter ready");
        Ok(interpreter)
    }

    /// read → eval → print: the REPL's whole contract with the core.
    pub fn rep(&self, source: &str) -> Result<String, MalError> {
        let ast = read_str(source)?;
        let value = eval(ast, self.env.clone())?;
        Ok(pr_str(&value, true))
    }

    /// Evaluates an already-read form in the root environment.
    pub fn eval(&self, form: Value) -> Result<Value, MalError> {
        eval(form, self.env.clone())
    }

    /// Defines a global binding, as the CLI does for `*ARGV*` and
    /// `*FILENAME*`.
    pub fn define(&self, name: &str, value: Value) {
        self.env.set(name, value);
    }

    pub fn env(&self) -> &Rc<Env> {
        &self.env
    }
}
