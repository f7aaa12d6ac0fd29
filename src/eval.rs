// ABOUTME: Evaluator module with tail-call optimization, macros, and quasiquote

use crate::env::Env;
use crate::error::MalError;
use crate::printer::pr_str;
use crate::value::{Closure, Value};
use log::trace;
use std::rc::Rc;

/// Evaluates `ast` in `env`.
///
/// Tail positions (`let*`/`do`/`if` bodies, `quasiquote` expansions,
/// closure calls, `catch*` handlers) reassign `ast` and `env` and loop
/// instead of recursing, so tail-recursive programs run in constant
/// stack space. Only non-tail subexpressions recurse.
pub fn eval(mut ast: Value, mut env: Rc<Env>) -> Result<Value, MalError> {
    loop {
        trace!("eval {}", pr_str(&ast, true));

        if !matches!(ast, Value::List(..)) {
            return eval_ast(&ast, &env);
        }
        ast = macroexpand(ast, &env)?;
        let items = match &ast {
            Value::List(items, _) => {
                if items.is_empty() {
                    return Ok(ast.clone());
                }
                items.clone()
            }
            _ => return eval_ast(&ast, &env),
        };

        let head = match &items[0] {
            Value::Sym(name) => Some(name.as_str()),
            _ => None,
        };
        match head {
            Some("def!") => {
                if items.len() != 3 {
                    return Err(MalError::SpecialForm(
                        "def! expects a symbol and a value".to_string(),
                    ));
                }
                let name = expect_symbol(&items[1], "def!")?;
                let value = eval(items[2].clone(), env.clone())?;
                env.set(name, value.clone());
                return Ok(value);
            }
            Some("let*") => {
                if items.len() != 3 {
                    return Err(MalError::SpecialForm(
                        "let* expects a binding sequence and a body".to_string(),
                    ));
                }
                let bindings = items[1].as_seq().ok_or_else(|| {
                    MalError::SpecialForm("let* bindings must be a sequence".to_string())
                })?;
                if bindings.len() % 2 != 0 {
                    return Err(MalError::SpecialForm(
                        "let* bindings must pair symbols with values".to_string(),
                    ));
                }
                let new_env = Env::with_outer(env.clone());
                // Sequential: each value sees the bindings before it.
                for pair in bindings.chunks(2) {
                    let name = expect_symbol(&pair[0], "let*")?;
                    let value = eval(pair[1].clone(), new_env.clone())?;
                    new_env.set(name, value);
                }
                env = new_env;
                ast = items[2].clone();
            }
            Some("do") => {
                if items.len() == 1 {
                    return Ok(Value::Nil);
                }
                for expr in &items[1..items.len() - 1] {
                    eval(expr.clone(), env.clone())?;
                }
                ast = items[items.len() - 1].clone();
            }
            Some("if") => {
                if !(3..=4).contains(&items.len()) {
                    return Err(MalError::SpecialForm(
                        "if expects a condition and one or two branches".to_string(),
                    ));
                }
                let condition = eval(items[1].clone(), env.clone())?;
                ast = if condition.is_truthy() {
                    items[2].clone()
                } else {
                    items.get(3).cloned().unwrap_or(Value::Nil)
                };
            }
            Some("fn*") => return make_closure(&items, &env),
            Some("quote") => {
                if items.len() != 2 {
                    return Err(MalError::SpecialForm(
                        "quote expects a single form".to_string(),
                    ));
                }
                return Ok(items[1].clone());
            }
            Some("quasiquote") => {
                if items.len() != 2 {
                    return Err(MalError::SpecialForm(
                        "quasiquote expects a single form".to_string(),
                    ));
                }
                ast = quasiquote(&items[1]);
            }
            Some("defmacro!") => {
                if items.len() != 3 {
                    return Err(MalError::SpecialForm(
                        "defmacro! expects a symbol and a fn* form".to_string(),
                    ));
                }
                let name = expect_symbol(&items[1], "defmacro!")?;
                let value = eval(items[2].clone(), env.clone())?;
                let closure = match &value {
                    Value::Closure(closure, _) => closure,
                    _ => {
                        return Err(MalError::SpecialForm(
                            "defmacro! expects a fn* form".to_string(),
                        ))
                    }
                };
                env.set(
                    name,
                    Value::Closure(
                        Rc::new(Closure {
                            params: closure.params.clone(),
                            body: closure.body.clone(),
                            env: closure.env.clone(),
                            is_macro: true,
                        }),
                        Rc::new(Value::Nil),
                    ),
                );
                return Ok(Value::Nil);
            }
            Some("macroexpand") => {
                if items.len() != 2 {
                    return Err(MalError::SpecialForm(
                        "macroexpand expects a single form".to_string(),
                    ));
                }
                return macroexpand(items[1].clone(), &env);
            }
            Some("try*") => match items.len() {
                2 => return eval(items[1].clone(), env.clone()),
                3 => match eval(items[1].clone(), env.clone()) {
                    Ok(value) => return Ok(value),
                    Err(raised) => {
                        let catch = items[2]
                            .as_seq()
                            .filter(|clause| {
                                clause.len() == 3 && clause[0] == Value::symbol("catch*")
                            })
                            .ok_or_else(|| {
                                MalError::SpecialForm(
                                    "try* expects a (catch* sym handler) clause".to_string(),
                                )
                            })?;
                        let name = expect_symbol(&catch[1], "catch*")?;
                        let handler_env = Env::with_outer(env.clone());
                        handler_env.set(name, raised.into_payload());
                        ast = catch[2].clone();
                        env = handler_env;
                    }
                },
                _ => {
                    return Err(MalError::SpecialForm(
                        "try* expects a body and an optional catch* clause".to_string(),
                    ))
                }
            },
            _ => {
                let func = eval(items[0].clone(), env.clone())?;
                let mut args = Vec::with_capacity(items.len() - 1);
                for item in &items[1..] {
                    args.push(eval(item.clone(), env.clone())?);
                }
                match func {
                    Value::Builtin(builtin, _) => return (builtin.func)(&args),
                    Value::Closure(closure, _) => {
                        env = Env::bind(closure.env.clone(), &closure.params, &args)?;
                        ast = closure.body.clone();
                    }
                    other => return Err(MalError::type_error("call", "function", &other)),
                }
            }
        }
    }
}

/// Evaluates the non-list forms: symbols resolve, vector elements and
/// map values evaluate recursively, everything else is itself.
fn eval_ast(ast: &Value, env: &Rc<Env>) -> Result<Value, MalError> {
    match ast {
        Value::Sym(name) => env.get(name),
        Value::Vector(items, _) => {
            let evaluated = items
                .iter()
                .map(|item| eval(item.clone(), env.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::vector(evaluated))
        }
        Value::Map(entries, _) => {
            let mut evaluated = crate::value::MapEntries::with_capacity(entries.len());
            for (key, value) in entries.iter() {
                evaluated.insert(key.clone(), eval(value.clone(), env.clone())?);
            }
            Ok(Value::map(evaluated))
        }
        other => Ok(other.clone()),
    }
}

/// Calls a function value with already-evaluated arguments. Used for
/// the application fallthrough of `swap!`, `apply`, and `map`.
pub fn apply(func: &Value, args: &[Value]) -> Result<Value, MalError> {
    match func {
        Value::Builtin(builtin, _) => (builtin.func)(args),
        Value::Closure(closure, _) => apply_closure(closure, args),
        other => Err(MalError::type_error("call", "function", other)),
    }
}

fn apply_closure(closure: &Rc<Closure>, args: &[Value]) -> Result<Value, MalError> {
    let env = Env::bind(closure.env.clone(), &closure.params, args)?;
    eval(closure.body.clone(), env)
}

fn make_closure(items: &[Value], env: &Rc<Env>) -> Result<Value, MalError> {
    if items.len() != 3 {
        return Err(MalError::SpecialForm(
            "fn* expects a parameter sequence and a body".to_string(),
        ));
    }
    let params = items[1]
        .as_seq()
        .ok_or_else(|| MalError::SpecialForm("fn* parameters must be a sequence".to_string()))?
        .iter()
        .map(|param| expect_symbol(param, "fn*").map(str::to_string))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Closure(
        Rc::new(Closure {
            params,
            body: items[2].clone(),
            env: env.clone(),
            is_macro: false,
        }),
        Rc::new(Value::Nil),
    ))
}

/// Rewrites a quasiquoted form into code that constructs it, leaving
/// `unquote` escapes to evaluate and splicing `splice-unquote` ones.
fn quasiquote(ast: &Value) -> Value {
    match ast {
        Value::List(items, _) => {
            if items.len() == 2 && items[0] == Value::symbol("unquote") {
                return items[1].clone();
            }
            quasiquote_fold(items)
        }
        Value::Vector(items, _) => {
            Value::list(vec![Value::symbol("vec"), quasiquote_fold(items)])
        }
        Value::Sym(_) | Value::Map(..) => {
            Value::list(vec![Value::symbol("quote"), ast.clone()])
        }
        other => other.clone(),
    }
}

fn quasiquote_fold(items: &[Value]) -> Value {
    let mut acc = Value::list(vec![]);
    for elt in items.iter().rev() {
        acc = match elt {
            Value::List(inner, _)
                if inner.len() == 2 && inner[0] == Value::symbol("splice-unquote") =>
            {
                Value::list(vec![Value::symbol("concat"), inner[1].clone(), acc])
            }
            _ => Value::list(vec![Value::symbol("cons"), quasiquote(elt), acc]),
        };
    }
    acc
}

/// Replaces macro calls with their expansions until the head no longer
/// names a macro. Arguments are passed unevaluated.
pub fn macroexpand(mut ast: Value, env: &Rc<Env>) -> Result<Value, MalError> {
    while let Some((closure, args)) = as_macro_call(&ast, env) {
        ast = apply_closure(&closure, &args)?;
    }
    Ok(ast)
}

fn as_macro_call(ast: &Value, env: &Rc<Env>) -> Option<(Rc<Closure>, Vec<Value>)> {
    let items = match ast {
        Value::List(items, _) if !items.is_empty() => items,
        _ => return None,
    };
    let name = match &items[0] {
        Value::Sym(name) => name,
        _ => return None,
    };
    match env.get(name).ok()? {
        Value::Closure(closure, _) if closure.is_macro => Some((closure, items[1..].to_vec())),
        _ => None,
    }
}

fn expect_symbol<'a>(value: &'a Value, form: &str) -> Result<&'a str, MalError> {
    match value {
        Value::Sym(name) => Ok(name),
        other => Err(MalError::SpecialForm(format!(
            "{} expects a symbol, got {}",
            form,
            other.type_name()
        ))),
    }
}
