// ABOUTME: Printer module converting values back to source text

use crate::value::Value;

/// Renders a value. In readable mode strings are quoted and escaped so
/// the output reads back as an equal value; display mode prints string
/// contents raw.
pub fn pr_str(value: &Value, readable: bool) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Str(s) => {
            if readable {
                escape(s)
            } else {
                s.clone()
            }
        }
        Value::Sym(name) => name.clone(),
        Value::Keyword(name) => format!(":{}", name),
        Value::List(items, _) => format!("({})", pr_seq(items, readable)),
        Value::Vector(items, _) => format!("[{}]", pr_seq(items, readable)),
        Value::Map(entries, _) => {
            let body = entries
                .iter()
                .map(|(k, v)| {
                    format!("{} {}", pr_str(&k.to_value(), readable), pr_str(v, readable))
                })
                .collect::<Vec<_>>()
                .join(" ");
            format!("{{{}}}", body)
        }
        Value::Atom(cell) => format!("(atom {})", pr_str(&cell.borrow(), readable)),
        Value::Builtin(..) => "#function".to_string(),
        Value::Closure(closure, _) => {
            if closure.is_macro {
                "#macro".to_string()
            } else {
                "#function".to_string()
            }
        }
    }
}

/// Space-joined rendering of several values, as `prn` and `pr-str`
/// produce.
pub fn pr_seq(items: &[Value], readable: bool) -> String {
    items
        .iter()
        .map(|item| pr_str(item, readable))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
