// ABOUTME: Reader module tokenizing and parsing MAL source into values

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, one_of},
    combinator::recognize,
    sequence::preceded,
    IResult, Parser,
};

use crate::error::MalError;
use crate::value::{map_from_pairs, Value};

/// Characters that terminate an atom run. `~`, `^`, and `@` only act
/// as macro characters at the start of a token, so they may appear
/// inside symbols.
const ATOM_TERMINATORS: &str = "[]{}()'\"`,;";

#[derive(Debug, Clone)]
struct Token {
    text: String,
    pos: usize,
}

// ============================================================================
// Tokenizer
// ============================================================================

/// `~@` or one of the single-character specials.
fn lex_special(input: &str) -> IResult<&str, &str> {
    alt((tag("~@"), recognize(one_of("[]{}()'`~^@")))).parse(input)
}

/// A double-quoted string, possibly unterminated. The token keeps its
/// quotes; `read_atom` unescapes and rejects a missing closer.
fn lex_string(input: &str) -> IResult<&str, &str> {
    let (after, _) = char('"')(input)?;
    let mut chars = after.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => {
                let end = i + 1;
                return Ok((&after[end..], &input[..end + 1]));
            }
            _ => {}
        }
    }
    Ok(("", input))
}

/// A `;` comment running to end of line.
fn lex_comment(input: &str) -> IResult<&str, &str> {
    recognize(preceded(char(';'), take_while(|c| c != '\n'))).parse(input)
}

/// A run of non-special, non-whitespace characters: numbers, symbols,
/// keywords, `nil`, `true`, `false`.
fn lex_atom(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !ATOM_TERMINATORS.contains(c)).parse(input)
}

/// Splits the input into tokens, skipping whitespace, commas, and
/// comments. Each token records its byte offset for error messages.
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = input;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() {
            break;
        }
        let pos = input.len() - rest.len();
        match alt((lex_special, lex_string, lex_comment, lex_atom)).parse(rest) {
            Ok((next, text)) => {
                if !text.starts_with(';') {
                    tokens.push(Token {
                        text: text.to_string(),
                        pos,
                    });
                }
                rest = next;
            }
            // Every non-blank character is covered by some lexer above.
            Err(_) => break,
        }
    }
    tokens
}

// ============================================================================
// Parser
// ============================================================================

struct Reader {
    tokens: Vec<Token>,
    position: usize,
}

impl Reader {
    fn peek(&self) -> Result<&Token, MalError> {
        self.tokens
            .get(self.position)
            .ok_or_else(|| MalError::read("unexpected end of input"))
    }

    fn next(&mut self) -> Result<Token, MalError> {
        let token = self.peek()?.clone();
        self.position += 1;
        Ok(token)
    }
}

/// Parses the first complete form of `input`. Whitespace-only or
/// comment-only input reads as `nil`; trailing forms are ignored.
pub fn read_str(input: &str) -> Result<Value, MalError> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Ok(Value::Nil);
    }
    let mut reader = Reader {
        tokens,
        position: 0,
    };
    read_form(&mut reader)
}

fn read_form(reader: &mut Reader) -> Result<Value, MalError> {
    let (text, pos) = {
        let token = reader.peek()?;
        (token.text.clone(), token.pos)
    };
    match text.as_str() {
        "'" => read_shorthand(reader, "quote"),
        "`" => read_shorthand(reader, "quasiquote"),
        "~" => read_shorthand(reader, "unquote"),
        "~@" => read_shorthand(reader, "splice-unquote"),
        "@" => read_shorthand(reader, "deref"),
        "^" => {
            // Metadata is read first, target second, emitted swapped.
            reader.next()?;
            let meta = read_form(reader)?;
            let target = read_form(reader)?;
            Ok(Value::list(vec![
                Value::symbol("with-meta"),
                target,
                meta,
            ]))
        }
        "(" => Ok(Value::list(read_seq(reader, ")")?)),
        "[" => Ok(Value::vector(read_seq(reader, "]")?)),
        "{" => {
            let forms = read_seq(reader, "}")?;
            if forms.len() % 2 != 0 {
                return Err(MalError::read_at(
                    "map literal requires an even number of forms",
                    pos,
                ));
            }
            Ok(Value::map(map_from_pairs(&forms)?))
        }
        ")" | "]" | "}" => Err(MalError::read_at(format!("unexpected '{}'", text), pos)),
        _ => read_atom(reader),
    }
}

fn read_shorthand(reader: &mut Reader, name: &str) -> Result<Value, MalError> {
    reader.next()?;
    let form = read_form(reader)?;
    Ok(Value::list(vec![Value::symbol(name), form]))
}

fn read_seq(reader: &mut Reader, close: &str) -> Result<Vec<Value>, MalError> {
    let open = reader.next()?;
    let mut items = Vec::new();
    loop {
        let (text, pos) = match reader.peek() {
            Ok(token) => (token.text.clone(), token.pos),
            Err(_) => {
                return Err(MalError::read_at(
                    format!("unclosed '{}'", open.text),
                    open.pos,
                ))
            }
        };
        if text == close {
            reader.next()?;
            return Ok(items);
        }
        if matches!(text.as_str(), ")" | "]" | "}") {
            return Err(MalError::read_at(
                format!("mismatched '{}', expected '{}'", text, close),
                pos,
            ));
        }
        items.push(read_form(reader)?);
    }
}

fn read_atom(reader: &mut Reader) -> Result<Value, MalError> {
    let token = reader.next()?;
    let text = token.text.as_str();
    match text {
        "nil" => return Ok(Value::Nil),
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    if text.starts_with('"') {
        return unescape_string(text, token.pos);
    }
    if let Some(name) = text.strip_prefix(':') {
        return Ok(Value::Keyword(name.to_string()));
    }
    if is_number_token(text) {
        return Ok(parse_number(text));
    }
    Ok(Value::symbol(text))
}

fn is_number_token(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() {
        return false;
    }
    match digits.split_once('.') {
        None => digits.chars().all(|c| c.is_ascii_digit()),
        Some((whole, frac)) => {
            (!whole.is_empty() || !frac.is_empty())
                && whole.chars().all(|c| c.is_ascii_digit())
                && frac.chars().all(|c| c.is_ascii_digit())
        }
    }
}

fn parse_number(text: &str) -> Value {
    if !text.contains('.') {
        if let Ok(n) = text.parse::<i64>() {
            return Value::Int(n);
        }
    }
    // Whole floats (and integers too large for i64) normalize through
    // Value::number.
    text.parse::<f64>().map(Value::number).unwrap_or(Value::Nil)
}

fn unescape_string(text: &str, pos: usize) -> Result<Value, MalError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text[1..].chars();
    loop {
        match chars.next() {
            None => return Err(MalError::read_at("unterminated string", pos)),
            Some('"') => return Ok(Value::Str(out)),
            Some('\\') => match chars.next() {
                Some('n') => out.push('\n'),
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return Err(MalError::read_at("unterminated string", pos)),
            },
            Some(c) => out.push(c),
        }
    }
}
