//! Compiled condition expressions.
//!
//! A condition narrows a trigger to events whose payload satisfies a boolean
//! expression. Conditions are parsed once, when the trigger is authored, so a
//! syntax error surfaces at save time and evaluation never fails.
//!
//! Grammar:
//! - Field access: dot notation relative to the payload (`status`, `data.title.iv`)
//! - Comparisons: `==`, `!=`, `>`, `<`, `>=`, `<=`
//! - Logical: `&&`, `||`, `!`, parentheses
//! - Literals: string (single or double quoted), number, bool, null
//! - Numeric comparison uses f64 coercion, so `1` and `1.0` are equal
//! - Parentheses and `!` nest at most [`MAX_NESTING`] levels deep
//!
//! Evaluation is fail-safe: a missing field resolves to `null`, a comparison
//! between mismatched types is `false`, and a payload that is not a JSON
//! object never matches.

use std::fmt;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors from parsing a condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    /// The expression is not well formed.
    #[error("parse error: {message}")]
    Parse {
        /// What went wrong and where.
        message: String,
    },
}

fn parse_error(message: impl Into<String>) -> ConditionError {
    ConditionError::Parse {
        message: message.into(),
    }
}

/// A parsed, immutable condition expression.
#[derive(Clone)]
pub struct Condition {
    source: String,
    expr: Expr,
}

impl Condition {
    /// Parse a condition expression.
    pub fn parse(source: &str) -> Result<Self, ConditionError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(parse_error("empty expression"));
        }
        let (expr, rest) = parse_or(&tokens, 0)?;
        if let Some(token) = rest.first() {
            return Err(parse_error(format!("unexpected token: {token}")));
        }
        Ok(Self {
            source: source.trim().to_string(),
            expr,
        })
    }

    /// The expression text as authored (trimmed).
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against an event payload.
    #[must_use]
    pub fn evaluate(&self, data: &Value) -> bool {
        if !data.is_object() {
            debug!(condition = %self.source, "payload is not an object, condition does not match");
            return false;
        }
        self.expr.eval(data).truthy()
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Condition {}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Condition").field(&self.source).finish()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tokens
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Path(String),
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    And,
    Or,
    Not,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => f.write_str(p),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Num(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
            Self::Eq => f.write_str("=="),
            Self::Ne => f.write_str("!="),
            Self::Gt => f.write_str(">"),
            Self::Lt => f.write_str("<"),
            Self::Ge => f.write_str(">="),
            Self::Le => f.write_str("<="),
            Self::And => f.write_str("&&"),
            Self::Or => f.write_str("||"),
            Self::Not => f.write_str("!"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ConditionError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let next = chars.get(i + 1).copied();
        match chars[i] {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '=' if next == Some('=') => {
                tokens.push(Token::Eq);
                i += 2;
            }
            '!' if next == Some('=') => {
                tokens.push(Token::Ne);
                i += 2;
            }
            '!' => {
                tokens.push(Token::Not);
                i += 1;
            }
            '>' if next == Some('=') => {
                tokens.push(Token::Ge);
                i += 2;
            }
            '>' => {
                tokens.push(Token::Gt);
                i += 1;
            }
            '<' if next == Some('=') => {
                tokens.push(Token::Le);
                i += 2;
            }
            '<' => {
                tokens.push(Token::Lt);
                i += 1;
            }
            '&' if next == Some('&') => {
                tokens.push(Token::And);
                i += 2;
            }
            '|' if next == Some('|') => {
                tokens.push(Token::Or);
                i += 2;
            }
            quote @ ('"' | '\'') => {
                let start = i + 1;
                let Some(len) = chars[start..].iter().position(|&c| c == quote) else {
                    return Err(parse_error("unterminated string literal"));
                };
                tokens.push(Token::Str(chars[start..start + len].iter().collect()));
                i = start + len + 1;
            }
            c if c.is_ascii_digit() || (c == '-' && next.is_some_and(|n| n.is_ascii_digit())) => {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let num = text
                    .parse::<f64>()
                    .map_err(|_| parse_error(format!("invalid number: {text}")))?;
                tokens.push(Token::Num(num));
            }
            c if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || matches!(chars[i], '_' | '.' | '$'))
                {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                if ident.ends_with('.') || ident.contains("..") {
                    return Err(parse_error(format!("invalid field path: {ident}")));
                }
                tokens.push(match ident.as_str() {
                    "true" => Token::Bool(true),
                    "false" => Token::Bool(false),
                    "null" => Token::Null,
                    _ => Token::Path(ident),
                });
            }
            other => return Err(parse_error(format!("unexpected character: {other}"))),
        }
    }
    Ok(tokens)
}

// ─────────────────────────────────────────────────────────────────────────────
// AST and parser. Precedence: ! > comparison > && > ||
// ─────────────────────────────────────────────────────────────────────────────

/// Deepest `(` / `!` nesting accepted by the parser.
///
/// `&&` and `||` chains are flat and do not count towards it.
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

#[derive(Debug, Clone)]
enum Expr {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
    Path(Vec<String>),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Compare(Box<Expr>, CompareOp, Box<Expr>),
}

type ParseResult<'a> = Result<(Expr, &'a [Token]), ConditionError>;

fn descend(level: usize) -> Result<usize, ConditionError> {
    if level >= MAX_NESTING {
        return Err(parse_error(format!(
            "expression nested too deeply (limit {MAX_NESTING})"
        )));
    }
    Ok(level + 1)
}

/// `or_expr = and_expr ( "||" and_expr )*`
fn parse_or(tokens: &[Token], level: usize) -> ParseResult<'_> {
    let (first, mut rest) = parse_and(tokens, level)?;
    let mut operands = vec![first];
    while rest.first() == Some(&Token::Or) {
        let (next, r) = parse_and(&rest[1..], level)?;
        operands.push(next);
        rest = r;
    }
    Ok((collapse(operands, Expr::Or), rest))
}

/// `and_expr = not_expr ( "&&" not_expr )*`
fn parse_and(tokens: &[Token], level: usize) -> ParseResult<'_> {
    let (first, mut rest) = parse_not(tokens, level)?;
    let mut operands = vec![first];
    while rest.first() == Some(&Token::And) {
        let (next, r) = parse_not(&rest[1..], level)?;
        operands.push(next);
        rest = r;
    }
    Ok((collapse(operands, Expr::And), rest))
}

fn collapse(mut operands: Vec<Expr>, join: fn(Vec<Expr>) -> Expr) -> Expr {
    if operands.len() == 1 {
        if let Some(only) = operands.pop() {
            return only;
        }
    }
    join(operands)
}

/// `not_expr = "!" not_expr | comparison`
fn parse_not(tokens: &[Token], level: usize) -> ParseResult<'_> {
    if tokens.first() == Some(&Token::Not) {
        let (inner, rest) = parse_not(&tokens[1..], descend(level)?)?;
        return Ok((Expr::Not(Box::new(inner)), rest));
    }
    parse_comparison(tokens, level)
}

/// `comparison = primary ( op primary )?`
fn parse_comparison(tokens: &[Token], level: usize) -> ParseResult<'_> {
    let (left, rest) = parse_primary(tokens, level)?;
    let op = match rest.first() {
        Some(Token::Eq) => CompareOp::Eq,
        Some(Token::Ne) => CompareOp::Ne,
        Some(Token::Gt) => CompareOp::Gt,
        Some(Token::Lt) => CompareOp::Lt,
        Some(Token::Ge) => CompareOp::Ge,
        Some(Token::Le) => CompareOp::Le,
        _ => return Ok((left, rest)),
    };
    let (right, rest) = parse_primary(&rest[1..], level)?;
    Ok((Expr::Compare(Box::new(left), op, Box::new(right)), rest))
}

/// `primary = literal | path | "(" or_expr ")"`
fn parse_primary(tokens: &[Token], level: usize) -> ParseResult<'_> {
    let Some(first) = tokens.first() else {
        return Err(parse_error("unexpected end of expression"));
    };
    let rest = &tokens[1..];
    match first {
        Token::Str(s) => Ok((Expr::Str(s.clone()), rest)),
        Token::Num(n) => Ok((Expr::Num(*n), rest)),
        Token::Bool(b) => Ok((Expr::Bool(*b), rest)),
        Token::Null => Ok((Expr::Null, rest)),
        Token::Path(p) => Ok((
            Expr::Path(p.split('.').map(ToString::to_string).collect()),
            rest,
        )),
        Token::LParen => {
            let (inner, rest) = parse_or(rest, descend(level)?)?;
            match rest.first() {
                Some(Token::RParen) => Ok((inner, &rest[1..])),
                _ => Err(parse_error("missing closing parenthesis")),
            }
        }
        other => Err(parse_error(format!("expected value, got {other}"))),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Evaluation
// ─────────────────────────────────────────────────────────────────────────────

/// Value produced while evaluating, borrowing from the payload where possible.
#[derive(Debug, Clone, Copy)]
enum Operand<'a> {
    Bool(bool),
    Num(f64),
    Str(&'a str),
    Null,
    Json(&'a Value),
}

impl Operand<'_> {
    fn truthy(self) -> bool {
        match self {
            Self::Bool(b) => b,
            Self::Null => false,
            Self::Num(n) => n != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::Json(_) => true,
        }
    }

    fn is_null(self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Expr {
    fn eval<'a>(&'a self, data: &'a Value) -> Operand<'a> {
        match self {
            Self::Str(s) => Operand::Str(s),
            Self::Num(n) => Operand::Num(*n),
            Self::Bool(b) => Operand::Bool(*b),
            Self::Null => Operand::Null,
            Self::Path(segments) => resolve_path(data, segments),
            Self::Not(inner) => Operand::Bool(!inner.eval(data).truthy()),
            Self::And(items) => Operand::Bool(items.iter().all(|e| e.eval(data).truthy())),
            Self::Or(items) => Operand::Bool(items.iter().any(|e| e.eval(data).truthy())),
            Self::Compare(l, op, r) => Operand::Bool(compare(l.eval(data), r.eval(data), *op)),
        }
    }
}

fn resolve_path<'a>(data: &'a Value, segments: &[String]) -> Operand<'a> {
    let mut current = data;
    for segment in segments {
        match current.get(segment.as_str()) {
            Some(v) => current = v,
            None => return Operand::Null,
        }
    }
    match current {
        Value::Null => Operand::Null,
        Value::Bool(b) => Operand::Bool(*b),
        Value::Number(n) => n.as_f64().map_or(Operand::Null, Operand::Num),
        Value::String(s) => Operand::Str(s),
        other => Operand::Json(other),
    }
}

fn compare(left: Operand<'_>, right: Operand<'_>, op: CompareOp) -> bool {
    if left.is_null() || right.is_null() {
        let both = left.is_null() && right.is_null();
        return match op {
            CompareOp::Eq => both,
            CompareOp::Ne => !both,
            _ => false,
        };
    }

    match (left, right) {
        (Operand::Num(l), Operand::Num(r)) => {
            let Some(ord) = l.partial_cmp(&r) else {
                return op == CompareOp::Ne;
            };
            match op {
                CompareOp::Eq => ord.is_eq(),
                CompareOp::Ne => ord.is_ne(),
                CompareOp::Gt => ord.is_gt(),
                CompareOp::Lt => ord.is_lt(),
                CompareOp::Ge => ord.is_ge(),
                CompareOp::Le => ord.is_le(),
            }
        }
        (Operand::Str(l), Operand::Str(r)) => match op {
            CompareOp::Eq => l == r,
            CompareOp::Ne => l != r,
            CompareOp::Gt => l > r,
            CompareOp::Lt => l < r,
            CompareOp::Ge => l >= r,
            CompareOp::Le => l <= r,
        },
        (Operand::Bool(l), Operand::Bool(r)) => match op {
            CompareOp::Eq => l == r,
            CompareOp::Ne => l != r,
            _ => false,
        },
        (Operand::Json(l), Operand::Json(r)) => match op {
            CompareOp::Eq => l == r,
            CompareOp::Ne => l != r,
            _ => false,
        },
        // Type mismatch
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
