use arch::{op::OpKind, pseudo::Pseudo};

use crate::error::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `123`, `-5`, `+4`, `0x1F`, `0b101`, `0o17`, `'a'`
    Number(i64),
    /// Keyword (`add`) or symbolic (`+`) spelling of an op
    Op(OpKind),
    /// Assembler-only forms left for the parser: `name:`, `@ref`, pseudo-ops
    Raw(String),
}

/// Splits one source line into tokens, lazily.
pub struct LineLexer<'a> {
    rest: &'a str,
}

impl<'a> LineLexer<'a> {
    pub fn new(line: &'a str) -> Self {
        let code = &line[..scan(line, |c| c == ';')];
        Self { rest: code }
    }
}

impl Iterator for LineLexer<'_> {
    type Item = Result<Token, ErrorKind>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rest = self.rest.trim_start();
        if self.rest.is_empty() {
            return None;
        }
        let (lexeme, rest) = self.rest.split_at(scan(self.rest, char::is_whitespace));
        self.rest = rest;
        Some(classify(lexeme))
    }
}

/// Byte index of the first `stop` char outside a character literal.
fn scan(s: &str, stop: impl Fn(char) -> bool) -> usize {
    let mut quoted = false;
    let mut chars = s.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' if quoted => {
                chars.next();
            }
            '\'' => quoted = !quoted,
            c if !quoted && stop(c) => return idx,
            _ => {}
        }
    }
    s.len()
}

pub fn classify(lexeme: &str) -> Result<Token, ErrorKind> {
    let kind = if let Some(value) = parse_number(lexeme) {
        TokenKind::Number(value)
    } else if let Ok(op) = OpKind::parse(lexeme) {
        TokenKind::Op(op)
    } else if let Some(op) = OpKind::from_symbol(lexeme) {
        TokenKind::Op(op)
    } else if is_assembler_form(lexeme) {
        TokenKind::Raw(lexeme.to_string())
    } else {
        return Err(ErrorKind::UnknownToken(lexeme.to_string()));
    };
    Ok(Token {
        kind,
        text: lexeme.to_string(),
    })
}

fn is_assembler_form(s: &str) -> bool {
    s.ends_with(':') || s.starts_with('@') || Pseudo::parse(s).is_ok()
}

/// Numeric literal in any of the supported spellings. Values wider than a
/// word are kept here and truncated when emitted.
pub fn parse_number(s: &str) -> Option<i64> {
    parse_int(s).or_else(|| parse_char(s))
}

fn parse_int(s: &str) -> Option<i64> {
    let (neg, body) = match s.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (radix, digits) = match body.get(..2) {
        Some("0x" | "0X") => (16, &body[2..]),
        Some("0b" | "0B") => (2, &body[2..]),
        Some("0o" | "0O") => (8, &body[2..]),
        _ => (10, body),
    };
    if digits.is_empty() {
        return None;
    }
    let value = digits.chars().try_fold(0_i64, |acc, c| {
        let digit = c.to_digit(radix)?;
        Some(acc.wrapping_mul(radix as i64).wrapping_add(digit as i64))
    })?;
    Some(if neg { value.wrapping_neg() } else { value })
}

fn parse_char(s: &str) -> Option<i64> {
    let inner = s.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars();
    let c = match chars.next()? {
        '\\' => match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            _ => return None,
        },
        c => c,
    };
    match chars.next() {
        Some(_) => None,
        None => Some(c as i64),
    }
}
