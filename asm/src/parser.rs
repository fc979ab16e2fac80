use arch::{op::OpKind, pseudo::Pseudo, Word, STACK_SIZE};

use crate::{
    error::{Error, ErrorKind},
    lexer::{LineLexer, Token, TokenKind},
};

// ----------------------------------------------------------------------------
// Line

#[derive(Debug, Clone)]
pub struct Line {
    /// 1-based source line number
    pub no: usize,
    pub raw: String,
    pub stmt: Option<Stmt>,
}

impl Line {
    pub fn parse(no: usize, raw: &str) -> Result<Self, Error> {
        let mut tokens = vec![];
        for (idx, token) in LineLexer::new(raw).enumerate() {
            match token {
                Ok(token) => tokens.push(token),
                // An unrecognised lexeme in op position is an unknown op, not just a bad token
                Err(ErrorKind::UnknownToken(text)) if idx == 0 => {
                    return Err(ErrorKind::UnknownOperation(text).at(no))
                }
                Err(kind) => return Err(kind.at(no)),
            }
        }
        let stmt = Stmt::parse(&tokens).map_err(|kind| kind.at(no))?;
        Ok(Line {
            no,
            raw: raw.to_string(),
            stmt,
        })
    }

    /// Instructions emitted by this line, in order.
    pub fn codes(&self) -> &[Code] {
        match &self.stmt {
            Some(Stmt::Code(codes)) => codes,
            _ => &[],
        }
    }

    /// Encoded size of this line in words.
    pub fn size(&self) -> usize {
        self.codes().iter().map(|code| code.op.size()).sum()
    }
}

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Label(String),
    /// One source instruction, possibly expanded into several
    Code(Vec<Code>),
}

impl Stmt {
    fn parse(tokens: &[Token]) -> Result<Option<Stmt>, ErrorKind> {
        let Some((head, args)) = tokens.split_first() else {
            return Ok(None);
        };
        match &head.kind {
            // main:
            TokenKind::Raw(text) if text.ends_with(':') => {
                if let Some(extra) = args.first() {
                    return Err(ErrorKind::UnexpectedArgument(extra.text.clone()));
                }
                let name = &text[..text.len() - 1];
                if !is_label_name(name) {
                    return Err(ErrorKind::InvalidLabel(name.to_string()));
                }
                Ok(Some(Stmt::Label(name.to_string())))
            }
            TokenKind::Raw(text) => match Pseudo::parse(text) {
                Ok(pseudo) => Ok(Some(Stmt::Code(expand(pseudo, text, args)?))),
                Err(_) => Err(ErrorKind::UnknownOperation(text.clone())),
            },
            TokenKind::Op(op) => Ok(Some(Stmt::Code(Code::parse(*op, &head.text, args)?))),
            TokenKind::Number(_) => Err(ErrorKind::UnknownOperation(head.text.clone())),
        }
    }
}

fn expand(pseudo: Pseudo, name: &str, args: &[Token]) -> Result<Vec<Code>, ErrorKind> {
    let arg = match args {
        [] => return Err(ErrorKind::MissingArgument(name.to_string())),
        [arg] => arg,
        [_, extra, ..] => return Err(ErrorKind::UnexpectedArgument(extra.text.clone())),
    };
    let count = match &arg.kind {
        TokenKind::Number(n) => Some(*n),
        _ => None,
    };
    match count {
        Some(n) if n.unsigned_abs() <= STACK_SIZE as u64 => Ok(pseudo
            .expand(n)
            .into_iter()
            .map(|op| Code { op, imm: None })
            .collect()),
        _ => Err(ErrorKind::InvalidCount(arg.text.clone())),
    }
}

fn is_label_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(head) if head.is_ascii_alphabetic() || head == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

// ----------------------------------------------------------------------------
// Operation

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub op: OpKind,
    pub imm: Option<Imm>,
}

impl Code {
    fn parse(op: OpKind, name: &str, args: &[Token]) -> Result<Vec<Code>, ErrorKind> {
        match args {
            [] if op.arity() == 0 => Ok(vec![Code { op, imm: None }]),
            [] => Err(ErrorKind::MissingArgument(name.to_string())),
            [arg] if op.arity() == 1 => Ok(vec![Code {
                op,
                imm: Some(Imm::parse(arg)?),
            }]),
            // jmp @loop => push @loop ; jmp
            [arg] if op.takes_target() => Ok(vec![
                Code {
                    op: OpKind::PUSH,
                    imm: Some(Imm::parse(arg)?),
                },
                Code { op, imm: None },
            ]),
            [arg] => Err(ErrorKind::UnexpectedArgument(arg.text.clone())),
            [_, extra, ..] => Err(ErrorKind::UnexpectedArgument(extra.text.clone())),
        }
    }
}

// ----------------------------------------------------------------------------
// Immediate

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imm {
    Literal(Word),
    Ref(Ref),
}

/// Symbolic address operand, erased by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ref {
    /// `@name`
    Label(String),
    /// `@+n` / `@-n`, counted in instructions from the referencing one
    Relative(i64),
    /// `@n`, first instruction of source line `n`
    Line(usize),
}

impl Imm {
    fn parse(token: &Token) -> Result<Imm, ErrorKind> {
        match &token.kind {
            TokenKind::Number(value) => Ok(Imm::Literal(*value as Word)),
            TokenKind::Raw(text) => match text.strip_prefix('@') {
                Some(body) => Ref::parse(body).map(Imm::Ref).ok_or_else(|| {
                    ErrorKind::ParseArgument(text.clone(), "address".to_string())
                }),
                None => Err(ErrorKind::ParseArgument(
                    text.clone(),
                    "immediate".to_string(),
                )),
            },
            TokenKind::Op(_) => Err(ErrorKind::ParseArgument(
                token.text.clone(),
                "immediate".to_string(),
            )),
        }
    }
}

impl Ref {
    fn parse(s: &str) -> Option<Ref> {
        if s.starts_with('+') || s.starts_with('-') {
            s.parse::<i64>().ok().map(Ref::Relative)
        } else if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            s.parse::<usize>().ok().map(Ref::Line)
        } else if is_label_name(s) {
            Some(Ref::Label(s.to_string()))
        } else {
            None
        }
    }
}

// ----------------------------------------------------------------------------
// Emission (pass 2)

/// A word of the program before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Word(Word),
    /// Placeholder for a reference made by instruction number `instr` on source line `line`
    Ref {
        line: usize,
        instr: usize,
        target: Ref,
    },
}

pub fn emit(lines: &[Line]) -> Vec<Slot> {
    let mut slots = vec![];
    let mut instr = 0;
    for line in lines {
        for code in line.codes() {
            slots.push(Slot::Word(code.op.into()));
            match &code.imm {
                Some(Imm::Literal(value)) => slots.push(Slot::Word(*value)),
                Some(Imm::Ref(target)) => slots.push(Slot::Ref {
                    line: line.no,
                    instr,
                    target: target.clone(),
                }),
                None => {}
            }
            instr += 1;
        }
    }
    slots
}
