use arch::PROGRAM_SIZE;
use indexmap::IndexMap;

use crate::{
    error::{Error, ErrorKind},
    parser::{Line, Stmt},
};

/// Address tables built by pass 1. Read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    /// label -> address of the next instruction after its definition
    labels: IndexMap<String, usize>,
    /// source line -> address of the first instruction it emits
    lines: IndexMap<usize, usize>,
    /// instruction index -> address
    instrs: Vec<usize>,
    /// program length in words
    len: usize,
}

impl Tables {
    pub fn collect(lines: &[Line]) -> Result<Self, Error> {
        let mut tables = Tables::default();
        for line in lines {
            match &line.stmt {
                Some(Stmt::Label(name)) => {
                    if tables.labels.insert(name.clone(), tables.len).is_some() {
                        return Err(ErrorKind::RedefinedLabel(name.clone()).at(line.no));
                    }
                }
                Some(Stmt::Code(codes)) => {
                    if !codes.is_empty() {
                        tables.lines.insert(line.no, tables.len);
                    }
                    for code in codes {
                        tables.instrs.push(tables.len);
                        tables.len += code.op.size();
                    }
                    if tables.len > PROGRAM_SIZE {
                        let kind = ErrorKind::AddressOutOfBounds(PROGRAM_SIZE as i64);
                        return Err(kind.at(line.no));
                    }
                }
                None => {}
            }
        }
        Ok(tables)
    }

    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    pub fn line(&self, no: usize) -> Option<usize> {
        self.lines.get(&no).copied()
    }

    /// Address of the instruction `offset` instructions away from `instr`.
    pub fn instr(&self, instr: usize, offset: i64) -> Option<usize> {
        let idx = i64::try_from(instr).ok()?.checked_add(offset)?;
        self.instrs.get(usize::try_from(idx).ok()?).copied()
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, usize)> {
        self.labels.iter().map(|(name, addr)| (name.as_str(), *addr))
    }

    pub fn instr_count(&self) -> usize {
        self.instrs.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
