use arch::Word;

use crate::{
    error::{Error, ErrorKind},
    label::Tables,
    parser::{Ref, Slot},
};

/// Replace every placeholder with its absolute address.
///
/// Runs to completion before anything executes: either every reference
/// resolves or the whole program is rejected.
pub fn resolve(slots: &[Slot], tables: &Tables) -> Result<Vec<Word>, Error> {
    slots
        .iter()
        .map(|slot| match slot {
            Slot::Word(word) => Ok(*word),
            Slot::Ref {
                line,
                instr,
                target,
            } => target.resolve(*instr, tables).map_err(|kind| kind.at(*line)),
        })
        .collect()
}

impl Ref {
    pub fn resolve(&self, instr: usize, tables: &Tables) -> Result<Word, ErrorKind> {
        let addr = match self {
            Ref::Label(name) => tables
                .label(name)
                .ok_or_else(|| ErrorKind::UndefinedLabel(name.clone()))?,
            Ref::Relative(offset) => tables
                .instr(instr, *offset)
                .ok_or(ErrorKind::AddressOutOfBounds(*offset))?,
            Ref::Line(no) => tables.line(*no).ok_or(ErrorKind::UnknownLineNumber(*no))?,
        };
        Word::try_from(addr).map_err(|_| ErrorKind::AddressOutOfBounds(addr as i64))
    }
}
