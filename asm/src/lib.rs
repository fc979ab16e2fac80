pub mod dump;
pub mod error;
pub mod label;
pub mod lexer;
pub mod parser;
pub mod resolve;

use arch::Word;

pub use error::{Error, ErrorKind};
use label::Tables;
use parser::{emit, Line};
use resolve::resolve;

/// Output of a successful assembly, kept together for listings.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub lines: Vec<Line>,
    pub tables: Tables,
    pub words: Vec<Word>,
}

pub fn assemble(source: &str) -> Result<Assembly, Error> {
    tracing::trace!("parsing lines");
    let lines = source
        .lines()
        .enumerate()
        .map(|(idx, raw)| Line::parse(idx + 1, raw))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::trace!("starting pass 1");
    let tables = Tables::collect(&lines)?;
    tracing::debug!(
        labels = tables.labels().count(),
        instrs = tables.instr_count(),
        words = tables.len(),
        "collected tables"
    );

    tracing::trace!("starting pass 2");
    let slots = emit(&lines);

    tracing::trace!("resolving addresses");
    let words = resolve(&slots, &tables)?;

    Ok(Assembly {
        lines,
        tables,
        words,
    })
}

/// Assemble source text into an encoded program.
pub fn compile(source: &str) -> Result<Vec<Word>, Error> {
    assemble(source).map(|assembly| assembly.words)
}
