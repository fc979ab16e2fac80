use color_print::cprintln;
use thiserror::Error;

/// A compile error, tied to the 1-based source line that caused it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct Error {
    pub line: usize,
    pub kind: ErrorKind,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    // Lex
    #[error("Unknown token: `{0}`")]
    UnknownToken(String),

    // Assemble
    #[error("Unknown operation: `{0}`")]
    UnknownOperation(String),

    #[error("More argument required for `{0}`")]
    MissingArgument(String),

    #[error("Unexpected argument: `{0}`")]
    UnexpectedArgument(String),

    #[error("Cannot parse `{0}` as {1}")]
    ParseArgument(String, String),

    #[error("Invalid count: `{0}`")]
    InvalidCount(String),

    #[error("Invalid label name: `{0}`")]
    InvalidLabel(String),

    #[error("Re-defined label: `{0}`")]
    RedefinedLabel(String),

    // Resolve
    #[error("Undefined label: `{0}`")]
    UndefinedLabel(String),

    #[error("Unknown line number: {0}")]
    UnknownLineNumber(usize),

    #[error("Address out of bounds: {0:+}")]
    AddressOutOfBounds(i64),
}

impl ErrorKind {
    pub fn at(self, line: usize) -> Error {
        Error { line, kind: self }
    }
}

impl Error {
    /// Print error with diagnostic information showing file location and line content
    pub fn print_diag(&self, file: &str, source: &str) {
        cprintln!("<red,bold>error</>: {}", self.kind);

        cprintln!("     <blue>--></> <underline>{}:{}</>", file, self.line);
        cprintln!("      <blue>|</>");

        let line_content = source
            .lines()
            .nth(self.line.saturating_sub(1))
            .unwrap_or("");

        cprintln!(" <blue>{:>4} |</> {}", self.line, line_content);
        cprintln!("      <blue>|</>");
    }
}
