use arch::{image::ImageError, inst::DecodeError, op::OpKind, Word};
use thiserror::Error;

/// Fatal run-time conditions. The engine stops at the first one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Stack underflow on `{op}` at address {addr}")]
    StackUnderflow { op: OpKind, addr: usize },

    #[error("Stack overflow on `{op}` at address {addr}")]
    StackOverflow { op: OpKind, addr: usize },

    #[error("Stack pointer out of bounds on `{op}` at address {addr}")]
    StackPointerOutOfBounds { op: OpKind, addr: usize },

    #[error("Division by zero at address {addr}")]
    DivisionByZero { addr: usize },

    #[error("Unknown opcode 0x{word:04X} at address {addr}")]
    UnknownOpcode { word: Word, addr: usize },

    #[error("Missing operand for `{op}` at address {addr}")]
    MissingOperand { op: OpKind, addr: usize },

    #[error("Return address {ret} does not fit in a word, `{op}` at address {addr}")]
    ReturnAddressOutOfRange { op: OpKind, addr: usize, ret: usize },

    #[error("Program ended without halt: no instruction at address {addr}")]
    ProgramEndedWithoutHalt { addr: usize },

    #[error("Step limit exceeded: {0}")]
    StepLimitExceeded(u64),
}

impl Error {
    pub fn decode(err: DecodeError, addr: usize) -> Self {
        match err {
            DecodeError::UnknownOpcode(word) => Error::UnknownOpcode { word, addr },
            DecodeError::MissingOperand(op) => Error::MissingOperand { op, addr },
        }
    }
}

/// Failures while preparing a run from the command line.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read `{0}`: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Failed to parse config `{0}`: {1}")]
    Yaml(String, #[source] serde_yaml::Error),

    #[error("Broken image `{0}`: {1}")]
    Image(String, #[source] ImageError),
}
