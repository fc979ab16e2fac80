pub mod image;
pub mod inst;
pub mod op;
pub mod pseudo;

/// A single unit of the encoded program and of the value stack.
pub type Word = u16;

/// Longest encodable program: every address must fit in a word.
pub const PROGRAM_SIZE: usize = Word::MAX as usize + 1;

/// Number of slots in the machine's value stack.
pub const STACK_SIZE: usize = 256;
