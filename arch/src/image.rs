//! Binary image format shared by the assembler and the emulator:
//! the encoded program as consecutive little-endian words.

use thiserror::Error;

use crate::Word;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image length {0} is not a multiple of the word size")]
    Truncated(usize),
}

pub fn to_bytes(program: &[Word]) -> Vec<u8> {
    program.iter().flat_map(|word| word.to_le_bytes()).collect()
}

pub fn from_bytes(bytes: &[u8]) -> Result<Vec<Word>, ImageError> {
    let size = std::mem::size_of::<Word>();
    if bytes.len() % size != 0 {
        return Err(ImageError::Truncated(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(size)
        .map(|chunk| Word::from_le_bytes([chunk[0], chunk[1]]))
        .collect())
}
