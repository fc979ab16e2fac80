use color_print::cformat;
use thiserror::Error;

use crate::{op::OpKind, Word};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown opcode: 0x{0:04X}")]
    UnknownOpcode(Word),

    #[error("Missing operand for `{0}`")]
    MissingOperand(OpKind),
}

/// One decoded instruction of an encoded program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inst {
    pub addr: usize,
    pub op: OpKind,
    pub imm: Option<Word>,
}

impl Inst {
    /// Decode the instruction whose tag sits at `addr`.
    pub fn decode(program: &[Word], addr: usize) -> Result<Option<Inst>, DecodeError> {
        let Some(&tag) = program.get(addr) else {
            return Ok(None);
        };
        let op = OpKind::try_from(tag).map_err(|_| DecodeError::UnknownOpcode(tag))?;
        let imm = match op.arity() {
            0 => None,
            _ => Some(
                *program
                    .get(addr + 1)
                    .ok_or(DecodeError::MissingOperand(op))?,
            ),
        };
        Ok(Some(Inst { addr, op, imm }))
    }

    /// Address of the instruction that follows this one.
    pub fn next(&self) -> usize {
        self.addr + self.op.size()
    }

    /// Walk a whole program from address 0.
    pub fn disassemble(program: &[Word]) -> Disassemble<'_> {
        Disassemble { program, addr: 0 }
    }

    pub fn cformat(&self) -> String {
        match self.imm {
            Some(imm) => cformat!(
                "<r>{:<6}</><y>0x{:0>4X}</> <dim>({})</>",
                self.op.mnemonic(),
                imm,
                imm as i16
            ),
            None => cformat!("<r>{:<6}</>", self.op.mnemonic()),
        }
    }
}

pub struct Disassemble<'a> {
    program: &'a [Word],
    addr: usize,
}

impl Iterator for Disassemble<'_> {
    type Item = Result<Inst, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match Inst::decode(self.program, self.addr) {
            Ok(Some(inst)) => {
                self.addr = inst.next();
                Some(Ok(inst))
            }
            Ok(None) => None,
            Err(err) => {
                self.addr = self.program.len();
                Some(Err(err))
            }
        }
    }
}
