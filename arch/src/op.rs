use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString};

/// Opcode tags of the encoded program.
///
/// The discriminant is the word written to the program stream. The number of
/// immediate words following each tag is given by [`OpKind::arity`], which is
/// the only framing information the stream has.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u16)]
pub enum OpKind {
    NOP,
    PUSH,
    POP,

    ADD,
    SUB,
    MUL,
    DIV,
    INC,
    DEC,
    SHL,
    SHR,
    AND,
    OR,
    XOR,
    NOT,

    SWP,
    DUP,
    DUP2,
    OVER,
    ROT,

    SP,
    SPI,
    SPD,

    JMP,
    JMPZ,
    JMPNZ,
    JMPE,
    JMPNE,
    JMPG,
    JMPGE,
    JMPL,
    JMPLE,

    PROC,
    RET,

    DB,
    READ,
    WRITE,
    HALT,
    DEBUG,
}

impl OpKind {
    /// Case-insensitive keyword lookup.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_uppercase().parse::<Self>() {
            Ok(op) => Ok(op),
            Err(_) => Err(format!("Undefined Op: {s}")),
        }
    }

    /// Symbolic spelling lookup (`+`, `<<`, ...). Exact match only.
    pub fn from_symbol(s: &str) -> Option<Self> {
        use OpKind::*;
        match s {
            "+" => Some(ADD),
            "-" => Some(SUB),
            "*" => Some(MUL),
            "/" => Some(DIV),
            "++" => Some(INC),
            "--" => Some(DEC),
            "<<" => Some(SHL),
            ">>" => Some(SHR),
            "&" => Some(AND),
            "|" => Some(OR),
            "^" => Some(XOR),
            "~" => Some(NOT),
            _ => None,
        }
    }

    /// Number of immediate words that follow the tag.
    ///
    /// The assembler sizes instructions with this and the engine skips
    /// operands with it; both must read the same table.
    pub fn arity(&self) -> usize {
        use OpKind::*;
        match self {
            PUSH | DB => 1,
            _ => 0,
        }
    }

    /// Encoded size of the instruction in words.
    pub fn size(&self) -> usize {
        1 + self.arity()
    }

    /// Ops that pop their destination off the stack and therefore accept an
    /// inline target in source (`jmp @loop` is `push @loop` + `jmp`).
    pub fn takes_target(&self) -> bool {
        use OpKind::*;
        matches!(
            self,
            JMP | JMPZ | JMPNZ | JMPE | JMPNE | JMPG | JMPGE | JMPL | JMPLE | PROC
        )
    }

    pub fn mnemonic(&self) -> String {
        self.to_string().to_lowercase()
    }
}
