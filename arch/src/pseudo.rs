use strum::{Display, EnumString};

use crate::op::OpKind;

/// Source-level instructions that only exist in the assembler.
///
/// They never reach the encoded program; each expands into a fixed run of
/// primitive ops before addresses are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Pseudo {
    /// `spr +N` / `spr -N`: move the stack pointer by N slots.
    SPR,
}

impl Pseudo {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_uppercase().parse::<Self>() {
            Ok(p) => Ok(p),
            Err(_) => Err(format!("Undefined Pseudo Op: {s}")),
        }
    }

    pub fn expand(&self, count: i64) -> Vec<OpKind> {
        match self {
            Pseudo::SPR => {
                let op = if count < 0 { OpKind::SPD } else { OpKind::SPI };
                vec![op; count.unsigned_abs() as usize]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spr_expands_to_repeated_steps() {
        assert_eq!(Pseudo::SPR.expand(3), vec![OpKind::SPI; 3]);
        assert_eq!(Pseudo::SPR.expand(-2), vec![OpKind::SPD; 2]);
        assert!(Pseudo::SPR.expand(0).is_empty());
    }

    #[test]
    fn parse_ignores_case() {
        assert_eq!(Pseudo::parse("spr"), Ok(Pseudo::SPR));
        assert_eq!(Pseudo::parse("SpR"), Ok(Pseudo::SPR));
        assert!(Pseudo::parse("sp").is_err());
    }
}
