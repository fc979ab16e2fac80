use arch::{inst::Inst, op::OpKind, Word, STACK_SIZE};

use crate::{config::RunOptions, error::Error, hooks::Hook};

/// Interpreter state for one run over a borrowed, immutable program.
///
/// `sp` is the next free slot. `fp` follows pushes and pops but is not moved
/// by `spi`/`spd`, so `sp` can be placed relative to it with `sp`.
pub struct Machine<'a> {
    program: &'a [Word],
    stack: [Word; STACK_SIZE],
    sp: usize,
    fp: usize,
    ip: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Next,
    Halt,
}

impl<'a> Machine<'a> {
    pub fn new(program: &'a [Word]) -> Self {
        Machine {
            program,
            stack: [0; STACK_SIZE],
            sp: 0,
            fp: 0,
            ip: 0,
        }
    }

    pub fn program(&self) -> &[Word] {
        self.program
    }

    /// Whole stack, including slots above `sp`.
    pub fn stack(&self) -> &[Word] {
        &self.stack
    }

    /// Stack contents below `sp`.
    pub fn live(&self) -> &[Word] {
        &self.stack[..self.sp]
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn fp(&self) -> usize {
        self.fp
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Decode the instruction at `ip`.
    pub fn fetch(&self) -> Result<Inst, Error> {
        match Inst::decode(self.program, self.ip) {
            Ok(Some(inst)) => Ok(inst),
            Ok(None) => Err(Error::ProgramEndedWithoutHalt { addr: self.ip }),
            Err(err) => Err(Error::decode(err, self.ip)),
        }
    }

    /// Run until `halt` and return the stack.
    pub fn run(&mut self, options: &RunOptions, hooks: &mut dyn Hook) -> Result<Vec<Word>, Error> {
        hooks.init(self);
        let mut time = 0_u64;
        loop {
            let inst = self.fetch()?;
            if let Some(tmax) = options.tmax {
                if time >= tmax {
                    return Err(Error::StepLimitExceeded(tmax));
                }
            }
            if options.debug {
                hooks.exec(time, &inst, self);
            }
            if self.step(&inst, hooks)? == Flow::Halt {
                tracing::debug!(time, sp = self.sp, fp = self.fp, ip = inst.addr, "halted");
                return Ok(match options.shorten {
                    true => self.live().to_vec(),
                    false => self.stack.to_vec(),
                });
            }
            time += 1;
        }
    }

    /// Execute one decoded instruction. `ip` is moved past it first, so
    /// control-flow ops overwrite it and `proc` saves the following address.
    pub fn step(&mut self, inst: &Inst, hooks: &mut dyn Hook) -> Result<Flow, Error> {
        use OpKind::*;
        self.ip = inst.next();
        match inst.op {
            NOP | DB | READ => {}
            PUSH => {
                let imm = inst.imm.ok_or(Error::MissingOperand {
                    op: inst.op,
                    addr: inst.addr,
                })?;
                self.push(inst, imm)?;
            }
            POP => {
                self.pop(inst)?;
            }

            ADD | SUB | MUL | AND | OR | XOR => {
                let a = self.pop(inst)?;
                let b = self.pop(inst)?;
                let val = match inst.op {
                    ADD => b.wrapping_add(a),
                    SUB => b.wrapping_sub(a),
                    MUL => b.wrapping_mul(a),
                    AND => b & a,
                    OR => b | a,
                    _ => b ^ a,
                };
                self.push(inst, val)?;
            }
            DIV => {
                let a = self.pop(inst)?;
                let b = self.pop(inst)?;
                let val = b
                    .checked_div(a)
                    .ok_or(Error::DivisionByZero { addr: inst.addr })?;
                self.push(inst, val)?;
            }
            INC | DEC | SHL | SHR | NOT => {
                let a = self.pop(inst)?;
                let val = match inst.op {
                    INC => a.wrapping_add(1),
                    DEC => a.wrapping_sub(1),
                    SHL => a << 1,
                    SHR => a >> 1,
                    _ => !a,
                };
                self.push(inst, val)?;
            }

            SWP => {
                let a = self.pop(inst)?;
                let b = self.pop(inst)?;
                self.push_all(inst, &[a, b])?;
            }
            DUP => {
                let a = self.pop(inst)?;
                self.push_all(inst, &[a, a])?;
            }
            DUP2 => {
                let a = self.pop(inst)?;
                let b = self.pop(inst)?;
                self.push_all(inst, &[b, a, b, a])?;
            }
            OVER => {
                let a = self.pop(inst)?;
                let b = self.pop(inst)?;
                self.push_all(inst, &[b, a, b])?;
            }
            ROT => {
                let a = self.pop(inst)?;
                let b = self.pop(inst)?;
                let c = self.pop(inst)?;
                self.push_all(inst, &[b, a, c])?;
            }

            SP => {
                let a = self.pop(inst)?;
                let sp = (self.fp as i64) - i64::from(a);
                if !(0..=STACK_SIZE as i64).contains(&sp) {
                    return Err(Error::StackPointerOutOfBounds {
                        op: inst.op,
                        addr: inst.addr,
                    });
                }
                self.sp = sp as usize;
            }
            SPI => {
                if self.sp >= STACK_SIZE {
                    return Err(Error::StackOverflow {
                        op: inst.op,
                        addr: inst.addr,
                    });
                }
                self.sp += 1;
            }
            SPD => {
                if self.sp == 0 {
                    return Err(Error::StackUnderflow {
                        op: inst.op,
                        addr: inst.addr,
                    });
                }
                self.sp -= 1;
            }

            JMP => {
                let a = self.pop(inst)?;
                self.ip = a.into();
            }
            JMPZ | JMPNZ => {
                let a = self.pop(inst)?;
                let b = self.pop(inst)?;
                if (b == 0) == (inst.op == JMPZ) {
                    self.ip = a.into();
                }
            }
            JMPE | JMPNE | JMPG | JMPGE | JMPL | JMPLE => {
                let a = self.pop(inst)?;
                let b = self.pop(inst)?;
                let c = self.pop(inst)?;
                let taken = match inst.op {
                    JMPE => c == b,
                    JMPNE => c != b,
                    JMPG => c > b,
                    JMPGE => c >= b,
                    JMPL => c < b,
                    _ => c <= b,
                };
                if taken {
                    self.ip = a.into();
                }
            }
            PROC => {
                let a = self.pop(inst)?;
                let ret = Word::try_from(self.ip).map_err(|_| Error::ReturnAddressOutOfRange {
                    op: inst.op,
                    addr: inst.addr,
                    ret: self.ip,
                })?;
                self.push(inst, ret)?;
                self.ip = a.into();
            }
            RET => {
                let a = self.pop(inst)?;
                self.ip = a.into();
            }

            WRITE => {
                let a = self.pop(inst)?;
                hooks.write(a);
            }
            DEBUG => hooks.debug(self),
            HALT => return Ok(Flow::Halt),
        }
        Ok(Flow::Next)
    }

    fn push(&mut self, inst: &Inst, val: Word) -> Result<(), Error> {
        if self.sp >= STACK_SIZE {
            return Err(Error::StackOverflow {
                op: inst.op,
                addr: inst.addr,
            });
        }
        self.stack[self.sp] = val;
        self.sp += 1;
        self.fp += 1;
        Ok(())
    }

    fn push_all(&mut self, inst: &Inst, vals: &[Word]) -> Result<(), Error> {
        vals.iter().try_for_each(|val| self.push(inst, *val))
    }

    fn pop(&mut self, inst: &Inst) -> Result<Word, Error> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow {
                op: inst.op,
                addr: inst.addr,
            });
        }
        self.sp -= 1;
        self.fp = self.fp.saturating_sub(1);
        Ok(self.stack[self.sp])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::Record;
    use OpKind::*;

    fn w(op: OpKind) -> Word {
        op.into()
    }

    fn run(program: &[Word]) -> Result<Vec<Word>, Error> {
        let options = RunOptions {
            shorten: true,
            ..Default::default()
        };
        Machine::new(program).run(&options, &mut Record::default())
    }

    #[test]
    fn initial_state() {
        let program = [w(HALT)];
        let machine = Machine::new(&program);
        assert_eq!((machine.sp(), machine.fp(), machine.ip()), (0, 0, 0));
        assert!(machine.stack().iter().all(|&v| v == 0));
        assert_eq!(machine.stack().len(), STACK_SIZE);
    }

    #[test]
    fn push_fills_to_capacity() {
        let mut program = vec![];
        for i in 0..STACK_SIZE {
            program.extend([w(PUSH), i as Word]);
        }
        program.push(w(HALT));
        assert_eq!(run(&program).map(|s| s.len()), Ok(STACK_SIZE));

        let overflow = STACK_SIZE * 2;
        program.pop();
        program.extend([w(PUSH), 0, w(HALT)]);
        assert_eq!(
            run(&program),
            Err(Error::StackOverflow { op: PUSH, addr: overflow })
        );
    }

    #[test]
    fn fp_follows_pushes_not_spi() {
        let program = [w(PUSH), 1, w(PUSH), 2, w(SPI), w(POP), w(HALT)];
        let mut machine = Machine::new(&program);
        let mut hooks = Record::default();
        for _ in 0..4 {
            let inst = machine.fetch().unwrap();
            machine.step(&inst, &mut hooks).unwrap();
        }
        assert_eq!(machine.ip(), 6);
        assert_eq!((machine.sp(), machine.fp()), (2, 1));
    }

    #[test]
    fn fp_does_not_go_negative() {
        let program = [w(SPI), w(POP), w(HALT)];
        let mut machine = Machine::new(&program);
        let mut hooks = Record::default();
        for _ in 0..2 {
            let inst = machine.fetch().unwrap();
            machine.step(&inst, &mut hooks).unwrap();
        }
        assert_eq!((machine.sp(), machine.fp()), (0, 0));
    }

    #[test]
    fn bad_words_at_opcode_position() {
        assert_eq!(
            run(&[w(NOP), 0xFFFF]),
            Err(Error::UnknownOpcode { word: 0xFFFF, addr: 1 })
        );
        assert_eq!(
            run(&[w(NOP), w(PUSH)]),
            Err(Error::MissingOperand { op: PUSH, addr: 1 })
        );
    }

    #[test]
    fn jump_past_end() {
        assert_eq!(
            run(&[w(PUSH), 100, w(JMP)]),
            Err(Error::ProgramEndedWithoutHalt { addr: 100 })
        );
        assert_eq!(
            run(&[w(NOP)]),
            Err(Error::ProgramEndedWithoutHalt { addr: 1 })
        );
    }

    #[test]
    fn return_address_must_fit_in_a_word() {
        use arch::PROGRAM_SIZE;

        // proc at the last addressable word returns just past the address space
        let mut program = vec![w(NOP); PROGRAM_SIZE - 3];
        program.extend([w(PUSH), 0, w(PROC)]);
        assert_eq!(
            run(&program),
            Err(Error::ReturnAddressOutOfRange {
                op: PROC,
                addr: PROGRAM_SIZE - 1,
                ret: PROGRAM_SIZE,
            })
        );

        // one word earlier the return address still fits
        let mut program = vec![w(NOP); PROGRAM_SIZE - 5];
        program.extend([w(PUSH), (PROGRAM_SIZE - 2) as Word, w(PROC), w(HALT), w(HALT)]);
        let options = RunOptions {
            shorten: true,
            ..Default::default()
        };
        assert_eq!(
            Machine::new(&program).run(&options, &mut Record::default()),
            Ok(vec![(PROGRAM_SIZE - 2) as Word])
        );
    }

    #[test]
    fn step_budget() {
        let looping = [w(PUSH), 0, w(JMP)];
        let options = RunOptions {
            tmax: Some(10),
            ..Default::default()
        };
        assert_eq!(
            Machine::new(&looping).run(&options, &mut Record::default()),
            Err(Error::StepLimitExceeded(10))
        );

        let halting = [w(NOP), w(HALT)];
        let options = RunOptions {
            tmax: Some(2),
            shorten: true,
            ..Default::default()
        };
        assert_eq!(
            Machine::new(&halting).run(&options, &mut Record::default()),
            Ok(vec![])
        );
    }
}
