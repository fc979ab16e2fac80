pub mod dump;
pub mod serial;
pub mod trace;

use arch::{inst::Inst, Word};

use crate::machine::Machine;

/// Observer of a run. Hooks see the machine but never change it.
pub trait Hook {
    /// Once, before the first instruction.
    fn init(&mut self, _machine: &Machine) {}
    /// Before every instruction, when the run is in debug mode.
    fn exec(&mut self, _time: u64, _inst: &Inst, _machine: &Machine) {}
    /// A value popped by `write`.
    fn write(&mut self, _value: Word) {}
    /// The `debug` instruction.
    fn debug(&mut self, _machine: &Machine) {}
}

impl Hook for Vec<Box<dyn Hook>> {
    fn init(&mut self, machine: &Machine) {
        self.iter_mut().for_each(|hook| hook.init(machine));
    }
    fn exec(&mut self, time: u64, inst: &Inst, machine: &Machine) {
        self.iter_mut().for_each(|hook| hook.exec(time, inst, machine));
    }
    fn write(&mut self, value: Word) {
        self.iter_mut().for_each(|hook| hook.write(value));
    }
    fn debug(&mut self, machine: &Machine) {
        self.iter_mut().for_each(|hook| hook.debug(machine));
    }
}

/// Keeps everything it observes, for inspection after the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub inits: usize,
    /// `(time, addr)` of every traced step
    pub steps: Vec<(u64, usize)>,
    pub writes: Vec<Word>,
    /// Live stack at every `debug`
    pub debugs: Vec<Vec<Word>>,
}

impl Hook for Record {
    fn init(&mut self, _machine: &Machine) {
        self.inits += 1;
    }
    fn exec(&mut self, time: u64, inst: &Inst, _machine: &Machine) {
        self.steps.push((time, inst.addr));
    }
    fn write(&mut self, value: Word) {
        self.writes.push(value);
    }
    fn debug(&mut self, machine: &Machine) {
        self.debugs.push(machine.live().to_vec());
    }
}
