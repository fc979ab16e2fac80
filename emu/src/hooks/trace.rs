use arch::inst::Inst;

use super::Hook;
use crate::machine::Machine;

/// One line per executed instruction.
#[derive(Debug, Default)]
pub struct Trace;

impl Hook for Trace {
    fn init(&mut self, machine: &Machine) {
        println!(" * Trace: {} words", machine.program().len());
    }

    fn exec(&mut self, time: u64, inst: &Inst, machine: &Machine) {
        println!(
            "[{:0>4}] [{:0>4X}] {:<32} sp={:<3} fp={:<3} {:?}",
            time,
            inst.addr,
            inst.cformat(),
            machine.sp(),
            machine.fp(),
            machine.live()
        );
    }
}
