use color_print::cprintln;

use super::Hook;
use crate::machine::Machine;

/// Prints the machine state when a `debug` instruction runs.
#[derive(Debug, Default)]
pub struct Dump {
    count: usize,
}

impl Dump {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Hook for Dump {
    fn debug(&mut self, machine: &Machine) {
        self.count += 1;
        cprintln!("<m,s>DEBUG</> #{}", self.count);
        print_state(machine);
    }
}

pub fn print_state(machine: &Machine) {
    println!(" +------------+------------+------------+");
    println!(
        " |   ip: {:0>4X} |   sp: {:0>4X} |   fp: {:0>4X} |",
        machine.ip(),
        machine.sp(),
        machine.fp()
    );
    println!(" +------------+------------+------------+");
    print_stack(machine);
}

fn print_stack(machine: &Machine) {
    // Show up to whichever of sp/fp is higher, so relocated frames stay visible
    let top = machine.sp().max(machine.fp()).min(machine.stack().len());
    for (idx, val) in machine.stack()[..top].iter().enumerate().rev() {
        let mark = match (idx + 1 == machine.sp(), idx + 1 == machine.fp()) {
            (true, true) => "<- sp fp",
            (true, false) => "<- sp",
            (false, true) => "<- fp",
            (false, false) => "",
        };
        let signed = *val as i16;
        match idx < machine.sp() {
            true => cprintln!(" | {:0>4X} : <y>{:0>4X}</> {:>6} {:<14}|", idx, val, signed, mark),
            false => cprintln!(" | {:0>4X} : <dim>{:0>4X}</> {:>6} {:<14}|", idx, val, signed, mark),
        }
    }
    println!(" +--------------------------------------+");
}
