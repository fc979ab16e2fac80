pub mod config;
pub mod error;
pub mod hooks;
pub mod machine;

use arch::Word;

pub use config::RunOptions;
pub use error::Error;
use hooks::{dump::Dump, serial::Serial, trace::Trace, Hook};
use machine::Machine;

/// Hooks used when nobody supplies their own: `write` and `debug` go to
/// stdout, plus a per-step trace in debug mode.
pub fn console(options: &RunOptions) -> Vec<Box<dyn Hook>> {
    let mut hooks: Vec<Box<dyn Hook>> = vec![Box::new(Serial::new(false)), Box::new(Dump::new())];
    if options.debug {
        hooks.push(Box::new(Trace));
    }
    hooks
}

/// Execute an encoded program and return its stack at `halt`.
pub fn run(program: &[Word], options: &RunOptions) -> Result<Vec<Word>, Error> {
    run_with(program, options, &mut console(options))
}

pub fn run_with(
    program: &[Word],
    options: &RunOptions,
    hooks: &mut dyn Hook,
) -> Result<Vec<Word>, Error> {
    Machine::new(program).run(options, hooks)
}
