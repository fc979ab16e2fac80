use arch::Word;
use color_print::cprintln;

use super::Hook;

/// Prints every value popped by `write`, one per line.
pub struct Serial {
    style: bool,
}

impl Serial {
    pub fn new(style: bool) -> Self {
        Serial { style }
    }
}

impl Hook for Serial {
    fn write(&mut self, value: Word) {
        match self.style {
            true => cprintln!(" > <r,s>{}</>", value),
            false => println!("{}", value),
        }
    }
}
