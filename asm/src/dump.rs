use arch::inst::Inst;
use color_print::cformat;

use crate::{parser::Stmt, Assembly};

const RULE: &str = "-------------+------+-------------------------------------------";

/// Print the assembled program next to its source, one row per instruction.
pub fn print_dump(path: &str, assembly: &Assembly) {
    println!(
        "{}+------[{}]{}",
        "-".repeat(13),
        path,
        "-".repeat(36_usize.saturating_sub(path.len()))
    );
    let insts: Vec<Inst> = Inst::disassemble(&assembly.words)
        .map_while(Result::ok)
        .collect();
    for line in &assembly.lines {
        for row in rows(line.no, &line.raw, line.stmt.as_ref(), assembly, &insts) {
            println!("{}", row);
        }
    }
    println!("{}", RULE);
}

fn rows(
    no: usize,
    raw: &str,
    stmt: Option<&Stmt>,
    assembly: &Assembly,
    insts: &[Inst],
) -> Vec<String> {
    let source = raw.trim();
    let Some(Stmt::Code(codes)) = stmt else {
        let source = match stmt {
            Some(Stmt::Label(_)) => cformat!("<g>{}</>", source),
            _ => cformat!("<dim>{}</>", source),
        };
        return vec![format!("{:13}| {:>4} | {}", "", no, source)];
    };

    let Some(start) = assembly.tables.line(no) else {
        return vec![];
    };
    let first = insts.partition_point(|inst| inst.addr < start);
    let mut rows = vec![];
    for (idx, inst) in insts[first..].iter().take(codes.len()).enumerate() {
        let words = &assembly.words[inst.addr..inst.next().min(assembly.words.len())];
        let hex = words
            .iter()
            .map(|word| format!("{:04X}", word))
            .collect::<Vec<_>>()
            .join(" ");
        let tail = match idx {
            0 => cformat!("{}  <dim>{}</>", inst.cformat(), source),
            _ => inst.cformat(),
        };
        let no = match idx {
            0 => format!("{:>4}", no),
            _ => format!("{:>4}", ""),
        };
        rows.push(format!("[{:04X}] {:<9}| {} | {}", inst.addr, hex, no, tail));
    }
    rows
}
