use arch::{Word, PROGRAM_SIZE, STACK_SIZE};
use lemu::{hooks::Record, run, run_with, Error, RunOptions};

fn shorten() -> RunOptions {
    RunOptions {
        shorten: true,
        ..Default::default()
    }
}

fn exec(code: &str, options: &RunOptions) -> (Result<Vec<Word>, Error>, Record) {
    let program = lasm::compile(code).unwrap();
    let mut record = Record::default();
    let result = run_with(&program, options, &mut record);
    (result, record)
}

fn assert(code: &str, expect: Result<Vec<Word>, Error>) {
    assert_eq!(exec(code, &shorten()).0, expect, "\n{code}");
}

macro_rules! case {
    ($name:ident, $code:expr, $expect:expr) => {
        #[test]
        fn $name() {
            assert($code, $expect);
        }
    };
}

case!(add_two, "push 10\npush 20\nadd\nhalt", Ok(vec![30]));
case!(sub_left_operand, "push 20\npush 10\nsub\nhalt", Ok(vec![10]));
case!(relative_jump, "push @+3\njmp\npush 10\npush 20\nhalt", Ok(vec![20]));
case!(
    forward_label,
    "push @label\njmp\npush 99\nlabel:\npush 30\npush 40\nhalt",
    Ok(vec![30, 40])
);
case!(lone_pop, "pop", Err(Error::StackUnderflow { op: arch::op::OpKind::POP, addr: 0 }));
case!(missing_halt, "push 1\npush 2\nadd", Err(Error::ProgramEndedWithoutHalt { addr: 5 }));

// Counts 5 down to 1 on the stack
const COUNTDOWN: &str = "\
    push 5          ; counter
loop:
    dup
    dec
    dup
    jmpnz @loop
    pop
    halt
";

case!(countdown_loop, COUNTDOWN, Ok(vec![5, 4, 3, 2, 1]));

// Same loop written with a line reference instead of a label
case!(
    countdown_line_ref,
    "push 5\ndup\ndec\ndup\njmpnz @2\npop\nhalt",
    Ok(vec![5, 4, 3, 2, 1])
);

// Recursive sum 1..=n using the data stack for return addresses
const SUM: &str = "\
    push 4
    proc @sum
    halt

; [n ret] -> [sum]
sum:
    swp             ; [ret n]
    dup
    jmpz @base
    dup
    dec             ; [ret n n-1]
    proc @sum       ; [ret n s]
    add             ; [ret n+s]
    swp
    ret
base:
    swp             ; [0 ret]
    ret
";

case!(recursive_sum, SUM, Ok(vec![10]));

#[test]
fn shorten_is_a_prefix_of_full_stack() {
    for code in [COUNTDOWN, SUM, "spr +4\npush 9\nspd\nspd\nhalt", "push 1\npop\nhalt"] {
        let (full, _) = exec(code, &RunOptions::default());
        let (short, _) = exec(code, &shorten());
        let (full, short) = (full.unwrap(), short.unwrap());
        assert_eq!(full.len(), STACK_SIZE);
        assert_eq!(&full[..short.len()], &short[..]);
    }
}

#[test]
fn full_stack_keeps_dead_values() {
    let (full, _) = exec("push 1\npush 2\npop\nhalt", &RunOptions::default());
    let full = full.unwrap();
    assert_eq!(&full[..3], &[1, 2, 0]);
}

#[test]
fn sub_then_add_restores() {
    for (a, b) in [(0, 0), (1, 2), (100, 7), (0xFFFF, 1), (0x8000, 0xFFFF), (3, 0x1234)] {
        let code = format!("push {a}\npush {b}\nsub\npush {b}\nadd\nhalt");
        assert_eq!(exec(&code, &shorten()).0, Ok(vec![a]), "a={a} b={b}");
    }
}

#[test]
fn label_and_relative_targets_agree() {
    let by_label = "push 1\njmp @skip\npush 2\nskip:\npush 3\nhalt";
    let by_offset = "push 1\njmp @+3\npush 2\npush 3\nhalt";
    assert_eq!(exec(by_label, &shorten()).0, Ok(vec![1, 3]));
    assert_eq!(exec(by_label, &shorten()).0, exec(by_offset, &shorten()).0);
}

#[test]
fn label_order_does_not_matter() {
    let before = lasm::compile("push @x\nx:\nhalt").unwrap();
    let after = lasm::compile("x:\nnop\nnop\npush @x\nhalt").unwrap();
    assert_eq!(before[1], 2);
    assert_eq!(after[3], 0);

    let forward = "push 1\njmp @done\npush 2\ndone:\nhalt";
    let backward = "jmp @start\ndone:\nhalt\nstart:\npush 1\njmp @done";
    assert_eq!(exec(forward, &shorten()).0, exec(backward, &shorten()).0);
}

#[test]
fn write_goes_to_hook() {
    let (result, record) = exec("push 'h'\nwrite\npush 42\nwrite\nhalt", &shorten());
    assert_eq!(result, Ok(vec![]));
    assert_eq!(record.writes, vec![104, 42]);
}

#[test]
fn debug_snapshots_without_changing_state() {
    let (result, record) = exec("push 1\ndebug\npush 2\nDEBUG\nhalt", &shorten());
    assert_eq!(result, Ok(vec![1, 2]));
    assert_eq!(record.debugs, vec![vec![1], vec![1, 2]]);
}

#[test]
fn trace_only_in_debug_mode() {
    let code = "push 1\npop\nhalt";
    let (_, quiet) = exec(code, &shorten());
    assert_eq!(quiet.inits, 1);
    assert!(quiet.steps.is_empty());

    let options = RunOptions {
        debug: true,
        ..shorten()
    };
    let (_, traced) = exec(code, &options);
    assert_eq!(traced.steps, vec![(0, 0), (1, 2), (2, 3)]);
}

#[test]
fn step_budget_stops_endless_loop() {
    let options = RunOptions {
        tmax: Some(1000),
        ..shorten()
    };
    let (result, _) = exec("loop:\njmp @loop", &options);
    assert_eq!(result, Err(Error::StepLimitExceeded(1000)));
}

#[test]
fn program_is_shared_between_runs() {
    let program = lasm::compile(SUM).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let program = program.clone();
            std::thread::spawn(move || run_with(&program, &shorten(), &mut Record::default()))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Ok(vec![10]));
    }
    assert_eq!(run(&program, &shorten()), Ok(vec![10]));
}

#[test]
fn return_addresses_stay_addressable() {
    // a call near the end of a maximal program must not wrap to address 0
    let body = "nop\n".repeat(PROGRAM_SIZE);
    let code = format!("jmp @main\nf:\nret\nmain:\n{body}proc @f\nhalt");
    let err = lasm::compile(&code).unwrap_err();
    assert_eq!(err.kind, lasm::ErrorKind::AddressOutOfBounds(PROGRAM_SIZE as i64));
    assert_eq!(err.line, PROGRAM_SIZE + 1);

    // the same call shape runs when it fits
    let code = "jmp @main\nf:\nret\nmain:\nnop\nproc @f\nhalt";
    assert_eq!(exec(code, &shorten()).0, Ok(vec![]));
}
