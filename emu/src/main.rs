use std::{io, path::Path, process::ExitCode};

use clap::Parser;
use color_print::cprintln;
use tracing::Level;

use arch::{image, Word};
use lemu::{
    error::LoadError,
    hooks::{dump::Dump, serial::Serial, trace::Trace, Hook},
    run_with, RunOptions,
};

#[derive(Parser, Debug)]
#[clap(
    name = "Stack Machine Emulator",
    version = "v1.0.0",
    about = "Emulator for the stack machine"
)]
struct Args {
    /// Binary image, or source to assemble first
    #[arg(default_value = "main.lasm.bin")]
    input_file: String,

    /// Maximum number of steps
    #[arg(short = 't', long)]
    tmax: Option<u64>,

    /// Return only the live part of the stack
    #[arg(short, long)]
    shorten: bool,

    /// Trace every step
    #[arg(short, long)]
    debug: bool,

    /// Run options in YAML
    #[arg(short, long)]
    config: Option<String>,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[arg(short, long, default_value_t = Level::WARN)]
    log_level: Level,
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    println!("Stack Machine Emulator");

    println!("+-----------------------------------------------+");
    println!("| {:<45} |", args.input_file);
    println!("+-----------------------------------------------+");

    // ------------------------------------------------------------------------
    // Options: file first, flags on top
    let mut options = match &args.config {
        Some(fname) => match RunOptions::load(fname) {
            Ok(options) => options,
            Err(e) => {
                cprintln!("<r,s>error</>: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => RunOptions::default(),
    };
    options.shorten |= args.shorten;
    options.debug |= args.debug;
    if args.tmax.is_some() {
        options.tmax = args.tmax;
    }
    tracing::debug!(?options, "run options");

    // ------------------------------------------------------------------------
    // Load program
    let program = match load(&args.input_file) {
        Ok(Some(program)) => program,
        Ok(None) => return ExitCode::FAILURE,
        Err(e) => {
            cprintln!("<r,s>error</>: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // ------------------------------------------------------------------------
    // Initialize hooks
    println!("[INIT]");
    let mut hooks: Vec<Box<dyn Hook>> = vec![Box::new(Serial::new(true)), Box::new(Dump::new())];
    if options.debug {
        hooks.push(Box::new(Trace));
    }

    // ------------------------------------------------------------------------
    // Main loop
    let result = run_with(&program, &options, &mut hooks);
    println!("=================================================");
    match result {
        Ok(stack) => {
            cprintln!("<g,s>HALT</> {:?}", stack);
            ExitCode::SUCCESS
        }
        Err(e) => {
            cprintln!("<r,s>error</>: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Read a `.bin` image as-is, assemble anything else. `Ok(None)` means the
/// source did not assemble and the diagnostic has been printed.
fn load(fname: &str) -> Result<Option<Vec<Word>>, LoadError> {
    let is_image = Path::new(fname).extension().is_some_and(|ext| ext == "bin");
    if is_image {
        let bytes = std::fs::read(fname).map_err(|e| LoadError::Io(fname.to_string(), e))?;
        let program =
            image::from_bytes(&bytes).map_err(|e| LoadError::Image(fname.to_string(), e))?;
        return Ok(Some(program));
    }
    let source =
        std::fs::read_to_string(fname).map_err(|e| LoadError::Io(fname.to_string(), e))?;
    match lasm::compile(&source) {
        Ok(program) => Ok(Some(program)),
        Err(e) => {
            e.print_diag(fname, &source);
            Ok(None)
        }
    }
}
