use std::{io, process::ExitCode};

use clap::Parser;
use color_print::cprintln;
use tracing::Level;

use lasm::dump::print_dump;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.lasm")]
    input: String,

    /// Output file [default: <INPUT>.bin]
    #[clap(short, long)]
    output: Option<String>,

    /// Dump assembly code
    #[clap(short, long)]
    dump: bool,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[clap(short, long, default_value_t = Level::WARN)]
    log_level: Level,
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    println!("Stack Machine Assembler");

    println!("1. Read File");
    println!("  < {}", args.input);
    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            cprintln!("<r,s>Failed to open File</>: {}: {}", args.input, e);
            return ExitCode::FAILURE;
        }
    };

    println!("2. Assemble & Resolve Labels");
    let assembly = match lasm::assemble(&source) {
        Ok(assembly) => assembly,
        Err(e) => {
            e.print_diag(&args.input, &source);
            return ExitCode::FAILURE;
        }
    };

    let output = args
        .output
        .unwrap_or_else(|| format!("{}.bin", args.input));
    println!("3. Write Binary");
    println!("  > {}", output);
    if let Err(e) = std::fs::write(&output, arch::image::to_bytes(&assembly.words)) {
        cprintln!("<r,s>Failed to write File</>: {}: {}", output, e);
        return ExitCode::FAILURE;
    }
    cprintln!("  <g>{}</> words", assembly.words.len());
    if assembly.tables.is_empty() {
        cprintln!("  <y,s>warning</>: no instructions, the image is empty");
    }

    if args.dump {
        print_dump(&args.input, &assembly);
    }
    ExitCode::SUCCESS
}
