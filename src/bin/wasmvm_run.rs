use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use wasmvm::{trace_state, StackVm};

mod utils;
use utils::{init_logging, load_program};

#[derive(Parser, Debug)]
#[command(name = "wasmvm-run")]
#[command(about = "Run a stack machine program")]
#[command(long_about = "
wasmvm Run - typed stack machine runner

Loads a JSON program (an array of {\"name\", \"type\", \"value\"} records), runs it on a fresh VM
and prints the final stack, bottom first.

Examples:
  # Run a program
  wasmvm-run add.json

  # Start with one page of memory and allow up to four
  wasmvm-run grow.json --pages 1 --max-pages 4

  # Log the state after every instruction
  wasmvm-run add.json --trace

  # Print the final stack as JSON
  wasmvm-run add.json --json
")]
struct Args {
    /// Path to the JSON program file
    program: PathBuf,

    /// Initial number of memory pages
    #[arg(long, default_value_t = 0)]
    pages: usize,

    /// Maximum number of memory pages (raised to --pages if lower)
    #[arg(long, default_value_t = 0)]
    max_pages: usize,

    /// Log stack and program counter after every instruction
    #[arg(short, long)]
    trace: bool,

    /// Print the final stack as a JSON array
    #[arg(short, long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.trace);

    let program = load_program(&args.program)?;
    info!(instructions = program.len(), path = %args.program.display(), "program loaded");

    let mut vm = StackVm::new(args.pages, args.max_pages);
    if args.trace {
        vm.add_observer(trace_state);
    }
    vm.append_instructions(program);

    vm.run().map_err(|e| format!("Execution failed at pc {}: {}", vm.state().pc(), e))?;

    if args.json {
        println!("{}", serde_json::to_string(vm.inspect())?);
    } else {
        println!("Stack ({} values, top last):", vm.inspect().len());
        for (i, value) in vm.inspect().iter().enumerate() {
            println!("  [{}] {} ({})", i, value, value.ty());
        }
        println!("Memory: {} / {} pages", vm.state().memory().size(), vm.state().memory().max());
    }

    Ok(())
}
