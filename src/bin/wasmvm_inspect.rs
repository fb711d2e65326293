use clap::Parser;
use std::path::PathBuf;
use wasmvm::mnemonics;

mod utils;
use utils::{init_logging, load_program};

#[derive(Parser, Debug)]
#[command(name = "wasmvm-inspect")]
#[command(about = "Decode a stack machine program without running it")]
#[command(long_about = "
wasmvm Inspect - program decoder

Decodes a JSON program and prints one numbered line per instruction, or lists the instruction
names the decoder accepts.

Examples:
  # Show the decoded program
  wasmvm-inspect add.json

  # List available instructions
  wasmvm-inspect --list
")]
struct Args {
    /// Path to the JSON program file
    #[arg(required_unless_present = "list")]
    program: Option<PathBuf>,

    /// List the available instruction names
    #[arg(short, long)]
    list: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(false);

    if args.list {
        println!("Instructions:");
        for name in mnemonics() {
            println!("  {}", name);
        }
        return Ok(());
    }

    let path = args.program.ok_or("no program file given")?;
    let program = load_program(&path)?;

    println!("Program: {}", path.display());
    println!("Instructions: {}", program.len());
    for (pc, instruction) in program.iter().enumerate() {
        println!("  {:>4}: {}", pc, instruction);
    }

    Ok(())
}
