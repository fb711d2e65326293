#![deny(unsafe_code)]

pub mod error;
pub mod instruction;
pub mod memory;
pub mod program;
pub mod state;
pub mod value;
pub mod vm;

pub use error::{Error, Result};
pub use instruction::Instruction;
pub use memory::{Memory, Page};
pub use program::{decode, mnemonics, parse_program, InstructionRecord};
pub use state::VmState;
pub use value::{coerce, Numeric, ValType, WasmValue};
pub use vm::{trace_state, Observer, StackVm};
