use tracing::{debug, trace};

use crate::error::Result;
use crate::instruction::Instruction;
use crate::state::VmState;
use crate::value::WasmValue;

/// Called after every applied instruction. Observers only get shared access to the state.
pub type Observer = Box<dyn Fn(&VmState)>;

/// Drives a [`VmState`] through an append-only instruction sequence.
///
/// The VM is idle while `pc` points inside the sequence and halted once it reaches the end.
/// Nothing here resets `pc` or clears the stack; that belongs to whoever owns the VM.
/// There is no internal locking, so callers sharing a VM must serialize access themselves.
pub struct StackVm {
    state: VmState,
    instructions: Vec<Instruction>,
    observers: Vec<Observer>,
}

impl StackVm {
    pub fn new(pages: usize, max_pages: usize) -> Self {
        Self { state: VmState::new(pages, max_pages), instructions: Vec::new(), observers: Vec::new() }
    }

    pub fn state(&self) -> &VmState { &self.state }
    pub fn instructions(&self) -> &[Instruction] { &self.instructions }
    pub fn is_halted(&self) -> bool { self.state.pc >= self.instructions.len() }

    /// Current stack, bottom-first.
    pub fn inspect(&self) -> &[WasmValue] { self.state.stack() }

    pub fn add_observer(&mut self, observer: impl Fn(&VmState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn append_instructions(&mut self, instructions: impl IntoIterator<Item = Instruction>) {
        self.instructions.extend(instructions);
    }

    /// Points `pc` back at the first instruction so the sequence can be replayed.
    pub fn rewind(&mut self) { self.state.pc = 0; }

    fn notify_observers(&self) {
        for observer in &self.observers {
            observer(&self.state);
        }
    }

    /// Applies `instruction` out of band, without reading or moving `pc`.
    pub fn execute(&mut self, instruction: &Instruction) -> Result<Option<WasmValue>> {
        trace!(pc = self.state.pc, %instruction, "execute");
        let result = instruction.execute(&mut self.state)?;
        self.notify_observers();
        Ok(result)
    }

    /// Runs from the current `pc` until halted. On error `pc` stays on the failing instruction.
    pub fn run(&mut self) -> Result<()> {
        debug!(pc = self.state.pc, len = self.instructions.len(), "run");
        while let Some(instruction) = self.instructions.get(self.state.pc).copied() {
            if let Err(e) = self.execute(&instruction) {
                debug!(pc = self.state.pc, %instruction, error = %e, "run aborted");
                return Err(e);
            }
            self.state.pc += 1;
        }
        debug!(pc = self.state.pc, depth = self.state.stack.len(), "halted");
        Ok(())
    }
}

/// Observer that logs the stack and program counter at debug level.
pub fn trace_state(state: &VmState) {
    debug!(pc = state.pc(), stack = ?state.stack(), pages = state.memory().size(), "state");
}
