use crate::error::{Error, Result};
use crate::memory::Memory;
use crate::value::WasmValue;

/// Everything an instruction can touch: operand stack, program counter and linear memory.
#[derive(Debug)]
pub struct VmState {
    pub(crate) stack: Vec<WasmValue>,
    pub(crate) pc: usize,
    pub(crate) memory: Memory,
}

impl VmState {
    pub fn new(pages: usize, max_pages: usize) -> Self {
        Self { stack: Vec::new(), pc: 0, memory: Memory::new(pages, max_pages) }
    }

    /// Bottom-first; the top of the stack is the last element.
    pub fn stack(&self) -> &[WasmValue] { &self.stack }
    pub fn pc(&self) -> usize { self.pc }
    pub fn memory(&self) -> &Memory { &self.memory }

    pub fn push(&mut self, value: WasmValue) { self.stack.push(value); }

    pub fn pop(&mut self) -> Result<WasmValue> {
        self.stack.pop().ok_or(Error::StackUnderflow)
    }

    /// Fails unless at least `n` values are on the stack, without touching it.
    #[inline]
    pub fn require(&self, n: usize) -> Result<()> {
        if self.stack.len() < n { Err(Error::StackUnderflow) } else { Ok(()) }
    }

    /// The value `depth` slots below the top (0 is the top).
    pub fn peek(&self, depth: usize) -> Result<WasmValue> {
        self.require(depth + 1)?;
        Ok(self.stack[self.stack.len() - 1 - depth])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state() {
        let state = VmState::new(1, 3);
        assert!(state.stack().is_empty());
        assert_eq!(state.pc(), 0);
        assert_eq!(state.memory().size(), 1);
        assert_eq!(state.memory().max(), 3);
    }

    #[test]
    fn peek_and_underflow() {
        let mut state = VmState::new(0, 0);
        assert_eq!(state.pop(), Err(Error::StackUnderflow));
        state.push(WasmValue::I32(1));
        state.push(WasmValue::I32(2));
        assert_eq!(state.peek(0), Ok(WasmValue::I32(2)));
        assert_eq!(state.peek(1), Ok(WasmValue::I32(1)));
        assert_eq!(state.peek(2), Err(Error::StackUnderflow));
        assert_eq!(state.stack().len(), 2);
    }
}
