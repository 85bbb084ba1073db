use super::error::{EmulatorError, Result};

pub const STACK_SIZE: usize = 16;

/// The call stack, holding return addresses of at most 16 nested calls.
#[derive(Debug, Default)]
pub struct Stack {
    entries: [u16; STACK_SIZE],
    depth: usize,
}

impl Stack {
    pub fn new() -> Stack {
        Stack::default()
    }

    pub fn push(&mut self, addr: u16) -> Result<()> {
        let slot = self
            .entries
            .get_mut(self.depth)
            .ok_or(EmulatorError::StackOverflow)?;
        *slot = addr;
        self.depth += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.depth == 0 {
            return Err(EmulatorError::StackUnderflow);
        }
        self.depth -= 1;
        Ok(self.entries[self.depth])
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
