use thiserror::Error;

/// Everything that can stop the emulator.
///
/// None of these are recoverable: they are propagated to whoever drives
/// the emulator, which is expected to report them and end the run.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EmulatorError {
    #[error("memory access out of bounds at address {addr:#06x}")]
    OutOfBounds { addr: usize },

    #[error("stack overflow: more than 16 nested calls")]
    StackOverflow,

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("unknown instruction {word:#06x}")]
    UnknownInstruction { word: u16 },

    #[error("cannot load {len} bytes at {offset:#06x}, memory is only 4096 bytes")]
    LoadTooLarge { offset: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, EmulatorError>;
