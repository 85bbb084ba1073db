//! The virtual machine: memory, registers, screen, timers,
//! and the input and output devices the outside world plugs in.

#[allow(clippy::module_inception)]
pub mod emulator;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod memory;
pub mod output;
pub mod stack;
pub mod timer;

pub use emulator::{Emulator, Registers};
pub use error::EmulatorError;
pub use framebuffer::Framebuffer;
pub use timer::{TimerClock, Timers};
