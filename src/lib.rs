// Diagnostic output, used by every module below
#[macro_use]
mod output;
pub use output::Output;

// Machine
mod memory;
pub use memory::{Address, AddressSpace, HALT, MEMORY_SIZE, MODULUS, REGISTER_COUNT};
mod stack;
pub use stack::CallStack;
mod ops;
pub use ops::{Instruction, Opcode, Operand};

// Running
mod runtime;
pub use runtime::{Exit, RunEnvironment, RunState, Step};
mod device;
pub use device::{BufferDevice, CharDevice, Input, Terminal};
mod debugger;
pub use debugger::{DebuggerOptions, Interrupt, Signal, NO_BREAKPOINT};

// Images
pub mod disasm;
pub mod loader;

mod error;
pub use error::arg_bad_address;

pub mod env;
