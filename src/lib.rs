//! # wordvm - 16-bit Word Virtual Machine
//!
//! Loads a raw little-endian image of 16-bit words and runs it on a small
//! register-and-stack machine with byte-oriented console I/O.
//!
//! ## Core Components
//!
//! - **Interpreter**: fetch-decode-execute engine, one per loaded image
//! - **Opcode**: the 22-instruction set, dispatched exhaustively
//! - **Console**: OUT/IN collaborator (process stdio or in-memory buffers)
//! - **Coredump / Traceback**: post-mortem diagnostics
//!
//! ## Lifecycle
//!
//! 1. **Create**: `Interpreter::new()` or `Interpreter::with_console(..)`
//! 2. **Load**: `load(&bytes)` once per instance
//! 3. **Execute**: `execute()` until HALT, image exhaustion or a fault
//! 4. **Free**: `free()` consumes the instance and returns its console
//!
//! ## Example
//!
//! ```
//! use wordvm::{BufferConsole, Interpreter, Outcome, VmConfig};
//!
//! // OUT #72, OUT #105, HALT
//! let image = wordvm::encode_image(&[19, 72, 19, 105, 0]);
//!
//! let mut vm = Interpreter::with_console(BufferConsole::new(), VmConfig::default())?;
//! vm.load(&image)?;
//! assert_eq!(vm.execute()?, Outcome::Halted);
//! assert_eq!(vm.free().output(), b"Hi");
//! # Ok::<(), wordvm::VmError>(())
//! ```

pub mod config;
mod error;
pub mod vm;

pub use config::{EofPolicy, VmConfig};
pub use error::{DecodeFault, LoadError, ResourceFault, Result, RuntimeFault, VmError};
pub use vm::{
    // Core types
    Instruction, Interpreter, Opcode, Operand, Outcome, RunState, StepResult, Word,
    // Collaborators
    BufferConsole, Console, StdConsole,
    // Diagnostics
    Coredump, Traceback,
    // Binary format
    decode_image, encode_image, load_from_file, save_to_file, MAX_LOAD_SIZE,
};
