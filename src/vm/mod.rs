//! Word VM - 16-bit register-and-stack bytecode machine
//!
//! ## Format: variable-length instructions
//!
//! ```text
//! [OPCODE:1 word][OPERAND:1 word] x arity(opcode)
//! ```
//!
//! Every word is a little-endian u16. The image is copied into memory at
//! address 0 and executed in place, so programs may rewrite themselves.
//!
//! ## Value Space
//!
//! ```text
//! 0     ..= 32767   literal
//! 32768 ..= 32775   register r0..r7
//! 32776 ..= 65535   invalid (decode fault)
//! ```
//!
//! ## Machine
//!
//! ```text
//! Memory    32768 words, word addressed, zero filled
//! Registers r0..r7, 15-bit values
//! Stack     unbounded LIFO, grows by doubling, never shrinks
//! ```
//!
//! ## Example Image
//!
//! ```text
//! ; prints "A" then halts
//! 0013 0041     OUT #65
//! 0013 000A     OUT #10
//! 0000          HALT
//! ```

pub mod binary;
pub mod console;
pub mod coredump;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod opcode;
pub mod register;
pub mod stack;
pub mod word;

pub use binary::{
    decode_image, encode_image, load_from_file, save_to_file, MAX_LOAD_SIZE, WORD_SIZE,
};
pub use console::{BufferConsole, Console, StdConsole};
pub use coredump::{Coredump, Traceback};
pub use instruction::Instruction;
pub use interpreter::{Interpreter, Outcome, RunState, StepResult};
pub use memory::{Memory, MEMORY_WORDS};
pub use opcode::Opcode;
pub use register::RegisterFile;
pub use stack::Stack;
pub use word::{Operand, Word, NUM_REGISTERS};
