//! Error types for wordvm

use thiserror::Error;

/// Rejections raised while attaching an image to a VM instance.
///
/// These are recoverable: the instance stays valid and its traceback can be
/// inspected before it is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// A VM instance accepts exactly one image
    #[error("cannot double-load buffers")]
    AlreadyLoaded,

    /// Image larger than the addressable word space
    #[error("cannot load buffers larger than {max} bytes (got {size})")]
    SizeExceeded { size: usize, max: usize },

    /// Trailing half word
    #[error("image length {0} is not a whole number of 16-bit words")]
    MisalignedLength(usize),
}

/// Faults raised while decoding the instruction stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeFault {
    #[error("unknown opcode {word} at {pc} (misaligned jump?)")]
    UnknownOpcode { pc: u16, word: u16 },

    #[error("operand overflow: {operand} at {pc}")]
    OperandOverflow { pc: u16, operand: u16 },

    #[error("{opcode} at {pc} expects {expected} operands, image ends after {found}")]
    OperandCountMismatch {
        pc: u16,
        opcode: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Faults raised by opcode handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeFault {
    #[error("tried to pop from empty stack")]
    StackUnderflow,

    #[error("memory address {addr} out of bounds (capacity {capacity})")]
    MemoryOutOfBounds { addr: usize, capacity: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("input exhausted")]
    InputExhausted,

    /// Console failure, carried as text so faults stay comparable
    #[error("console I/O failed: {0}")]
    Io(String),
}

/// Host resource exhaustion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceFault {
    #[error("failed to grow stack to {requested} slots, insufficient memory")]
    AllocationFailure { requested: usize },
}

/// Wordvm error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("decode fault: {0}")]
    Decode(#[from] DecodeFault),

    #[error("runtime fault: {0}")]
    Runtime(#[from] RuntimeFault),

    #[error("resource fault: {0}")]
    Resource(#[from] ResourceFault),

    /// Execution requested before an image was attached
    #[error("no image loaded")]
    NotLoaded,

    /// Operation not allowed in the current run state
    #[error("invalid vm state: {0}")]
    InvalidState(String),

    /// Configuration rejected before the instance was built
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl VmError {
    /// True for faults that terminate the current run.
    ///
    /// Load errors and lifecycle misuse leave the instance inspectable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::Runtime(_) | Self::Resource(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, VmError>;
