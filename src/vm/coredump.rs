//! Post-mortem diagnostics
//!
//! - [`Coredump`]: snapshot of pc, registers and stack contents
//! - [`Traceback`]: the last anomaly as an (origin, reason) pair
//!
//! Both are plain data; the interpreter decides when to capture them.

use super::word::{Word, NUM_REGISTERS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic snapshot of VM state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coredump {
    /// Program counter at capture time
    pub pc: Word,
    pub registers: [Word; NUM_REGISTERS],
    /// Stack contents, top first
    pub stack: Vec<Word>,
    /// Instructions executed before capture
    pub steps: u64,
    /// Why the dump was taken (None for a clean halt)
    pub reason: Option<String>,
}

impl Coredump {
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }
}

impl fmt::Display for Coredump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\t\tCoredump")?;
        if let Some(reason) = &self.reason {
            writeln!(f, "\tReason: {}", reason)?;
        }
        writeln!(f, "\tpc={} steps={}", self.pc, self.steps)?;
        writeln!(f, "\tRegisters")?;
        for (i, value) in self.registers.iter().enumerate() {
            write!(f, "r{}={} ", i, value)?;
        }
        writeln!(f)?;
        writeln!(f, "\tStack")?;
        for (i, value) in self.stack.iter().enumerate() {
            writeln!(f, "-{}: {}", i, value)?;
        }
        Ok(())
    }
}

/// Last recorded anomaly
///
/// Overwritten on every new anomaly; never accumulates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traceback {
    /// Operation that failed, e.g. `load` or an opcode mnemonic
    pub origin: String,
    pub reason: String,
}

impl Traceback {
    pub fn new(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Traceback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed {}(), reason: {}", self.origin, self.reason)
    }
}
