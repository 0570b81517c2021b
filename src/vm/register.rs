//! Register - the general-purpose register file
//!
//! Eight word registers, r0-r7, zeroed at startup. Operand words
//! 32768-32775 address them; see [`super::word`].

use super::word::{Word, NUM_REGISTERS};
use std::fmt;

/// Eight general-purpose word registers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [Word; NUM_REGISTERS],
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read register `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= NUM_REGISTERS`. Indices taken from a decoded
    /// [`super::word::Operand::Register`] are always in range.
    pub fn get(&self, index: usize) -> Word {
        self.regs[index]
    }

    /// Write register `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= NUM_REGISTERS`.
    pub fn set(&mut self, index: usize, value: Word) {
        self.regs[index] = value;
    }

    pub fn as_array(&self) -> [Word; NUM_REGISTERS] {
        self.regs
    }

    pub fn is_zeroed(&self) -> bool {
        self.regs.iter().all(|&r| r == 0)
    }
}

impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.regs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "r{}={}", i, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_initialized() {
        let regs = RegisterFile::new();
        assert!(regs.is_zeroed());
        assert_eq!(regs.as_array(), [0; NUM_REGISTERS]);
    }

    #[test]
    fn test_set_get() {
        let mut regs = RegisterFile::new();
        regs.set(7, 1234);
        assert_eq!(regs.get(7), 1234);
        assert_eq!(regs.get(0), 0);
        assert!(!regs.is_zeroed());
    }

    #[test]
    #[should_panic]
    fn test_get_past_last_register_panics() {
        RegisterFile::new().get(NUM_REGISTERS);
    }

    #[test]
    fn test_display() {
        let mut regs = RegisterFile::new();
        regs.set(1, 5);
        assert_eq!(regs.to_string(), "r0=0 r1=5 r2=0 r3=0 r4=0 r5=0 r6=0 r7=0");
    }
}
