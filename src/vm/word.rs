//! Word - 16-bit value model for the VM
//!
//! ## Value Space
//!
//! ```text
//! 0x0000-0x7FFF  (0-32767)      Literal: used as-is, also a memory address
//! 0x8000-0x8007  (32768-32775)  Register reference: r0-r7
//! 0x8008-0xFFFF  (32776-65535)  Illegal in any operand position
//! ```
//!
//! Arithmetic is closed over the literal range: every result is taken
//! modulo 32768.

use std::fmt;

/// Storage unit of memory, registers and the stack
pub type Word = u16;

/// Arithmetic modulus (size of the literal range)
pub const MODULUS: u32 = 32768;

/// Mask for the 15-bit literal range
pub const LITERAL_MASK: Word = 0x7FFF;

/// Largest literal value
pub const MAX_LITERAL: Word = 32767;

/// First register reference
pub const REGISTER_BASE: Word = 32768;

/// Number of general-purpose registers
pub const NUM_REGISTERS: usize = 8;

/// First word that is illegal as an operand
pub const OPERAND_LIMIT: Word = REGISTER_BASE + NUM_REGISTERS as Word;

/// A decoded operand word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Literal value, or memory address when used as a target
    Literal(Word),
    /// General-purpose register index (0-7)
    Register(usize),
}

impl Operand {
    /// Decode a raw operand word.
    ///
    /// Returns `None` for words at or above [`OPERAND_LIMIT`].
    pub const fn decode(word: Word) -> Option<Self> {
        if word <= MAX_LITERAL {
            Some(Self::Literal(word))
        } else if word < OPERAND_LIMIT {
            Some(Self::Register((word - REGISTER_BASE) as usize))
        } else {
            None
        }
    }

    /// Raw operand word
    pub const fn encode(&self) -> Word {
        match self {
            Self::Literal(value) => *value,
            Self::Register(index) => REGISTER_BASE + *index as Word,
        }
    }
}

impl Default for Operand {
    fn default() -> Self {
        Self::Literal(0)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "#{}", value),
            Self::Register(index) => write!(f, "r{}", index),
        }
    }
}

/// (a + b) mod 32768
pub fn add(a: Word, b: Word) -> Word {
    ((a as u32 + b as u32) % MODULUS) as Word
}

/// (a * b) mod 32768
pub fn mult(a: Word, b: Word) -> Word {
    ((a as u32 * b as u32) % MODULUS) as Word
}

/// Bitwise complement within 15 bits
pub fn not(a: Word) -> Word {
    !a & LITERAL_MASK
}
