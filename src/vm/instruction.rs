//! Instruction - a decoded opcode with its operands
//!
//! ## Encoding
//!
//! ```text
//! [OPCODE:1 word][OPERAND:1 word] x arity
//!
//! ADD r0, r0, #1   ->   0x0009 0x8000 0x8000 0x0001
//! OUT #65          ->   0x0013 0x0041
//! ```
//!
//! Instructions are variable length (1-4 words) and word aligned.

use super::opcode::Opcode;
use super::word::{Operand, Word};
use std::fmt;

/// A decoded instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Word address the opcode was fetched from
    pub addr: Word,
    pub opcode: Opcode,
    /// Operand slots; only the first `opcode.arity()` are meaningful
    operands: [Operand; Opcode::MAX_ARITY],
}

impl Instruction {
    /// Build an instruction from already-validated operands
    ///
    /// Slots past the opcode's arity are ignored.
    pub fn new(addr: Word, opcode: Opcode, operands: &[Operand]) -> Self {
        let mut slots = [Operand::default(); Opcode::MAX_ARITY];
        for (slot, op) in slots.iter_mut().zip(operands.iter().take(opcode.arity())) {
            *slot = *op;
        }
        Self { addr, opcode, operands: slots }
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands[..self.opcode.arity()]
    }

    /// Operand `i` (0 = a, 1 = b, 2 = c)
    pub fn operand(&self, i: usize) -> Operand {
        self.operands[i]
    }

    /// Size in words, opcode included
    pub fn len(&self) -> usize {
        1 + self.opcode.arity()
    }

    /// Address of the following instruction
    pub fn next_addr(&self) -> Word {
        self.addr.wrapping_add(self.len() as Word)
    }

    /// Raw word encoding
    pub fn to_words(&self) -> Vec<Word> {
        std::iter::once(self.opcode.word())
            .chain(self.operands().iter().map(Operand::encode))
            .collect()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for (i, op) in self.operands().iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{}", sep, op)?;
        }
        Ok(())
    }
}
