//! Memory - the linear word store shared by code and data
//!
//! Addresses are word indices, never byte offsets. The image is copied into
//! the low addresses at load time; the rest of the store starts zeroed.
//! Writes are visible to the very next fetch, so self-modifying programs
//! behave as expected.

use super::word::Word;
use crate::error::RuntimeFault;

/// Word capacity of the address space (one address per literal value)
pub const MEMORY_WORDS: usize = 32768;

/// Fixed-capacity word memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Box<[Word]>,
}

impl Memory {
    pub fn new() -> Self {
        Self::with_capacity(MEMORY_WORDS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: vec![0; capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Copy `words` into the store starting at address 0
    pub fn load(&mut self, words: &[Word]) -> Result<(), RuntimeFault> {
        let capacity = self.cells.len();
        let dst = self
            .cells
            .get_mut(..words.len())
            .ok_or(RuntimeFault::MemoryOutOfBounds {
                addr: words.len(),
                capacity,
            })?;
        dst.copy_from_slice(words);
        Ok(())
    }

    pub fn read(&self, addr: usize) -> Result<Word, RuntimeFault> {
        self.cells
            .get(addr)
            .copied()
            .ok_or(RuntimeFault::MemoryOutOfBounds {
                addr,
                capacity: self.cells.len(),
            })
    }

    pub fn write(&mut self, addr: usize, value: Word) -> Result<(), RuntimeFault> {
        let capacity = self.cells.len();
        let cell = self
            .cells
            .get_mut(addr)
            .ok_or(RuntimeFault::MemoryOutOfBounds { addr, capacity })?;
        *cell = value;
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
