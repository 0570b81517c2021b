//! Stack - growable LIFO word store
//!
//! Holds PUSH/POP values and CALL return addresses. Capacity grows
//! geometrically on demand and is never given back until the VM is released.

use super::word::Word;
use crate::error::{ResourceFault, RuntimeFault};

/// Default number of slots allocated up front
pub const BASE_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    slots: Vec<Word>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(BASE_CAPACITY),
        }
    }

    /// Stack with `capacity` slots allocated up front
    pub fn with_capacity(capacity: usize) -> Result<Self, ResourceFault> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| ResourceFault::AllocationFailure {
                requested: capacity,
            })?;
        Ok(Self { slots })
    }

    pub fn push(&mut self, value: Word) -> Result<(), ResourceFault> {
        if self.slots.len() == self.slots.capacity() {
            let requested = (self.slots.capacity() * 2).max(BASE_CAPACITY);
            self.slots
                .try_reserve(requested - self.slots.len())
                .map_err(|_| ResourceFault::AllocationFailure { requested })?;
            log::trace!("stack grown to {} slots", self.slots.capacity());
        }
        self.slots.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Word, RuntimeFault> {
        self.slots.pop().ok_or(RuntimeFault::StackUnderflow)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current element count
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Contents from top to bottom, without popping
    pub fn iter_top_down(&self) -> impl Iterator<Item = Word> + '_ {
        self.slots.iter().rev().copied()
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo() {
        let mut stack = Stack::new();
        for v in [1, 2, 3, 4] {
            stack.push(v).unwrap();
        }
        assert_eq!(stack.depth(), 4);
        assert_eq!(stack.pop(), Ok(4));
        assert_eq!(stack.pop(), Ok(3));
        assert_eq!(stack.pop(), Ok(2));
        assert_eq!(stack.pop(), Ok(1));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_underflow() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), Err(RuntimeFault::StackUnderflow));
        stack.push(7).unwrap();
        stack.pop().unwrap();
        assert_eq!(stack.pop(), Err(RuntimeFault::StackUnderflow));
    }

    #[test]
    fn test_growth_keeps_data() {
        let mut stack = Stack::with_capacity(2).unwrap();
        for v in 0..1000 {
            stack.push(v).unwrap();
        }
        assert!(stack.capacity() >= 1000);
        let drained: Vec<Word> = (0..1000).map(|_| stack.pop().unwrap()).collect();
        let expected: Vec<Word> = (0..1000).rev().collect();
        assert_eq!(drained, expected);
    }

    #[test]
    fn test_oversized_capacity_fails() {
        assert_eq!(
            Stack::with_capacity(usize::MAX),
            Err(ResourceFault::AllocationFailure { requested: usize::MAX })
        );
        assert!(Stack::with_capacity(0).unwrap().is_empty());
    }

    #[test]
    fn test_never_shrinks() {
        let mut stack = Stack::new();
        for v in 0..100 {
            stack.push(v).unwrap();
        }
        let cap = stack.capacity();
        while stack.pop().is_ok() {}
        assert_eq!(stack.capacity(), cap);
    }

    #[test]
    fn test_top_down_view() {
        let mut stack = Stack::new();
        stack.push(10).unwrap();
        stack.push(20).unwrap();
        assert_eq!(stack.iter_top_down().collect::<Vec<_>>(), vec![20, 10]);
        assert_eq!(stack.depth(), 2);
    }
}
