//! Arithmetic, logic and comparison
//!
//! All results stay in the 15-bit literal range.

use super::{Console, Interpreter, Operand, Result, StepResult};
use crate::error::RuntimeFault;
use crate::vm::word::{self, Word};

impl<C: Console> Interpreter<C> {
    /// target(a) = f(value(b), value(c))
    fn binary_op(
        &mut self,
        a: Operand,
        b: Operand,
        c: Operand,
        f: impl FnOnce(Word, Word) -> Word,
    ) -> Result<StepResult> {
        let result = f(self.value(b), self.value(c));
        self.store(a, result)?;
        Ok(StepResult::Continue)
    }

    pub(super) fn execute_eq(&mut self, a: Operand, b: Operand, c: Operand) -> Result<StepResult> {
        self.binary_op(a, b, c, |x, y| (x == y) as Word)
    }

    pub(super) fn execute_gt(&mut self, a: Operand, b: Operand, c: Operand) -> Result<StepResult> {
        self.binary_op(a, b, c, |x, y| (x > y) as Word)
    }

    pub(super) fn execute_add(&mut self, a: Operand, b: Operand, c: Operand) -> Result<StepResult> {
        self.binary_op(a, b, c, word::add)
    }

    pub(super) fn execute_mult(&mut self, a: Operand, b: Operand, c: Operand) -> Result<StepResult> {
        self.binary_op(a, b, c, word::mult)
    }

    pub(super) fn execute_mod(&mut self, a: Operand, b: Operand, c: Operand) -> Result<StepResult> {
        if self.value(c) == 0 {
            return Err(RuntimeFault::DivisionByZero.into());
        }
        self.binary_op(a, b, c, |x, y| x % y)
    }

    pub(super) fn execute_and(&mut self, a: Operand, b: Operand, c: Operand) -> Result<StepResult> {
        self.binary_op(a, b, c, |x, y| x & y)
    }

    pub(super) fn execute_or(&mut self, a: Operand, b: Operand, c: Operand) -> Result<StepResult> {
        self.binary_op(a, b, c, |x, y| x | y)
    }

    pub(super) fn execute_not(&mut self, a: Operand, b: Operand) -> Result<StepResult> {
        let result = word::not(self.value(b));
        self.store(a, result)?;
        Ok(StepResult::Continue)
    }
}
