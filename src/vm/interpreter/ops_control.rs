//! Control flow operation implementations for the Interpreter
//!
//! Jump targets are word addresses. CALL runs after the operand fetch, so
//! `pc` already holds the address of the following instruction.

use super::{Console, Interpreter, Operand, Result, StepResult};

impl<C: Console> Interpreter<C> {
    pub(super) fn execute_jmp(&mut self, a: Operand) -> Result<StepResult> {
        self.pc = self.value(a);
        Ok(StepResult::Continue)
    }

    pub(super) fn execute_jt(&mut self, a: Operand, b: Operand) -> Result<StepResult> {
        if self.value(a) != 0 {
            self.pc = self.value(b);
        }
        Ok(StepResult::Continue)
    }

    pub(super) fn execute_jf(&mut self, a: Operand, b: Operand) -> Result<StepResult> {
        if self.value(a) == 0 {
            self.pc = self.value(b);
        }
        Ok(StepResult::Continue)
    }

    pub(super) fn execute_call(&mut self, a: Operand) -> Result<StepResult> {
        let target = self.value(a);
        self.stack.push(self.pc)?;
        self.pc = target;
        Ok(StepResult::Continue)
    }

    /// Empty stack is a fault, never an implicit halt
    pub(super) fn execute_ret(&mut self) -> Result<StepResult> {
        self.pc = self.stack.pop()?;
        Ok(StepResult::Continue)
    }
}
