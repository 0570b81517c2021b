//! Data movement: registers, memory and the stack

use super::{Console, Interpreter, Operand, Result, StepResult};

impl<C: Console> Interpreter<C> {
    pub(super) fn execute_set(&mut self, a: Operand, b: Operand) -> Result<StepResult> {
        let value = self.value(b);
        self.store(a, value)?;
        Ok(StepResult::Continue)
    }

    pub(super) fn execute_push(&mut self, a: Operand) -> Result<StepResult> {
        let value = self.value(a);
        self.stack.push(value)?;
        Ok(StepResult::Continue)
    }

    pub(super) fn execute_pop(&mut self, a: Operand) -> Result<StepResult> {
        let value = self.stack.pop()?;
        self.store(a, value)?;
        Ok(StepResult::Continue)
    }

    pub(super) fn execute_rmem(&mut self, a: Operand, b: Operand) -> Result<StepResult> {
        let value = self.memory.read(self.value(b) as usize)?;
        self.store(a, value)?;
        Ok(StepResult::Continue)
    }

    /// Address operand is a plain word address, symmetric with RMEM
    pub(super) fn execute_wmem(&mut self, a: Operand, b: Operand) -> Result<StepResult> {
        let addr = self.value(a) as usize;
        let value = self.value(b);
        self.memory.write(addr, value)?;
        Ok(StepResult::Continue)
    }
}
