//! Console operations

use super::{io_fault, Console, Interpreter, Operand, Result, StepResult};
use crate::config::EofPolicy;
use crate::error::RuntimeFault;
use crate::vm::word::Word;

impl<C: Console> Interpreter<C> {
    /// Only the low byte reaches the console
    pub(super) fn execute_out(&mut self, a: Operand) -> Result<StepResult> {
        let byte = self.value(a) as u8;
        self.console.write_byte(byte).map_err(io_fault)?;
        Ok(StepResult::Continue)
    }

    pub(super) fn execute_in(&mut self, a: Operand) -> Result<StepResult> {
        let value = match self.console.read_byte().map_err(io_fault)? {
            Some(byte) => byte as Word,
            None => match self.config.eof {
                EofPolicy::Fault => return Err(RuntimeFault::InputExhausted.into()),
                EofPolicy::Sentinel(word) => {
                    log::debug!("input exhausted, storing sentinel {}", word);
                    word
                }
            },
        };
        self.store(a, value)?;
        Ok(StepResult::Continue)
    }
}
