//! Interpreter - fetch-decode-execute engine
//!
//! Owns the whole machine: memory, registers, stack, program counter and the
//! console. One instance runs one image:
//!
//! ```text
//! Idle --load--> Loaded --step/execute--> Running --+--> Halted     (HALT)
//!                                                   +--> Exhausted  (pc past image)
//!                                                   +--> Faulted    (fatal fault)
//! ```
//!
//! Each cycle reads the opcode word at `pc`, then exactly `arity` operand
//! words, rejecting any operand at or above 32776, and dispatches. Handlers
//! live in the `ops_*` submodules.

mod ops_arith;
mod ops_control;
mod ops_data;
mod ops_io;

use super::binary::decode_image;
use super::console::{Console, StdConsole};
use super::coredump::{Coredump, Traceback};
use super::instruction::Instruction;
use super::memory::Memory;
use super::opcode::Opcode;
use super::register::RegisterFile;
use super::stack::Stack;
use super::word::{Operand, Word};
use crate::config::VmConfig;
use crate::error::{DecodeFault, LoadError, Result, RuntimeFault, VmError};
use std::fmt;

/// Lifecycle state of an interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, no image attached
    Idle,
    /// Image attached, nothing executed yet
    Loaded,
    Running,
    Halted,
    /// Program counter ran past the loaded image
    Exhausted,
    Faulted,
}

impl RunState {
    /// True once no further instruction can execute
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Halted | Self::Exhausted | Self::Faulted)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loaded => "loaded",
            Self::Running => "running",
            Self::Halted => "halted",
            Self::Exhausted => "exhausted",
            Self::Faulted => "faulted",
        };
        write!(f, "{}", name)
    }
}

/// Result of executing a single instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    Halt,
    /// No instruction left to fetch
    Ended,
}

/// How a completed run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Halted,
    Exhausted,
}

/// Bytecode interpreter
pub struct Interpreter<C: Console = StdConsole> {
    memory: Memory,
    registers: RegisterFile,
    stack: Stack,
    pc: Word,
    /// Loaded image size in words; fetching stops here
    program_len: usize,
    state: RunState,
    console: C,
    config: VmConfig,
    traceback: Option<Traceback>,
    coredump: Option<Coredump>,
    steps: u64,
}

impl Interpreter<StdConsole> {
    /// Interpreter on process stdin/stdout with default config
    pub fn new() -> Self {
        Self::build(StdConsole::new(), VmConfig::default(), Stack::new())
    }
}

impl Default for Interpreter<StdConsole> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Console> Interpreter<C> {
    /// Interpreter on `console` with `config`.
    ///
    /// Fails with `InvalidConfig` for settings the machine cannot honor and
    /// with `AllocationFailure` when the initial stack cannot be allocated.
    pub fn with_console(console: C, config: VmConfig) -> Result<Self> {
        config.validate()?;
        let stack = Stack::with_capacity(config.stack_capacity)?;
        Ok(Self::build(console, config, stack))
    }

    fn build(console: C, config: VmConfig, stack: Stack) -> Self {
        Self {
            memory: Memory::new(),
            registers: RegisterFile::new(),
            stack,
            pc: 0,
            program_len: 0,
            state: RunState::Idle,
            console,
            config,
            traceback: None,
            coredump: None,
            steps: 0,
        }
    }

    /// Attach an image. Allowed once per instance.
    pub fn load(&mut self, bytes: &[u8]) -> Result<()> {
        if self.state != RunState::Idle {
            return Err(self.record("load", LoadError::AlreadyLoaded.into()));
        }
        let words = decode_image(bytes).map_err(|e| self.record("load", e.into()))?;
        self.memory
            .load(&words)
            .map_err(|e| self.record("load", e.into()))?;
        self.program_len = words.len();
        self.state = RunState::Loaded;
        log::debug!("loaded {} bytes ({} words)", bytes.len(), words.len());
        Ok(())
    }

    /// Run until HALT, image exhaustion or a fault
    pub fn execute(&mut self) -> Result<Outcome> {
        log::debug!("beginning execution at {}", self.pc);
        loop {
            match self.step()? {
                StepResult::Continue => continue,
                StepResult::Halt => return Ok(Outcome::Halted),
                StepResult::Ended => return Ok(Outcome::Exhausted),
            }
        }
    }

    /// Execute exactly one instruction
    pub fn step(&mut self) -> Result<StepResult> {
        match self.state {
            RunState::Loaded | RunState::Running => {}
            RunState::Idle => return Err(self.record("execute", VmError::NotLoaded)),
            other => {
                let err = VmError::InvalidState(format!("cannot execute a {} vm", other));
                return Err(self.record("execute", err));
            }
        }

        if self.pc as usize >= self.program_len {
            self.state = RunState::Exhausted;
            self.console
                .flush()
                .map_err(|e| self.fault("execute", io_fault(e)))?;
            log::debug!("program exhausted after {} steps", self.steps);
            return Ok(StepResult::Ended);
        }
        self.state = RunState::Running;

        let instr = self.decode().map_err(|e| self.fault("execute", e))?;
        log::trace!("{}: {}", instr.addr, instr);
        self.steps += 1;

        match self.dispatch(instr) {
            Ok(StepResult::Halt) => {
                self.state = RunState::Halted;
                if self.config.coredump_on_halt {
                    let dump = self.snapshot(None);
                    log::info!("program halted\n{}", dump);
                    self.coredump = Some(dump);
                }
                self.console
                    .flush()
                    .map_err(|e| self.fault("HALT", io_fault(e)))?;
                log::debug!("program halted after {} steps: {}", self.steps, self.registers);
                Ok(StepResult::Halt)
            }
            Ok(result) => Ok(result),
            Err(e) => Err(self.fault(instr.opcode.mnemonic(), e)),
        }
    }

    /// Release the instance and hand back its console
    pub fn free(self) -> C {
        log::debug!(
            "released stack storage ({} slots, {} in use)",
            self.stack.capacity(),
            self.stack.depth()
        );
        self.console
    }

    /// Capture registers and stack without disturbing them
    pub fn snapshot(&self, reason: Option<String>) -> Coredump {
        Coredump {
            pc: self.pc,
            registers: self.registers.as_array(),
            stack: self.stack.iter_top_down().collect(),
            steps: self.steps,
            reason,
        }
    }

    fn fetch(&mut self) -> Result<Word> {
        let word = self.memory.read(self.pc as usize)?;
        self.pc = self.pc.wrapping_add(1);
        Ok(word)
    }

    fn decode(&mut self) -> Result<Instruction> {
        let addr = self.pc;
        let word = self.fetch()?;
        let opcode = Opcode::from_word(word).ok_or(DecodeFault::UnknownOpcode { pc: addr, word })?;

        let mut operands = [Operand::default(); Opcode::MAX_ARITY];
        for (found, slot) in operands.iter_mut().take(opcode.arity()).enumerate() {
            if self.pc as usize >= self.program_len {
                return Err(DecodeFault::OperandCountMismatch {
                    pc: addr,
                    opcode: opcode.mnemonic(),
                    expected: opcode.arity(),
                    found,
                }
                .into());
            }
            let raw = self.fetch()?;
            *slot = Operand::decode(raw).ok_or(DecodeFault::OperandOverflow { pc: addr, operand: raw })?;
        }
        Ok(Instruction::new(addr, opcode, &operands))
    }

    fn dispatch(&mut self, instr: Instruction) -> Result<StepResult> {
        let (a, b, c) = (instr.operand(0), instr.operand(1), instr.operand(2));
        match instr.opcode {
            Opcode::Halt => Ok(StepResult::Halt),
            Opcode::Set => self.execute_set(a, b),
            Opcode::Push => self.execute_push(a),
            Opcode::Pop => self.execute_pop(a),
            Opcode::Eq => self.execute_eq(a, b, c),
            Opcode::Gt => self.execute_gt(a, b, c),
            Opcode::Jmp => self.execute_jmp(a),
            Opcode::Jt => self.execute_jt(a, b),
            Opcode::Jf => self.execute_jf(a, b),
            Opcode::Add => self.execute_add(a, b, c),
            Opcode::Mult => self.execute_mult(a, b, c),
            Opcode::Mod => self.execute_mod(a, b, c),
            Opcode::And => self.execute_and(a, b, c),
            Opcode::Or => self.execute_or(a, b, c),
            Opcode::Not => self.execute_not(a, b),
            Opcode::Rmem => self.execute_rmem(a, b),
            Opcode::Wmem => self.execute_wmem(a, b),
            Opcode::Call => self.execute_call(a),
            Opcode::Ret => self.execute_ret(),
            Opcode::Out => self.execute_out(a),
            Opcode::In => self.execute_in(a),
            Opcode::Nop => Ok(StepResult::Continue),
        }
    }

    /// Resolve an operand to its value
    fn value(&self, op: Operand) -> Word {
        match op {
            Operand::Literal(value) => value,
            Operand::Register(index) => self.registers.get(index),
        }
    }

    /// Write to an operand's location: a register, or the memory cell a
    /// literal addresses
    fn store(&mut self, target: Operand, value: Word) -> Result<()> {
        match target {
            Operand::Register(index) => self.registers.set(index, value),
            Operand::Literal(addr) => self.memory.write(addr as usize, value)?,
        }
        Ok(())
    }

    fn record(&mut self, origin: &str, err: VmError) -> VmError {
        log::warn!("{} failed: {}", origin, err);
        self.traceback = Some(Traceback::new(origin, err.to_string()));
        err
    }

    fn fault(&mut self, origin: &str, err: VmError) -> VmError {
        self.state = RunState::Faulted;
        let err = self.record(origin, err);
        log::error!("fatal fault at pc {}: {}", self.pc, err);
        if self.config.coredump_on_fault {
            self.coredump = Some(self.snapshot(Some(err.to_string())));
        }
        if let Err(e) = self.console.flush() {
            log::warn!("console flush failed after fault: {}", e);
        }
        err
    }

    // === Accessors ===

    pub fn pc(&self) -> Word {
        self.pc
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Loaded image size in words
    pub fn program_len(&self) -> usize {
        self.program_len
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn traceback(&self) -> Option<&Traceback> {
        self.traceback.as_ref()
    }

    /// Last captured coredump, if a hook fired
    pub fn coredump(&self) -> Option<&Coredump> {
        self.coredump.as_ref()
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }
}

fn io_fault(err: std::io::Error) -> VmError {
    RuntimeFault::Io(err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EofPolicy;
    use crate::error::ResourceFault;
    use crate::vm::binary::encode_image;
    use crate::vm::console::BufferConsole;

    const R0: Word = 32768;
    const R1: Word = 32769;
    const R2: Word = 32770;
    const R3: Word = 32771;

    fn boot(words: &[Word], input: &str, config: VmConfig) -> Interpreter<BufferConsole> {
        let mut vm = Interpreter::with_console(BufferConsole::with_input(input), config).unwrap();
        vm.load(&encode_image(words)).unwrap();
        vm
    }

    fn run(words: &[Word]) -> (Interpreter<BufferConsole>, Result<Outcome>) {
        let mut vm = boot(words, "", VmConfig::default());
        let result = vm.execute();
        (vm, result)
    }

    #[test]
    fn test_interpreter_creation() {
        let vm = Interpreter::new();
        assert_eq!(vm.pc(), 0);
        assert_eq!(vm.state(), RunState::Idle);
        assert!(vm.registers().is_zeroed());
        assert!(vm.stack().is_empty());
        assert_eq!(vm.stack().capacity(), 32);
    }

    #[test]
    fn test_construction_rejects_bad_config() {
        let config: VmConfig =
            serde_json::from_str(r#"{ "stack_capacity": 18446744073709551615 }"#).unwrap();
        let err = Interpreter::with_console(BufferConsole::new(), config).err().unwrap();
        assert_eq!(
            err,
            VmError::Resource(ResourceFault::AllocationFailure { requested: usize::MAX })
        );
        assert!(err.is_fatal());

        let config = VmConfig::default().with_eof(EofPolicy::Sentinel(40000));
        let err = Interpreter::with_console(BufferConsole::new(), config).err().unwrap();
        assert!(matches!(err, VmError::InvalidConfig(_)));

        let config = VmConfig::default().with_eof(EofPolicy::Sentinel(10));
        let vm = Interpreter::with_console(BufferConsole::new(), config).unwrap();
        assert_eq!(vm.config().eof, EofPolicy::Sentinel(10));
        assert_eq!(vm.stack().capacity(), 32);
    }

    #[test]
    fn test_halt_round_trip() {
        let (vm, result) = run(&[0]);
        assert_eq!(result, Ok(Outcome::Halted));
        assert_eq!(vm.state(), RunState::Halted);
        assert!(vm.registers().is_zeroed());
        assert!(vm.stack().is_empty());
        assert!(vm.coredump().is_none());
        assert!(vm.traceback().is_none());
    }

    #[test]
    fn test_halt_coredump_hook() {
        let mut vm = boot(&[2, 7, 1, R1, 9, 0], "", VmConfig::diagnostic());
        assert_eq!(vm.execute(), Ok(Outcome::Halted));
        let dump = vm.coredump().unwrap();
        assert_eq!(dump.reason, None);
        assert_eq!(dump.registers[1], 9);
        assert_eq!(dump.stack, vec![7]);
        assert_eq!(dump.steps, 3);
        // dumping leaves the stack intact
        assert_eq!(vm.stack().depth(), 1);
    }

    #[test]
    fn test_add_and_out() {
        // SET r0, 2; ADD r0, r0, 1; OUT r0
        let (vm, result) = run(&[1, R0, 2, 9, R0, R0, 1, 19, R0]);
        assert_eq!(result, Ok(Outcome::Exhausted));
        assert_eq!(vm.console().output(), &[3u8]);
        assert_eq!(vm.registers().get(0), 3);
    }

    #[test]
    fn test_single_out_exhausts_cleanly() {
        let (vm, result) = run(&[19, 65]);
        assert_eq!(result, Ok(Outcome::Exhausted));
        assert_eq!(vm.state(), RunState::Exhausted);
        assert_eq!(vm.console().output_lossy(), "A");
        assert!(vm.traceback().is_none());
    }

    #[test]
    fn test_unknown_opcode() {
        let (vm, result) = run(&[99, 19, 65]);
        assert_eq!(
            result,
            Err(VmError::Decode(DecodeFault::UnknownOpcode { pc: 0, word: 99 }))
        );
        assert_eq!(vm.state(), RunState::Faulted);
        assert!(vm.console().output().is_empty());
        assert!(vm.coredump().unwrap().reason.as_ref().unwrap().contains("unknown opcode"));
        assert_eq!(vm.traceback().unwrap().origin, "execute");
    }

    #[test]
    fn test_oversized_image_rejected() {
        let mut vm = Interpreter::with_console(BufferConsole::new(), VmConfig::default()).unwrap();
        let err = vm.load(&vec![0u8; 70000]).unwrap_err();
        assert_eq!(
            err,
            VmError::Load(LoadError::SizeExceeded { size: 70000, max: 65536 })
        );
        assert!(!err.is_fatal());
        assert_eq!(vm.state(), RunState::Idle);
        assert_eq!(vm.traceback().unwrap().origin, "load");
        assert_eq!(vm.execute(), Err(VmError::NotLoaded));
        assert_eq!(vm.steps(), 0);
    }

    #[test]
    fn test_double_load_rejected() {
        let mut vm = boot(&[19, 65], "", VmConfig::default());
        let err = vm.load(&encode_image(&[0])).unwrap_err();
        assert_eq!(err, VmError::Load(LoadError::AlreadyLoaded));
        assert_eq!(
            vm.traceback().unwrap().reason,
            "load error: cannot double-load buffers"
        );
        // the first image is still intact and runnable
        assert_eq!(vm.execute(), Ok(Outcome::Exhausted));
        assert_eq!(vm.console().output(), b"A");
    }

    #[test]
    fn test_misaligned_image_rejected() {
        let mut vm = Interpreter::with_console(BufferConsole::new(), VmConfig::default()).unwrap();
        assert_eq!(
            vm.load(&[19, 0, 65]),
            Err(VmError::Load(LoadError::MisalignedLength(3)))
        );
    }

    #[test]
    fn test_truncated_operands_fault() {
        for opcode in Opcode::ALL.iter().filter(|op| op.arity() > 0) {
            let mut words = vec![opcode.word()];
            words.extend(std::iter::repeat(1).take(opcode.arity() - 1));
            let (vm, result) = run(&words);
            assert_eq!(
                result,
                Err(VmError::Decode(DecodeFault::OperandCountMismatch {
                    pc: 0,
                    opcode: opcode.mnemonic(),
                    expected: opcode.arity(),
                    found: opcode.arity() - 1,
                })),
                "{}",
                opcode
            );
            assert_eq!(vm.steps(), 0);
        }
    }

    #[test]
    fn test_operand_overflow() {
        let (_, result) = run(&[19, 32776]);
        assert_eq!(
            result,
            Err(VmError::Decode(DecodeFault::OperandOverflow { pc: 0, operand: 32776 }))
        );

        // last register reference is still legal
        let (vm, result) = run(&[1, 32775, 5]);
        assert_eq!(result, Ok(Outcome::Exhausted));
        assert_eq!(vm.registers().get(7), 5);
    }

    #[test]
    fn test_register_resolution() {
        // SET r3, 77; ADD r0, r3, 0; ADD r1, 77, 0
        let (vm, _) = run(&[1, R3, 77, 9, R0, R3, 0, 9, R1, 77, 0]);
        assert_eq!(vm.registers().get(0), 77);
        assert_eq!(vm.registers().get(1), 77);
    }

    #[test]
    fn test_set_literal_target_writes_memory() {
        let (vm, result) = run(&[1, 50, 7]);
        assert_eq!(result, Ok(Outcome::Exhausted));
        assert_eq!(vm.memory().read(50), Ok(7));
        assert!(vm.registers().is_zeroed());
    }

    #[test]
    fn test_stack_lifo() {
        // PUSH 1; PUSH 2; PUSH 3; POP r0; POP r1; POP r2
        let (vm, result) = run(&[2, 1, 2, 2, 2, 3, 3, R0, 3, R1, 3, R2]);
        assert_eq!(result, Ok(Outcome::Exhausted));
        assert_eq!(vm.registers().get(0), 3);
        assert_eq!(vm.registers().get(1), 2);
        assert_eq!(vm.registers().get(2), 1);
        assert!(vm.stack().is_empty());
    }

    #[test]
    fn test_pop_empty_faults() {
        let (vm, result) = run(&[3, R0]);
        assert_eq!(result, Err(VmError::Runtime(RuntimeFault::StackUnderflow)));
        assert_eq!(vm.traceback().unwrap().origin, "POP");
        assert_eq!(vm.state(), RunState::Faulted);
    }

    #[test]
    fn test_ret_empty_faults() {
        let (vm, result) = run(&[18]);
        assert_eq!(result, Err(VmError::Runtime(RuntimeFault::StackUnderflow)));
        assert_eq!(vm.traceback().unwrap().origin, "RET");
    }

    #[test]
    fn test_call_ret() {
        // 0: CALL 5; 2: OUT 'A'; 4: HALT; 5: OUT 'B'; 7: RET
        let (vm, result) = run(&[17, 5, 19, 65, 0, 19, 66, 18]);
        assert_eq!(result, Ok(Outcome::Halted));
        assert_eq!(vm.console().output_lossy(), "BA");
        assert!(vm.stack().is_empty());
    }

    #[test]
    fn test_call_pushes_next_word_address() {
        // 0: SET r0, 6; 3: CALL r0; 5: HALT; 6: POP r1
        let (vm, _) = run(&[1, R0, 6, 17, R0, 0, 3, R1]);
        assert_eq!(vm.registers().get(1), 5);
    }

    #[test]
    fn test_conditional_jumps() {
        // 0: JT 1, 5; 3: OUT 'X'; 5: JF 0, 10; 8: OUT 'Y'; 10: OUT 'Z'; 12: HALT
        let (vm, result) = run(&[7, 1, 5, 19, 88, 8, 0, 10, 19, 89, 19, 90, 0]);
        assert_eq!(result, Ok(Outcome::Halted));
        assert_eq!(vm.console().output_lossy(), "Z");

        // not taken
        let (vm, _) = run(&[7, 0, 5, 19, 88, 8, 1, 10, 19, 89, 0]);
        assert_eq!(vm.console().output_lossy(), "XY");
    }

    #[test]
    fn test_jump_past_image_exhausts() {
        let (vm, result) = run(&[6, 1000, 19, 65]);
        assert_eq!(result, Ok(Outcome::Exhausted));
        assert_eq!(vm.pc(), 1000);
        assert!(vm.console().output().is_empty());
    }

    #[test]
    fn test_arithmetic() {
        let (vm, _) = run(&[
            9, R0, 32758, 15, // ADD r0 = 5
            10, R1, 32767, 32767, // MULT r1 = 1
            11, R2, 10, 3, // MOD r2 = 1
            12, R3, 0b1100, 0b1010, // AND r3 = 8
            13, 32772, 0b1100, 0b1010, // OR r4 = 14
            14, 32773, 0, // NOT r5 = 32767
        ]);
        assert_eq!(
            vm.registers().as_array(),
            [5, 1, 1, 0b1000, 0b1110, 32767, 0, 0]
        );
    }

    #[test]
    fn test_comparisons_are_boolean() {
        let (vm, _) = run(&[
            4, R0, 7, 7, // EQ r0 = 1
            4, R1, 7, 8, // EQ r1 = 0
            5, R2, 9, 8, // GT r2 = 1
            5, R3, 8, 8, // GT r3 = 0
        ]);
        assert_eq!(&vm.registers().as_array()[..4], &[1, 0, 1, 0]);
    }

    #[test]
    fn test_mod_by_zero_faults() {
        let (_, result) = run(&[11, R0, 5, 0]);
        assert_eq!(result, Err(VmError::Runtime(RuntimeFault::DivisionByZero)));
    }

    #[test]
    fn test_rmem_wmem_word_addressed() {
        // WMEM 100, 42; RMEM r0, 100
        let (vm, _) = run(&[16, 100, 42, 15, R0, 100]);
        assert_eq!(vm.memory().read(100), Ok(42));
        assert_eq!(vm.registers().get(0), 42);
    }

    #[test]
    fn test_rmem_out_of_bounds() {
        // 0: RMEM r0, [7]; 3: RMEM r1, [r0]; 6: HALT; 7: data 40000
        let (vm, result) = run(&[15, R0, 7, 15, R1, R0, 0, 40000]);
        assert_eq!(
            result,
            Err(VmError::Runtime(RuntimeFault::MemoryOutOfBounds {
                addr: 40000,
                capacity: 32768,
            }))
        );
        assert_eq!(vm.registers().get(0), 40000);
        assert_eq!(vm.traceback().unwrap().origin, "RMEM");
    }

    #[test]
    fn test_wmem_register_address_out_of_bounds() {
        // 0: RMEM r0, [6]; 3: WMEM r0, 1; 6: data 40000
        let (vm, result) = run(&[15, R0, 6, 16, R0, 1, 40000]);
        assert_eq!(
            result,
            Err(VmError::Runtime(RuntimeFault::MemoryOutOfBounds {
                addr: 40000,
                capacity: 32768,
            }))
        );
        assert_eq!(vm.traceback().unwrap().origin, "WMEM");
        assert_eq!(vm.state(), RunState::Faulted);
    }

    #[test]
    fn test_set_targets_stay_in_bounds() {
        // 0: SET #32767, 9; 3: RMEM r0, [6]; 6: data 40000
        let (vm, result) = run(&[1, 32767, 9, 15, R0, 6, 40000]);
        assert_eq!(
            result,
            Err(VmError::Decode(DecodeFault::UnknownOpcode { pc: 6, word: 40000 }))
        );
        assert_eq!(vm.memory().read(32767), Ok(9));
        // a register target never touches memory, whatever it holds
        assert_eq!(vm.registers().get(0), 40000);
    }

    #[test]
    fn test_self_modifying_code() {
        // 0: WMEM 6, 19; 3: WMEM 7, 66; 6: NOP; 7: NOP; 8: HALT
        let (vm, result) = run(&[16, 6, 19, 16, 7, 66, 21, 21, 0]);
        assert_eq!(result, Ok(Outcome::Halted));
        assert_eq!(vm.console().output_lossy(), "B");
    }

    #[test]
    fn test_in_reads_bytes() {
        let mut vm = boot(&[20, R0, 20, R1, 0], "hi", VmConfig::default());
        assert_eq!(vm.execute(), Ok(Outcome::Halted));
        assert_eq!(vm.registers().get(0), b'h' as Word);
        assert_eq!(vm.registers().get(1), b'i' as Word);
    }

    #[test]
    fn test_in_eof_policies() {
        let mut vm = boot(&[20, R0, 0], "", VmConfig::default());
        assert_eq!(vm.execute(), Err(VmError::Runtime(RuntimeFault::InputExhausted)));

        let config = VmConfig::default().with_eof(EofPolicy::Sentinel(10));
        let mut vm = boot(&[20, R0, 0], "", config);
        assert_eq!(vm.execute(), Ok(Outcome::Halted));
        assert_eq!(vm.registers().get(0), 10);
    }

    #[test]
    fn test_in_writes_literal_target_to_memory() {
        let mut vm = boot(&[20, 50, 0], "x", VmConfig::default());
        assert_eq!(vm.execute(), Ok(Outcome::Halted));
        assert_eq!(vm.memory().read(50), Ok(b'x' as Word));
        assert!(vm.registers().is_zeroed());

        let config = VmConfig::default().with_eof(EofPolicy::Sentinel(32767));
        let mut vm = boot(&[20, 60, 0], "", config);
        assert_eq!(vm.execute(), Ok(Outcome::Halted));
        assert_eq!(vm.memory().read(60), Ok(32767));
    }

    #[test]
    fn test_input_fed_between_steps() {
        let mut vm = boot(&[20, R0, 20, R1, 0], "a", VmConfig::default());
        assert_eq!(vm.step(), Ok(StepResult::Continue));
        vm.console_mut().push_input("b");
        assert_eq!(vm.execute(), Ok(Outcome::Halted));
        assert_eq!(vm.registers().get(0), b'a' as Word);
        assert_eq!(vm.registers().get(1), b'b' as Word);
    }

    #[test]
    fn test_out_truncates_to_byte() {
        let (vm, _) = run(&[19, 256 + 65]);
        assert_eq!(vm.console().output(), b"A");
    }

    #[test]
    fn test_step_api() {
        let mut vm = boot(&[21, 19, 65], "", VmConfig::default());
        assert_eq!(vm.state(), RunState::Loaded);
        assert_eq!(vm.step(), Ok(StepResult::Continue));
        assert_eq!(vm.state(), RunState::Running);
        assert_eq!(vm.pc(), 1);
        assert_eq!(vm.step(), Ok(StepResult::Continue));
        assert_eq!(vm.step(), Ok(StepResult::Ended));
        assert_eq!(vm.steps(), 2);
        assert!(vm.state().is_terminal());
    }

    #[test]
    fn test_execute_after_halt_rejected() {
        let (mut vm, _) = run(&[0]);
        let err = vm.execute().unwrap_err();
        assert!(matches!(err, VmError::InvalidState(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_quiet_config_skips_coredump() {
        let mut vm = boot(&[99], "", VmConfig::quiet());
        assert!(vm.execute().is_err());
        assert!(vm.coredump().is_none());
        assert!(vm.traceback().is_some());
    }

    #[test]
    fn test_free_returns_console() {
        let (vm, _) = run(&[19, 79, 19, 75]);
        let console = vm.free();
        assert_eq!(console.output_lossy(), "OK");
    }

    #[test]
    fn test_empty_image() {
        let (vm, result) = run(&[]);
        assert_eq!(result, Ok(Outcome::Exhausted));
        assert_eq!(vm.steps(), 0);
    }

    #[test]
    fn test_deep_recursion_grows_stack() {
        // 0: PUSH r0; 2: ADD r0, r0, 1; 6: EQ r1, r0, 5000; 10: JF r1, 0; 13: HALT
        let (vm, result) = run(&[2, R0, 9, R0, R0, 1, 4, R1, R0, 5000, 8, R1, 0, 0]);
        assert_eq!(result, Ok(Outcome::Halted));
        assert_eq!(vm.stack().depth(), 5000);
        assert!(vm.stack().capacity() >= 5000);
    }
}
