//! Console - character I/O collaborator for OUT and IN
//!
//! The VM writes one byte per OUT and reads one byte per IN. What happens
//! when input runs dry is decided by [`crate::config::EofPolicy`], not by the
//! console: a console only reports `None` at end of input.

use std::collections::VecDeque;
use std::io::{self, BufRead, Read, Write};

/// Byte-oriented I/O used by the interpreter
pub trait Console {
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;

    /// Next input byte, blocking until one is available.
    ///
    /// `Ok(None)` signals end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    fn flush(&mut self) -> io::Result<()>;
}

/// Process stdin/stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        io::stdout().lock().write_all(&[byte])
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        // Prompts written so far must be visible before blocking.
        self.flush()?;
        let stdin = io::stdin();
        let mut lock = stdin.lock();
        if lock.fill_buf()?.is_empty() {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        lock.read_exact(&mut byte)?;
        Ok(Some(byte[0]))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().lock().flush()
    }
}

/// In-memory console: queued input, captured output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferConsole {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: impl AsRef<[u8]>) -> Self {
        Self {
            input: input.as_ref().iter().copied().collect(),
            output: Vec::new(),
        }
    }

    pub fn push_input(&mut self, input: impl AsRef<[u8]>) {
        self.input.extend(input.as_ref());
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for BufferConsole {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.output.push(byte);
        Ok(())
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.input.pop_front())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
