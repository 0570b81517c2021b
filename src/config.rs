//! Runtime configuration for the VM
//!
//! ```json
//! { "stack_capacity": 64, "coredump_on_halt": true, "eof": { "sentinel": 10 } }
//! ```
//!
//! Missing keys fall back to [`VmConfig::default`].

use crate::error::VmError;
use crate::vm::stack::BASE_CAPACITY;
use crate::vm::word::{Word, MAX_LITERAL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What IN does once the console reports end of input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "EofSetting", into = "EofSetting")]
pub enum EofPolicy {
    /// Fault the run with `InputExhausted`
    #[default]
    Fault,
    /// Store this word into the IN target and continue.
    ///
    /// Must be a literal (at most 32767).
    Sentinel(Word),
}

impl EofPolicy {
    /// Sentinel policy, `None` outside the literal range
    pub fn sentinel(word: Word) -> Option<Self> {
        (word <= MAX_LITERAL).then_some(Self::Sentinel(word))
    }

    /// Parse `fault` or a sentinel number
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "fault" => Some(Self::Fault),
            other => other.parse::<Word>().ok().and_then(Self::sentinel),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Self::Fault => true,
            Self::Sentinel(word) => *word <= MAX_LITERAL,
        }
    }
}

/// Wire form of [`EofPolicy`], range-checked on the way in
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum EofSetting {
    Fault,
    Sentinel(Word),
}

impl TryFrom<EofSetting> for EofPolicy {
    type Error = String;

    fn try_from(setting: EofSetting) -> std::result::Result<Self, Self::Error> {
        match setting {
            EofSetting::Fault => Ok(Self::Fault),
            EofSetting::Sentinel(word) => Self::sentinel(word)
                .ok_or_else(|| format!("eof sentinel {} exceeds {}", word, MAX_LITERAL)),
        }
    }
}

impl From<EofPolicy> for EofSetting {
    fn from(policy: EofPolicy) -> Self {
        match policy {
            EofPolicy::Fault => Self::Fault,
            EofPolicy::Sentinel(word) => Self::Sentinel(word),
        }
    }
}

/// Controls diagnostics and collaborator policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    /// Stack slots allocated at construction.
    pub stack_capacity: usize,
    /// Capture a coredump when HALT executes.
    pub coredump_on_halt: bool,
    /// Capture a coredump when a fatal fault stops the run.
    pub coredump_on_fault: bool,
    /// End-of-input behavior for IN.
    pub eof: EofPolicy,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_capacity: BASE_CAPACITY,
            coredump_on_halt: false,
            coredump_on_fault: true,
            eof: EofPolicy::Fault,
        }
    }
}

impl VmConfig {
    /// Every diagnostic hook enabled.
    pub fn diagnostic() -> Self {
        Self {
            coredump_on_halt: true,
            coredump_on_fault: true,
            ..Self::default()
        }
    }

    /// No coredumps at all.
    pub fn quiet() -> Self {
        Self {
            coredump_on_halt: false,
            coredump_on_fault: false,
            ..Self::default()
        }
    }

    pub fn with_eof(mut self, eof: EofPolicy) -> Self {
        self.eof = eof;
        self
    }

    /// Reject settings the machine cannot honor.
    ///
    /// Checked again when an interpreter is built, since fields are public.
    pub fn validate(&self) -> std::result::Result<(), VmError> {
        if !self.eof.is_valid() {
            return Err(VmError::InvalidConfig(format!(
                "eof policy {:?} stores a value above {}",
                self.eof, MAX_LITERAL
            )));
        }
        Ok(())
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }
}
