//! Opcode - the closed 22-entry instruction set
//!
//! | Word | Opcode | Arity | Effect                                   |
//! |------|--------|-------|------------------------------------------|
//! | 0    | HALT   | 0     | stop execution                           |
//! | 1    | SET    | 2     | a = b                                    |
//! | 2    | PUSH   | 1     | push a                                   |
//! | 3    | POP    | 1     | a = pop()                                |
//! | 4    | EQ     | 3     | a = (b == c)                             |
//! | 5    | GT     | 3     | a = (b > c)                              |
//! | 6    | JMP    | 1     | pc = a                                   |
//! | 7    | JT     | 2     | if a != 0: pc = b                        |
//! | 8    | JF     | 2     | if a == 0: pc = b                        |
//! | 9    | ADD    | 3     | a = (b + c) mod 32768                    |
//! | 10   | MULT   | 3     | a = (b * c) mod 32768                    |
//! | 11   | MOD    | 3     | a = b mod c                              |
//! | 12   | AND    | 3     | a = b & c                                |
//! | 13   | OR     | 3     | a = b \| c                               |
//! | 14   | NOT    | 2     | a = ~b & 0x7FFF                          |
//! | 15   | RMEM   | 2     | a = mem[b]                               |
//! | 16   | WMEM   | 2     | mem[a] = b                               |
//! | 17   | CALL   | 1     | push(next pc); pc = a                    |
//! | 18   | RET    | 0     | pc = pop()                               |
//! | 19   | OUT    | 1     | write byte a                             |
//! | 20   | IN     | 1     | a = next input byte                      |
//! | 21   | NOP    | 0     | no effect                                |

use super::word::Word;
use std::fmt;

/// Operation opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Opcode {
    Halt = 0,
    Set = 1,
    Push = 2,
    Pop = 3,
    Eq = 4,
    Gt = 5,
    Jmp = 6,
    Jt = 7,
    Jf = 8,
    Add = 9,
    Mult = 10,
    Mod = 11,
    And = 12,
    Or = 13,
    Not = 14,
    Rmem = 15,
    Wmem = 16,
    Call = 17,
    Ret = 18,
    Out = 19,
    In = 20,
    Nop = 21,
}

impl Opcode {
    /// Number of opcodes
    pub const COUNT: usize = 22;

    /// Largest operand count of any opcode
    pub const MAX_ARITY: usize = 3;

    /// All opcodes in word order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Halt,
        Self::Set,
        Self::Push,
        Self::Pop,
        Self::Eq,
        Self::Gt,
        Self::Jmp,
        Self::Jt,
        Self::Jf,
        Self::Add,
        Self::Mult,
        Self::Mod,
        Self::And,
        Self::Or,
        Self::Not,
        Self::Rmem,
        Self::Wmem,
        Self::Call,
        Self::Ret,
        Self::Out,
        Self::In,
        Self::Nop,
    ];

    /// Look up an opcode word
    pub fn from_word(word: Word) -> Option<Self> {
        Self::ALL.get(word as usize).copied()
    }

    pub const fn word(&self) -> Word {
        *self as Word
    }

    /// Fixed operand count
    pub const fn arity(&self) -> usize {
        match self {
            Self::Halt | Self::Ret | Self::Nop => 0,
            Self::Push | Self::Pop | Self::Jmp | Self::Call | Self::Out | Self::In => 1,
            Self::Set | Self::Jt | Self::Jf | Self::Not | Self::Rmem | Self::Wmem => 2,
            Self::Eq
            | Self::Gt
            | Self::Add
            | Self::Mult
            | Self::Mod
            | Self::And
            | Self::Or => 3,
        }
    }

    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Self::Halt => "HALT",
            Self::Set => "SET",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::Eq => "EQ",
            Self::Gt => "GT",
            Self::Jmp => "JMP",
            Self::Jt => "JT",
            Self::Jf => "JF",
            Self::Add => "ADD",
            Self::Mult => "MULT",
            Self::Mod => "MOD",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Rmem => "RMEM",
            Self::Wmem => "WMEM",
            Self::Call => "CALL",
            Self::Ret => "RET",
            Self::Out => "OUT",
            Self::In => "IN",
            Self::Nop => "NOP",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
