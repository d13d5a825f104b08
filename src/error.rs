// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for chipvm

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chipvm.
#[derive(Debug, Error)]
pub enum Error {
    /// Represents a breakpoint being hit
    #[error("breakpoint hit: {addr:03x} ({next:04x})")]
    BreakpointHit {
        /// The address of the breakpoint
        addr: u16,
        /// The instruction after the breakpoint
        next: u16,
    },
    /// Represents an opcode outside the Chip-8 instruction set
    #[error("opcode {word:04x} at {addr:03x} not recognized")]
    UnknownOpcode {
        /// The offending word
        word: u16,
        /// The address it was fetched from
        addr: u16,
    },
    /// Tried to load a program that doesn't fit in program memory
    #[error("program is {len} bytes, but only {max} bytes of program memory exist")]
    ProgramTooLarge {
        /// Length of the rejected program
        len: usize,
        /// Size of program memory
        max: usize,
    },
    /// Tried to fetch an instruction from outside of memory
    #[error("instruction fetch at {addr:04x} is outside of memory")]
    InvalidAddress {
        /// The program counter at the time of the fetch
        addr: u16,
    },
    /// Called a subroutine with a full stack
    #[error("stack overflow at {addr:03x}")]
    StackOverflow {
        /// Address of the offending call
        addr: u16,
    },
    /// Returned from a subroutine with an empty stack
    #[error("stack underflow at {addr:03x}")]
    StackUnderflow {
        /// Address of the offending return
        addr: u16,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Tried to convert string into a quirks profile, but it did not match.
    #[error("no suitable conversion of \"{name}\" into Quirks")]
    InvalidQuirks {
        /// The string which failed to become a quirks profile
        name: String,
    },
    /// Tried to build memory or a framebuffer from a buffer of the wrong size
    #[error("{what} is {len} bytes long, but must be exactly {expected}")]
    InvalidLength {
        /// What the buffer was meant to become
        what: &'static str,
        /// Length of the rejected buffer
        len: usize,
        /// The only acceptable length
        expected: usize,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Returns true if a driver should stop stepping after this error.
    ///
    /// Unknown opcodes and breakpoints leave the machine in a runnable state.
    /// # Examples
    /// ```rust
    /// # use chipvm::error::Error;
    /// assert!(!Error::UnknownOpcode { word: 0xffff, addr: 0x200 }.is_fatal());
    /// assert!(Error::StackUnderflow { addr: 0x200 }.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::UnknownOpcode { .. } | Error::BreakpointHit { .. }
        )
    }
}
