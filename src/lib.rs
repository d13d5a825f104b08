// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements the Chip-8 virtual machine as a self-contained core:
//! memory, registers, timers, stack and framebuffer, driven one instruction at a time.
//!
//! The host owns the clock. Call [Machine::step] at whatever instruction rate you like,
//! and [Machine::tick_timers] at 60Hz. Rendering, input and audio are read and written
//! through the accessors on [Machine].

pub mod error;
pub mod machine;

pub use error::{Error, Result};
pub use machine::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Mem, Region},
    quirks::Quirks,
    screen::Screen,
    Machine,
};

/// Common imports for chipvm
pub mod prelude {
    pub use super::*;
    pub use crate::machine::mem::Region::*;
}
