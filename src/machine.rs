// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod quirks;
pub mod screen;

use self::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Mem, Region::*},
    quirks::Quirks,
    screen::Screen,
};
use crate::error::{Error, Result};
use owo_colors::OwoColorize;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Maximum subroutine nesting depth
pub const STACK_DEPTH: usize = 16;
/// Address programs are loaded at, and where execution begins
pub const PROGRAM_START: Adr = 0x200;
/// Address of the built-in font
pub const FONT_ADDR: Adr = 0x000;

/// Represents the entire state of a Chip-8 machine
///
/// `R` is the random number source used by `Cxbb`. It's injected at construction,
/// so two machines built from the same seed behave identically.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(serialize = "", deserialize = "R: SeedableRng"))
)]
pub struct Machine<R = StdRng> {
    /// Flags that control how the machine behaves, but which aren't inherent to the
    /// chip-8. Includes [Quirks], debug mode, and the keypause state.
    pub flags: Flags,
    // memory
    mem: Mem,
    screen: Screen,
    stack: [Adr; STACK_DEPTH],
    #[cfg_attr(feature = "serde", serde(deserialize_with = "stack_pointer"))]
    sp: usize,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: [bool; 16],
    // Execution data
    cycle: usize,
    breakpoints: Vec<Adr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    disassembler: Dis,
    #[cfg_attr(feature = "serde", serde(skip, default = "R::from_entropy"))]
    rng: R,
}

/// Deserializes a stack pointer, rejecting one deeper than the stack
#[cfg(feature = "serde")]
fn stack_pointer<'de, D>(de: D) -> std::result::Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::{de::Error as _, Deserialize};
    let sp = usize::deserialize(de)?;
    if sp > STACK_DEPTH {
        return Err(D::Error::custom(format_args!(
            "stack pointer {sp} is deeper than the stack ({STACK_DEPTH})"
        )));
    }
    Ok(sp)
}

impl Machine<StdRng> {
    /// Constructs a new machine whose random number source is seeded with `seed`
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let vm = Machine::seeded(0xc0ffee);
    /// assert_eq!(0x200, vm.pc());
    /// ```
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Machine<StdRng> {
    /// Constructs a new machine, seeding the random number source from the OS
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

// public interface
impl<R: RngCore> Machine<R> {
    /// Constructs a new, freshly [reset](Machine::reset) machine around a random number source
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// use rand::rngs::mock::StepRng;
    /// let vm = Machine::with_rng(StepRng::new(0, 1));
    /// assert_eq!(0, vm.i());
    /// ```
    pub fn with_rng(rng: R) -> Self {
        Machine {
            flags: Flags::default(),
            mem: Mem::new(),
            screen: Screen::default(),
            stack: [0; STACK_DEPTH],
            sp: 0,
            pc: PROGRAM_START,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: [false; 16],
            cycle: 0,
            breakpoints: vec![],
            disassembler: Dis::default(),
            rng,
        }
    }

    /// Sets the [Quirks], consuming and returning the machine
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let vm = Machine::seeded(0).with_quirks(Quirks::from(true));
    /// assert!(vm.flags.quirks.shift_source_vy);
    /// ```
    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.flags.quirks = quirks;
        self
    }

    /// Resets the machine.
    ///
    /// Zeroes the registers, stack, timers, keys, framebuffer and memory,
    /// reloads the font, and points the program counter at 0x200.
    ///
    /// Does not touch [Quirks], debug mode, breakpoints, or the random number source.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut vm = Machine::seeded(0);
    /// vm.load_program(&[0x60, 0x2a]).unwrap();
    /// vm.step().unwrap();
    /// assert_eq!(0x2a, vm.v()[0]);
    /// vm.reset();
    /// assert_eq!(0, vm.v()[0]);
    /// assert_eq!(0x200, vm.pc());
    /// ```
    pub fn reset(&mut self) {
        self.flags.keypause = false;
        self.mem.reset();
        self.screen.clear();
        // clear the stack
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        // Reset the program counter
        self.pc = PROGRAM_START;
        // Zero the registers
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        // I/O
        self.keys = [false; 16];
        // Execution data
        self.cycle = 0;
    }

    /// Loads a program from a file into the machine's program space
    pub fn load_program_file(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        self.load_program(&std::fs::read(rom)?)
    }

    /// Loads bytes into the machine's program space, starting at 0x200.
    ///
    /// Returns [Error::ProgramTooLarge] if the program is more than 0xe00 bytes long.
    /// Doesn't reset the program counter or registers; call [Machine::reset] first.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut vm = Machine::seeded(0);
    /// assert!(vm.load_program(&[0; 0xe00]).is_ok());
    /// assert!(vm.load_program(&[0; 0xe01]).is_err());
    /// ```
    pub fn load_program(&mut self, rom: &[u8]) -> Result<&mut Self> {
        self.mem.load_region(Program, rom)?;
        Ok(self)
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut vm = Machine::seeded(0);
    ///
    /// // press key `7`
    /// let did_press = vm.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = vm.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        self.set_key(key, true)
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut vm = Machine::seeded(0);
    /// // press key `7`
    /// vm.press(0x7).unwrap();
    /// // release key `7`
    /// let changed = vm.release(0x7).unwrap();
    /// assert!(changed); // key released
    /// // try releasing `7` again
    /// let changed = vm.release(0x7).unwrap();
    /// assert!(!changed); // key was not held
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        self.set_key(key, false)
    }

    /// Sets the state of a key, and reports whether the key's state changed.
    pub fn set_key(&mut self, key: usize, pressed: bool) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        let changed = *keyref != pressed;
        *keyref = pressed;
        Ok(changed)
    }

    /// Gets the state of the whole keypad
    pub fn keys(&self) -> &[bool; 16] {
        &self.keys
    }

    /// Sets a general purpose register.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut vm = Machine::seeded(0);
    /// vm.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, vm.v()[4]);
    /// assert!(vm.set_v(0x10, 0x41).is_err());
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        if let Some(gpr) = self.v.get_mut(reg) {
            *gpr = value;
            Ok(())
        } else {
            Err(Error::InvalidRegister { reg })
        }
    }

    /// Gets a slice of the entire general purpose registers
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the stack pointer (the number of return addresses on the stack)
    pub fn sp(&self) -> usize {
        self.sp
    }

    /// Gets the live portion of the stack, oldest return address first
    pub fn stack(&self) -> &[Adr] {
        &self.stack[..self.sp]
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Returns true while the sound timer is running
    pub fn is_beeping(&self) -> bool {
        self.sound > 0
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the number of instructions the machine has fetched since reset
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Gets the framebuffer
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Gets the machine's memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Returns true if the machine is parked on an `Fx0a`, waiting for a key
    pub fn is_waiting_for_key(&self) -> bool {
        self.flags.keypause
    }

    /// Set a breakpoint
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut vm = Machine::seeded(0);
    /// vm.set_break(0x202).set_break(0x202);
    /// assert_eq!(vm.breakpoints(), &[0x202]);
    /// ```
    pub fn set_break(&mut self, point: Adr) -> &mut Self {
        if !self.breakpoints.contains(&point) {
            self.breakpoints.push(point)
        }
        self
    }

    /// Unset a breakpoint
    pub fn unset_break(&mut self, point: Adr) -> &mut Self {
        if let Some(idx) = self.breakpoints.iter().position(|&bp| bp == point) {
            self.breakpoints.swap_remove(idx);
        }
        self
    }

    /// Gets a slice of breakpoints
    pub fn breakpoints(&self) -> &[Adr] {
        self.breakpoints.as_slice()
    }

    /// Decrements the delay and sound timers, stopping at zero.
    ///
    /// Call this at 60Hz, independent of the instruction rate.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut vm = Machine::seeded(0);
    /// vm.load_program(&[0x60, 0x02, 0xf0, 0x18]).unwrap();
    /// vm.multistep(2).unwrap(); // v0 = 2; ST = v0; tick
    /// assert_eq!(1, vm.sound());
    /// vm.tick_timers();
    /// vm.tick_timers();
    /// assert_eq!(0, vm.sound());
    /// ```
    pub fn tick_timers(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Runs one frame: up to `steps` instructions, then one [Machine::tick_timers]
    ///
    /// Stops at, and returns, the first error. The timers are not ticked in that case.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut vm = Machine::seeded(0);
    /// vm.load_program(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// vm.multistep(0x20)
    ///     .expect("The program should only have valid opcodes.");
    /// assert_eq!(0x202, vm.pc());
    /// assert_eq!(0x20, vm.cycle());
    /// ```
    pub fn multistep(&mut self, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            self.step()?;
        }
        self.tick_timers();
        Ok(self)
    }

    /// Executes a single instruction
    ///
    /// Returns [Error::InvalidAddress] if the program counter has run off the end of memory.
    ///
    /// Returns [Error::UnknownOpcode] if the word at `pc` isn't a Chip-8 instruction.
    /// The program counter still advances past it, so execution may continue.
    ///
    /// Returns [Error::StackOverflow] or [Error::StackUnderflow] on unbalanced calls.
    ///
    /// Returns [Error::BreakpointHit] if a breakpoint was hit after the instruction executed.
    /// This result contains information about the breakpoint, but can be safely ignored.
    ///
    /// While parked on an `Fx0a` with no key held, a step changes no registers,
    /// memory or pixels. It still counts as a [cycle](Machine::cycle), and it sets
    /// [Flags::keypause] until a key is pressed.
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut vm = Machine::seeded(0);
    /// vm.load_program(&[
    ///     0x00, 0xe0, // cls
    ///     0x22, 0x02, // call 0x202
    /// ]).unwrap();
    /// vm.step()
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, vm.pc());
    /// assert_eq!(1, vm.cycle());
    /// ```
    /// Returns [Error::UnknownOpcode] if the instruction is not recognized.
    /// ```rust
    /// # use chipvm::*;
    /// let mut vm = Machine::seeded(0);
    /// vm.load_program(&[
    ///     0xff, 0xff, // invalid!
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// dbg!(vm.step())
    ///     .expect_err("Should return Error::UnknownOpcode { 0xffff }");
    /// assert_eq!(0x202, vm.pc());
    /// ```
    pub fn step(&mut self) -> Result<&mut Self> {
        let addr = self.pc;
        // fetch opcode
        let word = self.mem.fetch(addr)?;
        self.cycle += 1;

        // Print opcode disassembly:
        if self.flags.debug {
            std::println!(
                "{:3} {:03x}: {:<36}",
                self.cycle.bright_black(),
                addr,
                self.disassembler.once(word)
            );
        }

        // decode opcode
        self.pc = addr.wrapping_add(2);
        match Insn::from_word(word) {
            Some(insn) => self.execute(insn)?,
            None => return Err(Error::UnknownOpcode { word, addr }),
        }

        // process breakpoints
        if self.pc != addr && self.breakpoints.contains(&self.pc) {
            return Err(Error::BreakpointHit {
                addr: self.pc,
                next: self.mem.fetch(self.pc).unwrap_or_default(),
            });
        }
        Ok(self)
    }

    /// Dumps the current state of all registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use chipvm::*;
    /// let mut vm = Machine::seeded(0);
    /// vm.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 00, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:02x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.sp,
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
        );
    }
}

impl<R> Debug for Machine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("flags", &self.flags)
            .field("stack", &&self.stack[..self.sp])
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("cycle", &self.cycle)
            .field("breakpoints", &self.breakpoints)
            .finish_non_exhaustive()
    }
}
