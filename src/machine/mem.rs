// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the machine's 4KiB of memory
//!
//! Contains some handy utils for reading and writing

use crate::error::{Error, Result};
use std::{
    fmt::{Display, Formatter},
    ops::Range,
};

/// Size of the address space, in bytes
pub const MEM_SIZE: usize = 0x1000;
/// Mask applied to every address derived from an opcode
pub const ADDR_MASK: u16 = 0xfff;

/// The built-in hexadecimal font, one 4x5 glyph per digit `0..=F`
pub const FONT: [u8; 0x50] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Represents a named region in memory
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// Character ROM (but writable!)
    Charset,
    /// Program memory
    Program,
}

impl Region {
    /// The address range covered by this region
    pub const fn range(self) -> Range<usize> {
        match self {
            Region::Charset => 0x000..0x050,
            Region::Program => 0x200..MEM_SIZE,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Charset => "Charset",
                Region::Program => "Program",
            }
        )
    }
}

/// Stores the machine's memory, with a fixed map of named regions
///
/// Always exactly [MEM_SIZE] bytes long.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<u8>", into = "Vec<u8>"))]
pub struct Mem {
    memory: Vec<u8>,
}

impl TryFrom<Vec<u8>> for Mem {
    type Error = Error;

    /// Adopts a full memory image, rejecting anything but [MEM_SIZE] bytes
    /// # Examples
    /// ```rust
    ///# use chipvm::prelude::*;
    /// assert!(Mem::try_from(vec![0u8; 0x1000]).is_ok());
    /// assert!(Mem::try_from(vec![0u8; 0x210]).is_err());
    /// ```
    fn try_from(memory: Vec<u8>) -> Result<Self> {
        if memory.len() != MEM_SIZE {
            return Err(Error::InvalidLength {
                what: "memory",
                len: memory.len(),
                expected: MEM_SIZE,
            });
        }
        Ok(Mem { memory })
    }
}

impl From<Mem> for Vec<u8> {
    fn from(mem: Mem) -> Self {
        mem.memory
    }
}

impl Default for Mem {
    fn default() -> Self {
        Mem::new()
    }
}

impl Mem {
    /// Constructs a new mem, with the font loaded into [Region::Charset]
    /// # Examples
    /// ```rust
    ///# use chipvm::prelude::*;
    /// let mem = Mem::new();
    /// assert_eq!(0x1000, mem.len());
    /// assert_eq!(&chipvm::machine::mem::FONT, mem.get_region(Charset));
    /// ```
    pub fn new() -> Self {
        let mut mem = Mem {
            memory: vec![0; MEM_SIZE],
        };
        mem.reset();
        mem
    }

    /// Zeroes all memory, then reloads the font
    pub fn reset(&mut self) -> &mut Self {
        self.memory.fill(0);
        self.memory[Region::Charset.range()].copy_from_slice(&FONT);
        self
    }

    /// Gets the length of the backing memory. Always [MEM_SIZE].
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns true if the backing memory contains no elements
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Loads data into the start of a named [Region]
    ///
    /// Returns [Error::ProgramTooLarge] if the data doesn't fit, leaving memory untouched.
    /// # Examples
    /// ```rust
    ///# use chipvm::prelude::*;
    ///# fn main() -> Result<()> {
    ///     let mut mem = Mem::new();
    ///     mem.load_region(Program, b"Hello, world!")?;
    ///     assert_eq!(b'H', mem.read(0x200));
    ///     assert!(mem.load_region(Program, &[0; 0xe01]).is_err());
    ///#    Ok(())
    ///# }
    /// ```
    pub fn load_region(&mut self, name: Region, data: &[u8]) -> Result<&mut Self> {
        let region = self.get_region_mut(name);
        if data.len() > region.len() {
            return Err(Error::ProgramTooLarge {
                len: data.len(),
                max: region.len(),
            });
        }
        region[..data.len()].copy_from_slice(data);
        Ok(self)
    }

    /// Gets a slice of a named [Region] of memory
    #[inline(always)]
    pub fn get_region(&self, name: Region) -> &[u8] {
        &self.memory[name.range()]
    }

    /// Gets a mutable slice of a named region of memory
    #[inline(always)]
    pub fn get_region_mut(&mut self, name: Region) -> &mut [u8] {
        &mut self.memory[name.range()]
    }

    /// Reads a byte. The address is masked to 12 bits.
    #[inline(always)]
    pub fn read(&self, addr: u16) -> u8 {
        self.memory[(addr & ADDR_MASK) as usize]
    }

    /// Writes a byte. The address is masked to 12 bits.
    #[inline(always)]
    pub fn write(&mut self, addr: u16, data: u8) {
        self.memory[(addr & ADDR_MASK) as usize] = data;
    }

    /// Fetches a big-endian word without wrapping.
    ///
    /// Returns [Error::InvalidAddress] if either byte lies past the end of memory.
    /// # Examples
    /// ```rust
    ///# use chipvm::prelude::*;
    ///# fn main() -> Result<()> {
    ///     let mut mem = Mem::new();
    ///     mem.load_region(Program, &[0x12, 0x34])?;
    ///     assert_eq!(0x1234, mem.fetch(0x200)?);
    ///     assert!(mem.fetch(0xfff).is_err());
    ///#    Ok(())
    ///# }
    /// ```
    pub fn fetch(&self, addr: u16) -> Result<u16> {
        let start = addr as usize;
        match self.memory.get(start..start + 2) {
            Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
            _ => Err(Error::InvalidAddress { addr }),
        }
    }

    /// Gets the whole address space as a slice
    pub fn as_slice(&self) -> &[u8] {
        &self.memory
    }
}
