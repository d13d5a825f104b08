// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Controls the [Quirks] behavior of the machine on a granular level.

use crate::error::Error;
use std::str::FromStr;

/// Controls the quirk behavior of the machine on a granular level.
///
/// `false` is the modern interpreter behavior, `true` is Cosmac-VIP-like behavior
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quirks {
    /// Shift ops in `8xy`(`6`, `E`) source from vY instead of vX
    pub shift_source_vy: bool,
    /// Binary ops in `8xy`(`1`, `2`, `3`) set vF to 0
    pub logic_resets_vf: bool,
    /// DMA instructions `Fx55`/`Fx65` change I to I + x + 1
    pub dma_increments_i: bool,
    /// Draw operations clip at the edges instead of wrapping
    pub clip_sprites: bool,
}

impl From<bool> for Quirks {
    fn from(value: bool) -> Self {
        Quirks {
            shift_source_vy: value,
            logic_resets_vf: value,
            dma_increments_i: value,
            clip_sprites: value,
        }
    }
}

impl FromStr for Quirks {
    type Err = Error;

    /// Parses a named quirks profile
    /// # Examples
    /// ```rust
    /// # use chipvm::Quirks;
    /// let vip: Quirks = "VIP".parse().unwrap();
    /// assert_eq!(Quirks::from(true), vip);
    /// assert!("xo-chip".parse::<Quirks>().is_err());
    /// ```
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "modern" | "chip8" | "chip-8" => Ok(Quirks::from(false)),
            "vip" | "cosmac" | "cosmac-vip" => Ok(Quirks::from(true)),
            _ => Err(Error::InvalidQuirks {
                name: s.to_string(),
            }),
        }
    }
}
