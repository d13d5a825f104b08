// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's framebuffer

use crate::error::{Error, Result};
use std::fmt::{Display, Formatter};

/// Width of the framebuffer, in pixels
pub const WIDTH: usize = 64;
/// Height of the framebuffer, in pixels
pub const HEIGHT: usize = 32;

/// A 64x32 monochrome framebuffer, one byte (0 or 1) per pixel, row-major
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<u8>", into = "Vec<u8>"))]
pub struct Screen {
    pixels: Vec<u8>,
}

impl TryFrom<Vec<u8>> for Screen {
    type Error = Error;

    /// Adopts a row-major framebuffer of exactly [WIDTH] * [HEIGHT] pixels.
    /// Any nonzero pixel is lit.
    fn try_from(mut pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != WIDTH * HEIGHT {
            return Err(Error::InvalidLength {
                what: "screen",
                len: pixels.len(),
                expected: WIDTH * HEIGHT,
            });
        }
        pixels.iter_mut().for_each(|p| *p = (*p != 0).into());
        Ok(Screen { pixels })
    }
}

impl From<Screen> for Vec<u8> {
    fn from(screen: Screen) -> Self {
        screen.pixels
    }
}

impl Default for Screen {
    fn default() -> Self {
        Screen {
            pixels: vec![0; WIDTH * HEIGHT],
        }
    }
}

impl Screen {
    /// Clears every pixel to 0
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Gets the pixel at (x, y), or None if it's off-screen
    /// # Examples
    /// ```rust
    /// # use chipvm::Screen;
    /// let screen = Screen::default();
    /// assert_eq!(Some(0), screen.pixel(63, 31));
    /// assert_eq!(None, screen.pixel(64, 0));
    /// ```
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x < WIDTH && y < HEIGHT {
            Some(self.pixels[y * WIDTH + x])
        } else {
            None
        }
    }

    /// XORs one pixel on, returning true if it was already lit (a collision).
    ///
    /// Coordinates must already be on-screen.
    #[inline(always)]
    pub(super) fn flip(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.pixels[y * WIDTH + x];
        *pixel ^= 1;
        *pixel == 0
    }

    /// Gets the raw pixels, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Iterates over the rows of the screen, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks_exact(WIDTH)
    }

    /// Returns true if no pixel is lit
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p == 0)
    }
}

impl Display for Screen {
    /// Prints the screen at 1bpp using box characters
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, row) in self.rows().enumerate() {
            write!(f, "{index:02}|")?;
            for &pixel in row {
                write!(f, "{}", if pixel != 0 { '█' } else { ' ' })?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
