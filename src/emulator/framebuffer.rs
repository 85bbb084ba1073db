//! The monochrome 64x32 screen, independent of how it ends up being shown.

use std::fmt;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// One bit per pixel. Each row is a `u64` where the most significant bit
/// is column 0, so a sprite byte can be shifted into place in one go.
///
/// The framebuffer is `Copy`, which is what makes it usable as a snapshot:
/// handing a frame to another thread is a plain 256 byte copy.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Framebuffer {
    rows: [u64; SCREEN_HEIGHT],
}

impl Framebuffer {
    pub fn new() -> Framebuffer {
        Framebuffer::default()
    }

    pub fn clear(&mut self) {
        self.rows = [0; SCREEN_HEIGHT];
    }

    /// XOR `sprite` onto the screen with its top left corner at `(x, y)`.
    ///
    /// The starting coordinates wrap around the screen, but the sprite itself
    /// is clipped: bits past the right edge and rows past the bottom edge
    /// are dropped. Returns whether any lit pixel was turned off.
    pub fn draw(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let x = x as usize % SCREEN_WIDTH;
        let y = y as usize % SCREEN_HEIGHT;

        let mut collision = false;
        for (row, &byte) in self.rows[y..].iter_mut().zip(sprite) {
            // Bits shifted past column 63 fall off the end.
            let bits = ((byte as u64) << (SCREEN_WIDTH - 8)) >> x;
            collision |= *row & bits != 0;
            *row ^= bits;
        }
        collision
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < SCREEN_WIDTH && y < SCREEN_HEIGHT && self.rows[y] >> (SCREEN_WIDTH - 1 - x) & 1 == 1
    }

    /// Iterate over the rows, each yielding the pixels left to right.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = bool>> + '_ {
        self.rows
            .iter()
            .map(|&row| (0..SCREEN_WIDTH).map(move |x| row >> (SCREEN_WIDTH - 1 - x) & 1 == 1))
    }

    pub fn lit_pixels(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }
}

impl fmt::Display for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for lit in row {
                write!(f, "{}", if lit { "#" } else { " " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Framebuffer")?;
        fmt::Display::fmt(self, f)
    }
}
