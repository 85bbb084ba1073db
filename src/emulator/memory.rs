//! The 4 KiB address space, with the hex digit font in low memory.

use super::error::{EmulatorError, Result};
use crate::util::bit_splitter::BitSplitter;

pub const MEM_SIZE: usize = 4096;

/// Where programs are loaded, and where execution starts.
pub const PROGRAM_START: u16 = 0x200;

/// Where the glyph for digit 0 starts. Each glyph is `GLYPH_SIZE` bytes.
pub const FONT_START: u16 = 0x000;
pub const GLYPH_SIZE: u16 = 5;

const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Flat, bounds-checked memory.
pub struct Memory {
    bytes: [u8; MEM_SIZE],
}

impl Memory {
    /// Create memory with the font loaded and everything else zeroed.
    pub fn new() -> Memory {
        let mut bytes = [0; MEM_SIZE];
        let font_start = FONT_START as usize;
        bytes[font_start..font_start + FONT.len()].copy_from_slice(&FONT);
        Memory { bytes }
    }

    /// The address of the glyph for the low nibble of `digit`.
    pub fn glyph_address(digit: u8) -> u16 {
        FONT_START + GLYPH_SIZE * (digit & 0x0F) as u16
    }

    pub fn read(&self, addr: usize) -> Result<u8> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(EmulatorError::OutOfBounds { addr })
    }

    pub fn write(&mut self, addr: usize, value: u8) -> Result<()> {
        let byte = self
            .bytes
            .get_mut(addr)
            .ok_or(EmulatorError::OutOfBounds { addr })?;
        *byte = value;
        Ok(())
    }

    /// `len` bytes starting at `offset`. Fails with the first address
    /// that falls outside memory.
    pub fn read_block(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let end = offset + len;
        if end > MEM_SIZE {
            return Err(EmulatorError::OutOfBounds {
                addr: offset.max(MEM_SIZE),
            });
        }
        Ok(&self.bytes[offset..end])
    }

    /// Copy `data` into memory starting at `offset`. Nothing is written
    /// unless all of it fits.
    pub fn write_block(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let end = offset + data.len();
        if end > MEM_SIZE {
            return Err(EmulatorError::LoadTooLarge {
                offset,
                len: data.len(),
            });
        }
        self.bytes[offset..end].copy_from_slice(data);
        Ok(())
    }

    /// Read the big-endian instruction word at `pc`,
    /// returning it along with the address of the next one.
    pub fn fetch_instruction_word(&self, pc: u16) -> Result<(u16, u16)> {
        let addr = pc as usize;
        let high = self.read(addr)?;
        let low = self.read(addr + 1)?;
        Ok((BitSplitter::from_two_u8(high, low).as_u16(), pc.wrapping_add(2)))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
