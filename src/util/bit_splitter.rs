/// A structure for splitting an instruction word into the fields
/// the CHIP-8 encoding uses: four nibbles, the low byte and the low 12 bits.
///
/// Every field is extracted with explicit shifts and masks over the `u16`,
/// so the result does not depend on byte order or struct packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSplitter(u16);

impl BitSplitter {
    pub const fn from_u16(value: u16) -> BitSplitter {
        BitSplitter(value)
    }

    /// Combine two bytes read from memory, most significant first.
    pub const fn from_two_u8(high: u8, low: u8) -> BitSplitter {
        BitSplitter((high as u16) << 8 | low as u16)
    }

    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// The nibble at `index`, where index 0 is the most significant.
    pub const fn nibble(self, index: u32) -> u8 {
        ((self.0 >> (12 - 4 * index)) & 0x000F) as u8
    }

    pub const fn as_four_u8(self) -> (u8, u8, u8, u8) {
        (self.nibble(0), self.nibble(1), self.nibble(2), self.nibble(3))
    }

    pub const fn last_8_bits(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub const fn last_12_bits(self) -> u16 {
        self.0 & 0x0FFF
    }
}
