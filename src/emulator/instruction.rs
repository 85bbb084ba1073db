use super::error::{EmulatorError, Result};
use crate::util::bit_splitter::BitSplitter;
use std::fmt;

/// A wrapper for addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Const(pub u8);

/// A single instruction from the CHIP-8 instruction set.
/// Two bytes written in hexadecimal, with the following special characters:
/// - NNN: address
/// - NN: 8-bit constant
/// - N: 4-bit constant
/// - X and Y: 4-bit register identifier
/// - PC: Program counter
/// - I: 16 bit register for memory address
/// - VN: One of the 16 available variables (register identifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,                    // 00E0
    Return,                         // 00EE
    Jump(Addr),                     // 1NNN
    Call(Addr),                     // 2NNN
    SkipIfEqConst(Reg, Const),      // 3XNN
    SkipIfNeqConst(Reg, Const),     // 4XNN
    SkipIfEqReg(Reg, Reg),          // 5XY0
    SetConst(Reg, Const),           // 6XNN
    AddConst(Reg, Const),           // 7XNN
    Set(Reg, Reg),                  // 8XY0
    Or(Reg, Reg),                   // 8XY1
    And(Reg, Reg),                  // 8XY2
    Xor(Reg, Reg),                  // 8XY3
    AddWithCarry(Reg, Reg),         // 8XY4
    SubWithBorrow(Reg, Reg),        // 8XY5
    ShiftRight(Reg, Reg),           // 8XY6
    SubNegatedWithBorrow(Reg, Reg), // 8XY7
    ShiftLeft(Reg, Reg),            // 8XYE
    SkipIfNeqReg(Reg, Reg),         // 9XY0
    SetIndex(Addr),                 // ANNN
    JumpWithOffset(Addr),           // BNNN
    Random(Reg, Const),             // CXNN
    Draw(Reg, Reg, Const),          // DXYN
    SkipIfKeyPressed(Reg),          // EX9E
    SkipIfKeyNotPressed(Reg),       // EXA1
    GetDelayTimer(Reg),             // FX07
    WaitForKey(Reg),                // FX0A
    SetDelayTimer(Reg),             // FX15
    SetSoundTimer(Reg),             // FX18
    AddToIndex(Reg),                // FX1E
    SetIndexToGlyph(Reg),           // FX29
    StoreBcd(Reg),                  // FX33
    StoreRegisters(Reg),            // FX55
    LoadRegisters(Reg),             // FX65
}

impl Instruction {
    /// Decode an instruction word.
    ///
    /// The top nibble picks the instruction group. Groups 0x0, 0x8, 0xE and 0xF
    /// then look at the low nibble or low byte to pick the instruction.
    /// Words that match nothing are an error, carrying the word itself.
    pub fn decode(word: u16) -> Result<Instruction> {
        let opcode = BitSplitter::from_u16(word);
        let addr = Addr(opcode.last_12_bits());
        let nn = Const(opcode.last_8_bits());

        let instruction = match opcode.as_four_u8() {
            (0x0, 0x0, 0xE, 0x0) => Instruction::ClearScreen,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Return,
            (0x1, _, _, _) => Instruction::Jump(addr),
            (0x2, _, _, _) => Instruction::Call(addr),
            (0x3, x, _, _) => Instruction::SkipIfEqConst(Reg(x), nn),
            (0x4, x, _, _) => Instruction::SkipIfNeqConst(Reg(x), nn),
            (0x5, x, y, 0x0) => Instruction::SkipIfEqReg(Reg(x), Reg(y)),
            (0x6, x, _, _) => Instruction::SetConst(Reg(x), nn),
            (0x7, x, _, _) => Instruction::AddConst(Reg(x), nn),
            (0x8, x, y, 0x0) => Instruction::Set(Reg(x), Reg(y)),
            (0x8, x, y, 0x1) => Instruction::Or(Reg(x), Reg(y)),
            (0x8, x, y, 0x2) => Instruction::And(Reg(x), Reg(y)),
            (0x8, x, y, 0x3) => Instruction::Xor(Reg(x), Reg(y)),
            (0x8, x, y, 0x4) => Instruction::AddWithCarry(Reg(x), Reg(y)),
            (0x8, x, y, 0x5) => Instruction::SubWithBorrow(Reg(x), Reg(y)),
            (0x8, x, y, 0x6) => Instruction::ShiftRight(Reg(x), Reg(y)),
            (0x8, x, y, 0x7) => Instruction::SubNegatedWithBorrow(Reg(x), Reg(y)),
            (0x8, x, y, 0xE) => Instruction::ShiftLeft(Reg(x), Reg(y)),
            (0x9, x, y, 0x0) => Instruction::SkipIfNeqReg(Reg(x), Reg(y)),
            (0xA, _, _, _) => Instruction::SetIndex(addr),
            (0xB, _, _, _) => Instruction::JumpWithOffset(addr),
            (0xC, x, _, _) => Instruction::Random(Reg(x), nn),
            (0xD, x, y, n) => Instruction::Draw(Reg(x), Reg(y), Const(n)),
            (0xE, x, 0x9, 0xE) => Instruction::SkipIfKeyPressed(Reg(x)),
            (0xE, x, 0xA, 0x1) => Instruction::SkipIfKeyNotPressed(Reg(x)),
            (0xF, x, 0x0, 0x7) => Instruction::GetDelayTimer(Reg(x)),
            (0xF, x, 0x0, 0xA) => Instruction::WaitForKey(Reg(x)),
            (0xF, x, 0x1, 0x5) => Instruction::SetDelayTimer(Reg(x)),
            (0xF, x, 0x1, 0x8) => Instruction::SetSoundTimer(Reg(x)),
            (0xF, x, 0x1, 0xE) => Instruction::AddToIndex(Reg(x)),
            (0xF, x, 0x2, 0x9) => Instruction::SetIndexToGlyph(Reg(x)),
            (0xF, x, 0x3, 0x3) => Instruction::StoreBcd(Reg(x)),
            (0xF, x, 0x5, 0x5) => Instruction::StoreRegisters(Reg(x)),
            (0xF, x, 0x6, 0x5) => Instruction::LoadRegisters(Reg(x)),
            _ => return Err(EmulatorError::UnknownInstruction { word }),
        };

        Ok(instruction)
    }

    /// The instruction word this instruction decodes from.
    pub fn encode(&self) -> u16 {
        fn xy(prefix: u16, Reg(x): Reg, Reg(y): Reg, suffix: u16) -> u16 {
            prefix << 12 | (x as u16 & 0xF) << 8 | (y as u16 & 0xF) << 4 | suffix
        }
        fn xnn(prefix: u16, Reg(x): Reg, Const(nn): Const) -> u16 {
            prefix << 12 | (x as u16 & 0xF) << 8 | nn as u16
        }
        fn fx(Reg(x): Reg, low_byte: u16) -> u16 {
            0xF000 | (x as u16 & 0xF) << 8 | low_byte
        }
        fn ex(Reg(x): Reg, low_byte: u16) -> u16 {
            0xE000 | (x as u16 & 0xF) << 8 | low_byte
        }

        match *self {
            Instruction::ClearScreen => 0x00E0,
            Instruction::Return => 0x00EE,
            Instruction::Jump(Addr(addr)) => 0x1000 | addr & 0x0FFF,
            Instruction::Call(Addr(addr)) => 0x2000 | addr & 0x0FFF,
            Instruction::SkipIfEqConst(x, nn) => xnn(0x3, x, nn),
            Instruction::SkipIfNeqConst(x, nn) => xnn(0x4, x, nn),
            Instruction::SkipIfEqReg(x, y) => xy(0x5, x, y, 0x0),
            Instruction::SetConst(x, nn) => xnn(0x6, x, nn),
            Instruction::AddConst(x, nn) => xnn(0x7, x, nn),
            Instruction::Set(x, y) => xy(0x8, x, y, 0x0),
            Instruction::Or(x, y) => xy(0x8, x, y, 0x1),
            Instruction::And(x, y) => xy(0x8, x, y, 0x2),
            Instruction::Xor(x, y) => xy(0x8, x, y, 0x3),
            Instruction::AddWithCarry(x, y) => xy(0x8, x, y, 0x4),
            Instruction::SubWithBorrow(x, y) => xy(0x8, x, y, 0x5),
            Instruction::ShiftRight(x, y) => xy(0x8, x, y, 0x6),
            Instruction::SubNegatedWithBorrow(x, y) => xy(0x8, x, y, 0x7),
            Instruction::ShiftLeft(x, y) => xy(0x8, x, y, 0xE),
            Instruction::SkipIfNeqReg(x, y) => xy(0x9, x, y, 0x0),
            Instruction::SetIndex(Addr(addr)) => 0xA000 | addr & 0x0FFF,
            Instruction::JumpWithOffset(Addr(addr)) => 0xB000 | addr & 0x0FFF,
            Instruction::Random(x, nn) => xnn(0xC, x, nn),
            Instruction::Draw(x, y, Const(n)) => xy(0xD, x, y, n as u16 & 0xF),
            Instruction::SkipIfKeyPressed(x) => ex(x, 0x9E),
            Instruction::SkipIfKeyNotPressed(x) => ex(x, 0xA1),
            Instruction::GetDelayTimer(x) => fx(x, 0x07),
            Instruction::WaitForKey(x) => fx(x, 0x0A),
            Instruction::SetDelayTimer(x) => fx(x, 0x15),
            Instruction::SetSoundTimer(x) => fx(x, 0x18),
            Instruction::AddToIndex(x) => fx(x, 0x1E),
            Instruction::SetIndexToGlyph(x) => fx(x, 0x29),
            Instruction::StoreBcd(x) => fx(x, 0x33),
            Instruction::StoreRegisters(x) => fx(x, 0x55),
            Instruction::LoadRegisters(x) => fx(x, 0x65),
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.0)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Disassembly, in the usual mnemonic style.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::ClearScreen => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump(addr) => write!(f, "JP {}", addr),
            Instruction::Call(addr) => write!(f, "CALL {}", addr),
            Instruction::SkipIfEqConst(x, nn) => write!(f, "SE {}, {}", x, nn),
            Instruction::SkipIfNeqConst(x, nn) => write!(f, "SNE {}, {}", x, nn),
            Instruction::SkipIfEqReg(x, y) => write!(f, "SE {}, {}", x, y),
            Instruction::SetConst(x, nn) => write!(f, "LD {}, {}", x, nn),
            Instruction::AddConst(x, nn) => write!(f, "ADD {}, {}", x, nn),
            Instruction::Set(x, y) => write!(f, "LD {}, {}", x, y),
            Instruction::Or(x, y) => write!(f, "OR {}, {}", x, y),
            Instruction::And(x, y) => write!(f, "AND {}, {}", x, y),
            Instruction::Xor(x, y) => write!(f, "XOR {}, {}", x, y),
            Instruction::AddWithCarry(x, y) => write!(f, "ADD {}, {}", x, y),
            Instruction::SubWithBorrow(x, y) => write!(f, "SUB {}, {}", x, y),
            Instruction::ShiftRight(x, _) => write!(f, "SHR {}", x),
            Instruction::SubNegatedWithBorrow(x, y) => write!(f, "SUBN {}, {}", x, y),
            Instruction::ShiftLeft(x, _) => write!(f, "SHL {}", x),
            Instruction::SkipIfNeqReg(x, y) => write!(f, "SNE {}, {}", x, y),
            Instruction::SetIndex(addr) => write!(f, "LD I, {}", addr),
            Instruction::JumpWithOffset(addr) => write!(f, "JP V0, {}", addr),
            Instruction::Random(x, nn) => write!(f, "RND {}, {}", x, nn),
            Instruction::Draw(x, y, Const(n)) => write!(f, "DRW {}, {}, {}", x, y, n),
            Instruction::SkipIfKeyPressed(x) => write!(f, "SKP {}", x),
            Instruction::SkipIfKeyNotPressed(x) => write!(f, "SKNP {}", x),
            Instruction::GetDelayTimer(x) => write!(f, "LD {}, DT", x),
            Instruction::WaitForKey(x) => write!(f, "LD {}, K", x),
            Instruction::SetDelayTimer(x) => write!(f, "LD DT, {}", x),
            Instruction::SetSoundTimer(x) => write!(f, "LD ST, {}", x),
            Instruction::AddToIndex(x) => write!(f, "ADD I, {}", x),
            Instruction::SetIndexToGlyph(x) => write!(f, "LD F, {}", x),
            Instruction::StoreBcd(x) => write!(f, "LD B, {}", x),
            Instruction::StoreRegisters(x) => write!(f, "LD [I], {}", x),
            Instruction::LoadRegisters(x) => write!(f, "LD {}, [I]", x),
        }
    }
}
