//! The CHIP-8 emulator as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use super::error::Result;
use super::framebuffer::Framebuffer;
use super::input::{DummyInput, EmulatorInput};
use super::instruction::*;
use super::memory::{Memory, PROGRAM_START};
use super::output::{DummyOutput, EmulatorOutput};
use super::stack::Stack;
use super::timer::Timers;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const NUM_REGISTERS: usize = 16;
const FLAG: usize = 0xF;

/// The registers owned by the execution thread.
/// The timers live in `Timers`, since the timer clock writes them too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    /// V0 to VF. VF doubles as the flag register.
    pub v: [u8; NUM_REGISTERS],
    pub i: u16,
    pub program_counter: u16,
}

impl Default for Registers {
    fn default() -> Self {
        Registers {
            v: [0; NUM_REGISTERS],
            i: 0,
            program_counter: PROGRAM_START,
        }
    }
}

pub struct Emulator<I: EmulatorInput, O: EmulatorOutput> {
    registers: Registers,
    memory: Memory,
    stack: Stack,
    framebuffer: Framebuffer,
    timers: Arc<Timers>,
    rng: StdRng,

    input: I,
    output: O,
}

impl Emulator<DummyInput, DummyOutput> {
    /// Create a new emulator with dummy input and output
    pub fn new() -> Self {
        Emulator::with_io(DummyInput, DummyOutput::new())
    }
}

impl Default for Emulator<DummyInput, DummyOutput> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: EmulatorInput, O: EmulatorOutput> Emulator<I, O> {
    /// Create a new emulator with input and output
    pub fn with_io(input: I, output: O) -> Emulator<I, O> {
        Emulator {
            registers: Registers::default(),
            memory: Memory::new(),
            stack: Stack::new(),
            framebuffer: Framebuffer::new(),
            timers: Arc::new(Timers::new()),
            rng: StdRng::from_entropy(),

            input,
            output,
        }
    }

    /// Use a fixed seed for the random number instruction.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Copy a program into memory at 0x200, and start execution there.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        self.memory.write_block(PROGRAM_START as usize, program)?;
        self.registers.program_counter = PROGRAM_START;
        log::info!("Loaded {} byte program", program.len());
        Ok(())
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// The timer registers, for handing to a `TimerClock`.
    pub fn timers(&self) -> Arc<Timers> {
        self.timers.clone()
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Execute instructions until one of them fails, sleeping `cycle_period`
    /// between each. Only returns with the error that stopped it.
    pub fn run(&mut self, cycle_period: Duration) -> Result<()> {
        loop {
            self.step()?;
            if !cycle_period.is_zero() {
                thread::sleep(cycle_period);
            }
        }
    }

    /// Fetch the instruction at the program counter, move the program
    /// counter past it, then execute it.
    pub fn step(&mut self) -> Result<()> {
        let pc = self.registers.program_counter;
        let (word, next) = self.memory.fetch_instruction_word(pc)?;
        self.registers.program_counter = next;

        let instruction = Instruction::decode(word).map_err(|error| {
            log::error!("Unknown instruction {:#06x} at {:#05x}", word, pc);
            error
        })?;
        log::trace!("{:#05x}: {:04x}  {}", pc, word, instruction);

        self.execute_single(instruction)
    }

    /// Execute several instructions in order, stopping at the first failure.
    pub fn execute_many(&mut self, instructions: &[Instruction]) -> Result<()> {
        instructions
            .iter()
            .try_for_each(|&instruction| self.execute_single(instruction))
    }

    /// Execute a single instruction
    pub fn execute_single(&mut self, instruction: Instruction) -> Result<()> {
        let v = &mut self.registers.v;

        match instruction {
            Instruction::ClearScreen => {
                self.framebuffer.clear();
                self.output.present(&self.framebuffer);
            }

            Instruction::Return => {
                self.registers.program_counter = self.stack.pop()?;
                log::debug!(
                    "Return to {:#05x}, depth {}",
                    self.registers.program_counter,
                    self.stack.depth()
                );
            }

            Instruction::Jump(Addr(addr)) => {
                self.registers.program_counter = addr;
            }

            // The program counter already points past the call, which is where to return.
            Instruction::Call(Addr(addr)) => {
                self.stack.push(self.registers.program_counter)?;
                self.registers.program_counter = addr;
                log::debug!("Call {:#05x}, depth {}", addr, self.stack.depth());
            }

            Instruction::SkipIfEqConst(Reg(x), Const(n)) => {
                let condition = v[x as usize] == n;
                self.skip_if(condition);
            }

            Instruction::SkipIfNeqConst(Reg(x), Const(n)) => {
                let condition = v[x as usize] != n;
                self.skip_if(condition);
            }

            Instruction::SkipIfEqReg(Reg(x), Reg(y)) => {
                let condition = v[x as usize] == v[y as usize];
                self.skip_if(condition);
            }

            Instruction::SkipIfNeqReg(Reg(x), Reg(y)) => {
                let condition = v[x as usize] != v[y as usize];
                self.skip_if(condition);
            }

            Instruction::SetConst(Reg(x), Const(n)) => {
                v[x as usize] = n;
            }

            // No carry flag for this one.
            Instruction::AddConst(Reg(x), Const(n)) => {
                v[x as usize] = v[x as usize].wrapping_add(n);
            }

            Instruction::Set(Reg(x), Reg(y)) => {
                v[x as usize] = v[y as usize];
            }

            Instruction::Or(Reg(x), Reg(y)) => {
                v[x as usize] |= v[y as usize];
            }

            Instruction::And(Reg(x), Reg(y)) => {
                v[x as usize] &= v[y as usize];
            }

            Instruction::Xor(Reg(x), Reg(y)) => {
                v[x as usize] ^= v[y as usize];
            }

            // Flags below are computed from the operands before anything is
            // written, and VF is written before the destination, so VF as a
            // destination ends up holding the result.
            Instruction::AddWithCarry(Reg(x), Reg(y)) => {
                let (sum, carry) = v[x as usize].overflowing_add(v[y as usize]);
                v[FLAG] = carry as u8;
                v[x as usize] = sum;
            }

            Instruction::SubWithBorrow(Reg(x), Reg(y)) => {
                let (vx, vy) = (v[x as usize], v[y as usize]);
                v[FLAG] = (vx >= vy) as u8;
                v[x as usize] = vx.wrapping_sub(vy);
            }

            Instruction::SubNegatedWithBorrow(Reg(x), Reg(y)) => {
                let (vx, vy) = (v[x as usize], v[y as usize]);
                v[FLAG] = (vy >= vx) as u8;
                v[x as usize] = vy.wrapping_sub(vx);
            }

            Instruction::ShiftRight(Reg(x), _) => {
                let vx = v[x as usize];
                v[FLAG] = vx & 0x01;
                v[x as usize] = vx >> 1;
            }

            Instruction::ShiftLeft(Reg(x), _) => {
                let vx = v[x as usize];
                v[FLAG] = vx >> 7;
                v[x as usize] = vx << 1;
            }

            Instruction::SetIndex(Addr(addr)) => {
                self.registers.i = addr;
            }

            Instruction::JumpWithOffset(Addr(addr)) => {
                self.registers.program_counter = addr.wrapping_add(v[0] as u16);
            }

            Instruction::Random(Reg(x), Const(mask)) => {
                v[x as usize] = self.rng.gen::<u8>() & mask;
            }

            Instruction::Draw(Reg(x), Reg(y), Const(rows)) => {
                let sprite = self.memory.read_block(self.registers.i as usize, rows as usize)?;
                let collision = self.framebuffer.draw(v[x as usize], v[y as usize], sprite);
                v[FLAG] = collision as u8;
                self.output.present(&self.framebuffer);
            }

            Instruction::SkipIfKeyPressed(Reg(x)) => {
                let pressed = self.input.is_pressed(v[x as usize] & 0x0F);
                self.skip_if(pressed);
            }

            Instruction::SkipIfKeyNotPressed(Reg(x)) => {
                let pressed = self.input.is_pressed(v[x as usize] & 0x0F);
                self.skip_if(!pressed);
            }

            Instruction::GetDelayTimer(Reg(x)) => {
                v[x as usize] = self.timers.delay();
            }

            // The only instruction that blocks. The timer clock keeps running meanwhile.
            Instruction::WaitForKey(Reg(x)) => {
                log::debug!("Waiting for a key press");
                v[x as usize] = self.input.wait_for_key() & 0x0F;
            }

            Instruction::SetDelayTimer(Reg(x)) => {
                self.timers.set_delay(v[x as usize]);
            }

            Instruction::SetSoundTimer(Reg(x)) => {
                self.timers.set_sound(v[x as usize]);
            }

            Instruction::AddToIndex(Reg(x)) => {
                self.registers.i = self.registers.i.wrapping_add(v[x as usize] as u16);
            }

            Instruction::SetIndexToGlyph(Reg(x)) => {
                self.registers.i = Memory::glyph_address(v[x as usize]);
            }

            Instruction::StoreBcd(Reg(x)) => {
                let value = v[x as usize];
                let i = self.registers.i as usize;
                self.memory.write(i, value / 100)?;
                self.memory.write(i + 1, value / 10 % 10)?;
                self.memory.write(i + 2, value % 10)?;
            }

            // Store V0 to VX, inclusive, starting at I. I itself is left alone.
            Instruction::StoreRegisters(Reg(x)) => {
                let i = self.registers.i as usize;
                for reg_no in 0..=x as usize {
                    self.memory.write(i + reg_no, v[reg_no])?;
                }
            }

            Instruction::LoadRegisters(Reg(x)) => {
                let i = self.registers.i as usize;
                for reg_no in 0..=x as usize {
                    v[reg_no] = self.memory.read(i + reg_no)?;
                }
            }
        };

        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.registers.program_counter = self.registers.program_counter.wrapping_add(2);
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::emulator::error::EmulatorError;
    use crate::emulator::input::Keypad;
    use test_case::test_case;

    fn load_words(words: &[u16]) -> Emulator<DummyInput, DummyOutput> {
        let program: Vec<u8> = words.iter().flat_map(|word| word.to_be_bytes().to_vec()).collect();
        let mut emulator = Emulator::new().with_seed(8);
        emulator.load(&program).unwrap();
        emulator
    }

    fn alu(instruction: fn(Reg, Reg) -> Instruction, vx: u8, vy: u8) -> (u8, u8) {
        let mut emulator = Emulator::new();
        emulator.registers.v[1] = vx;
        emulator.registers.v[2] = vy;
        emulator.execute_single(instruction(Reg(1), Reg(2))).unwrap();
        (emulator.registers.v[1], emulator.registers.v[FLAG])
    }

    #[test]
    fn starts_at_program_start_with_zeroed_registers() {
        let emulator = Emulator::new();
        assert_eq!(emulator.registers(), &Registers::default());
        assert_eq!(emulator.registers().program_counter, 0x200);
        assert_eq!(emulator.stack_depth(), 0);
        assert_eq!(emulator.framebuffer().lit_pixels(), 0);
    }

    #[test]
    fn load_too_large_fails() {
        let mut emulator = Emulator::new();
        let program = vec![0; 4096 - 0x200 + 1];
        assert_eq!(
            emulator.load(&program),
            Err(EmulatorError::LoadTooLarge { offset: 0x200, len: program.len() })
        );
    }

    #[test]
    fn step_advances_the_program_counter_by_two() {
        let mut emulator = load_words(&[0x6A05, 0x7A01]);
        emulator.step().unwrap();
        assert_eq!(emulator.registers().program_counter, 0x202);
        emulator.step().unwrap();
        assert_eq!(emulator.registers().program_counter, 0x204);
        assert_eq!(emulator.registers().v[0xA], 6);
    }

    #[test]
    fn unknown_instruction_is_fatal() {
        let mut emulator = load_words(&[0xFFFF]);
        assert_eq!(
            emulator.step(),
            Err(EmulatorError::UnknownInstruction { word: 0xFFFF })
        );
    }

    #[test]
    fn fetching_past_the_end_of_memory_fails() {
        let mut emulator = Emulator::new();
        emulator.execute_single(Instruction::Jump(Addr(0xFFF))).unwrap();
        assert_eq!(emulator.step(), Err(EmulatorError::OutOfBounds { addr: 0x1000 }));
    }

    #[test]
    fn goto_goes_to() {
        let mut emulator = Emulator::new();
        emulator.execute_single(Instruction::Jump(Addr(0x250))).unwrap();
        assert_eq!(emulator.registers().program_counter, 0x250);
    }

    #[test]
    fn jump_with_offset_adds_v0() {
        let mut emulator = Emulator::new();
        emulator.registers.v[0] = 4;
        emulator.execute_single(Instruction::JumpWithOffset(Addr(0x300))).unwrap();
        assert_eq!(emulator.registers().program_counter, 0x304);
    }

    #[test]
    fn return_after_call_is_neutral() {
        let mut program = vec![0; 0x102];
        program[..2].copy_from_slice(&[0x23, 0x00]); // 0x200: call 0x300
        program[0x100..].copy_from_slice(&[0x00, 0xEE]); // 0x300: return

        let mut emulator = Emulator::new();
        emulator.load(&program).unwrap();

        emulator.step().unwrap();
        assert_eq!(emulator.registers().program_counter, 0x300);
        assert_eq!(emulator.stack_depth(), 1);

        emulator.step().unwrap();
        assert_eq!(emulator.registers().program_counter, 0x202);
        assert_eq!(emulator.stack_depth(), 0);
    }

    #[test]
    fn seventeen_nested_calls_overflow() {
        // A subroutine that calls itself forever.
        let mut emulator = load_words(&[0x2200]);
        for depth in 1..=16 {
            emulator.step().unwrap();
            assert_eq!(emulator.stack_depth(), depth);
        }
        assert_eq!(emulator.step(), Err(EmulatorError::StackOverflow));
        assert_eq!(emulator.stack_depth(), 16);
    }

    #[test]
    fn return_with_empty_stack_underflows() {
        let mut emulator = Emulator::new();
        assert_eq!(
            emulator.execute_single(Instruction::Return),
            Err(EmulatorError::StackUnderflow)
        );
    }

    #[test_case(Instruction::SkipIfEqConst(Reg(1), Const(0x42)) => 0x202 ; "eq const taken")]
    #[test_case(Instruction::SkipIfEqConst(Reg(1), Const(0x41)) => 0x200 ; "eq const not taken")]
    #[test_case(Instruction::SkipIfNeqConst(Reg(1), Const(0x41)) => 0x202 ; "neq const taken")]
    #[test_case(Instruction::SkipIfNeqConst(Reg(1), Const(0x42)) => 0x200 ; "neq const not taken")]
    #[test_case(Instruction::SkipIfEqReg(Reg(1), Reg(2)) => 0x202 ; "eq reg taken")]
    #[test_case(Instruction::SkipIfEqReg(Reg(1), Reg(3)) => 0x200 ; "eq reg not taken")]
    #[test_case(Instruction::SkipIfNeqReg(Reg(1), Reg(3)) => 0x202 ; "neq reg taken")]
    #[test_case(Instruction::SkipIfNeqReg(Reg(1), Reg(2)) => 0x200 ; "neq reg not taken")]
    fn skips(instruction: Instruction) -> u16 {
        let mut emulator = Emulator::new();
        emulator.registers.v[1] = 0x42;
        emulator.registers.v[2] = 0x42;
        emulator.registers.v[3] = 0x07;
        emulator.execute_single(instruction).unwrap();
        emulator.registers().program_counter
    }

    #[test_case(0xFF, 0x01 => (0x00, 1) ; "carry")]
    #[test_case(0x01, 0x01 => (0x02, 0) ; "no carry")]
    #[test_case(0x80, 0x80 => (0x00, 1) ; "carry to exactly zero")]
    fn add_with_carry(vx: u8, vy: u8) -> (u8, u8) {
        alu(Instruction::AddWithCarry, vx, vy)
    }

    #[test_case(0x05, 0x03 => (0x02, 1) ; "no borrow")]
    #[test_case(0x03, 0x05 => (0xFE, 0) ; "borrow")]
    #[test_case(0x03, 0x03 => (0x00, 1) ; "equal operands")]
    fn sub_with_borrow(vx: u8, vy: u8) -> (u8, u8) {
        alu(Instruction::SubWithBorrow, vx, vy)
    }

    #[test_case(0x03, 0x05 => (0x02, 1) ; "no borrow")]
    #[test_case(0x05, 0x03 => (0xFE, 0) ; "borrow")]
    fn sub_negated_with_borrow(vx: u8, vy: u8) -> (u8, u8) {
        alu(Instruction::SubNegatedWithBorrow, vx, vy)
    }

    #[test_case(0x03 => (0x01, 1) ; "low bit set")]
    #[test_case(0x02 => (0x01, 0) ; "low bit clear")]
    fn shift_right(vx: u8) -> (u8, u8) {
        alu(Instruction::ShiftRight, vx, 0xFF)
    }

    #[test_case(0x81 => (0x02, 1) ; "high bit set")]
    #[test_case(0x01 => (0x02, 0) ; "high bit clear")]
    fn shift_left(vx: u8) -> (u8, u8) {
        alu(Instruction::ShiftLeft, vx, 0xFF)
    }

    #[test]
    fn bitwise_operations() {
        assert_eq!(alu(Instruction::Or, 0b1100, 0b1010).0, 0b1110);
        assert_eq!(alu(Instruction::And, 0b1100, 0b1010).0, 0b1000);
        assert_eq!(alu(Instruction::Xor, 0b1100, 0b1010).0, 0b0110);
        assert_eq!(alu(Instruction::Set, 0b1100, 0b1010).0, 0b1010);
    }

    #[test]
    fn result_wins_when_the_flag_is_also_the_destination() {
        let mut emulator = Emulator::new();
        emulator.registers.v[FLAG] = 0xFF;
        emulator.registers.v[1] = 0x01;
        emulator
            .execute_single(Instruction::AddWithCarry(Reg(0xF), Reg(1)))
            .unwrap();
        assert_eq!(emulator.registers().v[FLAG], 0x00);

        emulator.registers.v[FLAG] = 0x03;
        emulator
            .execute_single(Instruction::ShiftRight(Reg(0xF), Reg(0)))
            .unwrap();
        assert_eq!(emulator.registers().v[FLAG], 0x01);
    }

    #[test]
    fn jump_with_offset_past_memory_fails_on_fetch() {
        let mut emulator = Emulator::new();
        emulator.registers.v[0] = 0x01;
        emulator
            .execute_single(Instruction::JumpWithOffset(Addr(0xFFFF)))
            .unwrap();
        assert_eq!(emulator.registers().program_counter, 0x0000);

        emulator.registers.v[0] = 0x10;
        emulator
            .execute_single(Instruction::JumpWithOffset(Addr(0xFFF)))
            .unwrap();
        assert_eq!(
            emulator.step(),
            Err(EmulatorError::OutOfBounds { addr: 0x100F })
        );
    }

    #[test]
    fn add_const_wraps_without_touching_the_flag() {
        let mut emulator = Emulator::new();
        emulator.registers.v[FLAG] = 0x42;
        emulator.registers.v[1] = 0xFF;
        emulator.execute_single(Instruction::AddConst(Reg(1), Const(2))).unwrap();
        assert_eq!(emulator.registers().v[1], 0x01);
        assert_eq!(emulator.registers().v[FLAG], 0x42);
    }

    #[test]
    fn drawing_twice_sets_the_collision_flag() {
        let mut emulator = Emulator::new();
        emulator.memory.write(0x300, 0xFF).unwrap();
        emulator
            .execute_many(&[
                Instruction::SetIndex(Addr(0x300)),
                Instruction::SetConst(Reg(0), Const(0)),
                Instruction::SetConst(Reg(1), Const(0)),
                Instruction::Draw(Reg(0), Reg(1), Const(1)),
            ])
            .unwrap();
        assert_eq!(emulator.registers().v[FLAG], 0);
        assert_eq!(emulator.framebuffer().lit_pixels(), 8);

        emulator.execute_single(Instruction::Draw(Reg(0), Reg(1), Const(1))).unwrap();
        assert_eq!(emulator.registers().v[FLAG], 1);
        assert_eq!(emulator.framebuffer().lit_pixels(), 0);
        assert_eq!(emulator.output().frames(), 2);
        assert_eq!(emulator.output().last_frame(), emulator.framebuffer());
    }

    #[test]
    fn drawing_near_the_right_edge_clips() {
        let mut emulator = Emulator::new();
        emulator.memory.write(0x300, 0xFF).unwrap();
        emulator.registers.i = 0x300;
        emulator.registers.v[0] = 60;
        emulator.execute_single(Instruction::Draw(Reg(0), Reg(1), Const(1))).unwrap();
        assert!((60..64).all(|x| emulator.framebuffer().pixel(x, 0)));
        assert!(!emulator.framebuffer().pixel(0, 0));
        assert_eq!(emulator.framebuffer().lit_pixels(), 4);
    }

    #[test]
    fn drawing_a_glyph() {
        let mut emulator = Emulator::new();
        emulator.registers.v[0] = 0x0;
        emulator
            .execute_many(&[
                Instruction::SetIndexToGlyph(Reg(0)),
                Instruction::Draw(Reg(1), Reg(1), Const(5)),
            ])
            .unwrap();
        // The outline of a zero: 4 + 2 + 2 + 2 + 4 pixels.
        assert_eq!(emulator.framebuffer().lit_pixels(), 14);
    }

    #[test]
    fn drawing_from_past_the_end_of_memory_fails() {
        let mut emulator = Emulator::new();
        emulator.registers.i = 0xFFE;
        assert_eq!(
            emulator.execute_single(Instruction::Draw(Reg(0), Reg(0), Const(5))),
            Err(EmulatorError::OutOfBounds { addr: 0x1000 })
        );
    }

    #[test]
    fn clear_screen_clears_screen() {
        let mut emulator = Emulator::new();
        emulator.execute_single(Instruction::Draw(Reg(0), Reg(0), Const(5))).unwrap();
        assert!(emulator.framebuffer().lit_pixels() > 0);
        emulator.execute_single(Instruction::ClearScreen).unwrap();
        assert_eq!(emulator.framebuffer().lit_pixels(), 0);
        assert_eq!(emulator.output().last_frame().lit_pixels(), 0);
    }

    #[test]
    fn index_register_operations() {
        let mut emulator = Emulator::new();
        emulator.registers.v[3] = 0x10;
        emulator.registers.v[4] = 0xB;
        emulator
            .execute_many(&[
                Instruction::SetIndex(Addr(0x300)),
                Instruction::AddToIndex(Reg(3)),
            ])
            .unwrap();
        assert_eq!(emulator.registers().i, 0x310);
        emulator.execute_single(Instruction::SetIndexToGlyph(Reg(4))).unwrap();
        assert_eq!(emulator.registers().i, 55);
    }

    #[test_case(254 => vec![2, 5, 4])]
    #[test_case(7 => vec![0, 0, 7])]
    #[test_case(100 => vec![1, 0, 0])]
    fn binary_coded_decimal(value: u8) -> Vec<u8> {
        let mut emulator = Emulator::new();
        emulator.registers.v[5] = value;
        emulator.registers.i = 0x400;
        emulator.execute_single(Instruction::StoreBcd(Reg(5))).unwrap();
        emulator.memory().read_block(0x400, 3).unwrap().to_vec()
    }

    #[test]
    fn store_then_load_registers_round_trips() {
        let mut emulator = Emulator::new();
        emulator.registers.v[..5].copy_from_slice(&[0x11, 0x22, 0x33, 0x44, 0x55]);
        emulator.registers.i = 0x400;
        emulator.execute_single(Instruction::StoreRegisters(Reg(3))).unwrap();
        assert_eq!(
            emulator.memory().read_block(0x400, 5).unwrap(),
            &[0x11, 0x22, 0x33, 0x44, 0x00]
        );

        emulator.registers.v = [0; NUM_REGISTERS];
        emulator.execute_single(Instruction::LoadRegisters(Reg(3))).unwrap();
        assert_eq!(&emulator.registers().v[..5], &[0x11, 0x22, 0x33, 0x44, 0x00]);
        assert_eq!(emulator.registers().i, 0x400);
    }

    #[test]
    fn block_store_past_the_end_of_memory_fails() {
        let mut emulator = Emulator::new();
        emulator.registers.i = 0xFFE;
        assert_eq!(
            emulator.execute_single(Instruction::StoreRegisters(Reg(3))),
            Err(EmulatorError::OutOfBounds { addr: 0x1000 })
        );
    }

    #[test]
    fn random_is_masked() {
        let mut emulator = Emulator::new().with_seed(42);
        for _ in 0..100 {
            emulator.execute_single(Instruction::Random(Reg(2), Const(0x0F))).unwrap();
            assert_eq!(emulator.registers().v[2] & 0xF0, 0);
        }
        emulator.execute_single(Instruction::Random(Reg(2), Const(0x00))).unwrap();
        assert_eq!(emulator.registers().v[2], 0);
    }

    #[test]
    fn timers_are_shared_with_the_clock() {
        let mut emulator = Emulator::new();
        emulator.registers.v[0] = 5;
        emulator
            .execute_many(&[
                Instruction::SetDelayTimer(Reg(0)),
                Instruction::SetSoundTimer(Reg(0)),
            ])
            .unwrap();

        let timers = emulator.timers();
        for _ in 0..3 {
            timers.tick();
        }
        emulator.execute_single(Instruction::GetDelayTimer(Reg(1))).unwrap();
        assert_eq!(emulator.registers().v[1], 2);
        assert_eq!(timers.sound(), 2);
    }

    #[test]
    fn key_skips_read_the_keypad() {
        let keypad = Arc::new(Keypad::new());
        let mut emulator = Emulator::with_io(keypad.clone(), DummyOutput::new());
        emulator.registers.v[0] = 0xA;

        emulator.execute_single(Instruction::SkipIfKeyPressed(Reg(0))).unwrap();
        assert_eq!(emulator.registers().program_counter, 0x200);
        emulator.execute_single(Instruction::SkipIfKeyNotPressed(Reg(0))).unwrap();
        assert_eq!(emulator.registers().program_counter, 0x202);

        keypad.press(0xA);
        emulator.execute_single(Instruction::SkipIfKeyPressed(Reg(0))).unwrap();
        assert_eq!(emulator.registers().program_counter, 0x204);
        emulator.execute_single(Instruction::SkipIfKeyNotPressed(Reg(0))).unwrap();
        assert_eq!(emulator.registers().program_counter, 0x204);
    }

    #[test]
    fn wait_for_key_blocks_until_a_key_is_pressed() {
        let keypad = Arc::new(Keypad::new());
        let mut emulator = Emulator::with_io(keypad.clone(), DummyOutput::new());

        let execution = thread::spawn(move || {
            emulator.execute_single(Instruction::WaitForKey(Reg(5))).unwrap();
            emulator.registers().v[5]
        });

        while !keypad.is_waiting() {
            thread::sleep(Duration::from_millis(1));
        }
        keypad.press(0xB);
        assert_eq!(execution.join().unwrap(), 0xB);
    }
}
