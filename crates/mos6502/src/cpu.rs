//! The CPU: instruction semantics, the fetch-decode-execute loop, and
//! the run controller.
//!
//! Semantics are one small routine per mnemonic, dispatched through the
//! opcode table. The loop owns PC advancement for operand bytes; the
//! control-flow routines (jumps, calls, returns, taken branches, BRK)
//! load PC themselves and latch `pc_loaded` so the loop leaves it
//! alone. After every `step()` the full register/memory/cycle state
//! matches a real 6502.

use std::thread;
use std::time::Duration;

use crate::addressing::{AddressingMode, Target};
use crate::error::CpuError;
use crate::flags::{self, Flag, FlagUpdate, Status};
use crate::memory::AddressSpace;
use crate::opcode::{self, Mnemonic, Opcode, BRK_CODE};
use crate::registers::Registers;

/// Reset vector: PC is loaded from here on `reset()`.
pub const RESET_VECTOR: u16 = 0xFFFC;

/// IRQ/BRK vector: PC is loaded from here by BRK.
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// One CPU cycle on an NTSC NES: master crystal (21.477272 MHz) / 12.
pub const NTSC_CYCLE: Duration = Duration::from_nanos(559);

/// A MOS 6502 with its own flat 64 KiB address space.
pub struct Cpu {
    /// Register file.
    pub regs: Registers,
    /// The 64 KiB address space, owned exclusively by this CPU.
    pub memory: AddressSpace,
    /// Monotonic cycle counter.
    cycles: u64,
    /// Last operand value or effective address, retained for tracing.
    fetched: u16,
    /// Latched by semantics that load PC themselves.
    pc_loaded: bool,
    /// Dynamic cycle penalties accrued during the current instruction.
    extra_cycles: u8,
    /// When set, the run loops sleep this long per cycle executed.
    cycle_time: Option<Duration>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// A CPU in power-on state: registers and memory zeroed, SP at $FF.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            memory: AddressSpace::new(),
            cycles: 0,
            fetched: 0,
            pc_loaded: false,
            extra_cycles: 0,
            cycle_time: None,
        }
    }

    /// Total cycles executed since power-on or the last `reset()`.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Last operand value or effective address the semantics touched.
    #[must_use]
    pub const fn fetched_data(&self) -> u16 {
        self.fetched
    }

    /// Enable real-time pacing: the run loops sleep `cycle_time` per
    /// executed cycle. `None` (the default) runs flat out. Use
    /// [`NTSC_CYCLE`] for NES-speed execution.
    pub fn set_cycle_time(&mut self, cycle_time: Option<Duration>) {
        self.cycle_time = cycle_time;
    }

    // ========================================================================
    // Run controller
    // ========================================================================

    /// Reset registers and the cycle counter, then load PC from the
    /// reset vector. Memory is preserved.
    pub fn reset(&mut self) {
        self.regs = Registers::new();
        self.regs.pc = self.memory.read_u16(RESET_VECTOR);
        self.cycles = 0;
        self.fetched = 0;
    }

    /// Copy a program image to `base` and point the reset vector at it.
    ///
    /// # Errors
    ///
    /// `EmptyProgram` or `ProgramTooLarge` when the image cannot be
    /// placed.
    pub fn load_program(&mut self, program: &[u8], base: u16) -> Result<(), CpuError> {
        self.memory.load(base, program)?;
        self.memory.write_u16(RESET_VECTOR, base);
        Ok(())
    }

    /// Load a program, reset, and run it to the terminating BRK.
    ///
    /// # Errors
    ///
    /// Propagates load failures and any `UnknownOpcode` hit while
    /// running.
    pub fn load_program_and_run(&mut self, program: &[u8], base: u16) -> Result<(), CpuError> {
        self.load_program(program, base)?;
        self.reset();
        self.run()
    }

    /// Execute a bare byte buffer placed at the current PC, without the
    /// reset-vector dance. Runs until PC leaves the buffer or a BRK
    /// byte comes up for fetch. Exists for unit tests.
    ///
    /// # Errors
    ///
    /// Propagates load failures and `UnknownOpcode`.
    pub fn interpret(&mut self, program: &[u8]) -> Result<(), CpuError> {
        let start = self.regs.pc;
        self.memory.load(start, program)?;
        let end = u32::from(start) + program.len() as u32;
        while (u32::from(self.regs.pc)) < end && self.regs.pc >= start {
            if self.memory.read(self.regs.pc) == BRK_CODE {
                break;
            }
            self.step()?;
        }
        Ok(())
    }

    /// Run until a BRK byte comes up for fetch.
    ///
    /// # Errors
    ///
    /// `UnknownOpcode` when dispatch hits a byte outside the table.
    pub fn run(&mut self) -> Result<(), CpuError> {
        self.run_with_callback(|_| ())
    }

    /// Like [`run`](Self::run), but invokes `callback` before each
    /// instruction with a mutable handle to the CPU, so a host can poll
    /// input, render from memory, or patch state.
    ///
    /// # Errors
    ///
    /// `UnknownOpcode` when dispatch hits a byte outside the table.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<(), CpuError>
    where
        F: FnMut(&mut Cpu),
    {
        loop {
            if self.memory.read(self.regs.pc) == BRK_CODE {
                return Ok(());
            }
            callback(self);
            let spent = self.step()?;
            if let Some(cycle_time) = self.cycle_time {
                thread::sleep(cycle_time * u32::from(spent));
            }
        }
    }

    // ========================================================================
    // Fetch-decode-execute
    // ========================================================================

    /// Execute the instruction at PC and return the cycles it took
    /// (base cycles plus page-cross and branch penalties).
    ///
    /// # Errors
    ///
    /// `UnknownOpcode` if the byte at PC has no table entry; PC is left
    /// past the offending byte and the state is otherwise untouched.
    pub fn step(&mut self) -> Result<u8, CpuError> {
        let pc = self.regs.pc;
        let code = self.memory.read(pc);
        self.regs.pc = pc.wrapping_add(1);

        let op = opcode::lookup(code).ok_or(CpuError::UnknownOpcode { opcode: code, pc })?;

        self.pc_loaded = false;
        self.extra_cycles = 0;
        self.execute(op);

        if !self.pc_loaded {
            self.regs.pc = self.regs.pc.wrapping_add(u16::from(op.size) - 1);
        }

        let spent = op.cycles + self.extra_cycles;
        self.cycles += u64::from(spent);
        Ok(spent)
    }

    fn execute(&mut self, op: &Opcode) {
        match op.mnemonic {
            Mnemonic::Lda => self.lda(op.mode),
            Mnemonic::Ldx => self.ldx(op.mode),
            Mnemonic::Ldy => self.ldy(op.mode),
            Mnemonic::Sta => self.store(op.mode, self.regs.a),
            Mnemonic::Stx => self.store(op.mode, self.regs.x),
            Mnemonic::Sty => self.store(op.mode, self.regs.y),

            Mnemonic::Tax => self.tax(),
            Mnemonic::Tay => self.tay(),
            Mnemonic::Txa => self.txa(),
            Mnemonic::Tya => self.tya(),
            Mnemonic::Tsx => self.tsx(),
            Mnemonic::Txs => self.regs.sp = self.regs.x,

            Mnemonic::Adc => self.adc(op.mode),
            Mnemonic::Sbc => self.sbc(op.mode),

            Mnemonic::Inc => self.modify(op.mode, Self::do_inc),
            Mnemonic::Dec => self.modify(op.mode, Self::do_dec),
            Mnemonic::Inx => self.inx(),
            Mnemonic::Dex => self.dex(),
            Mnemonic::Iny => self.iny(),
            Mnemonic::Dey => self.dey(),

            Mnemonic::Asl => self.modify(op.mode, Self::do_asl),
            Mnemonic::Lsr => self.modify(op.mode, Self::do_lsr),
            Mnemonic::Rol => self.modify(op.mode, Self::do_rol),
            Mnemonic::Ror => self.modify(op.mode, Self::do_ror),

            Mnemonic::And => self.and(op.mode),
            Mnemonic::Ora => self.ora(op.mode),
            Mnemonic::Eor => self.eor(op.mode),
            Mnemonic::Bit => self.bit(op.mode),

            Mnemonic::Cmp => self.compare(self.regs.a, op.mode),
            Mnemonic::Cpx => self.compare(self.regs.x, op.mode),
            Mnemonic::Cpy => self.compare(self.regs.y, op.mode),

            Mnemonic::Bpl => self.branch_if(!self.regs.p.is_set(flags::N)),
            Mnemonic::Bmi => self.branch_if(self.regs.p.is_set(flags::N)),
            Mnemonic::Bvc => self.branch_if(!self.regs.p.is_set(flags::V)),
            Mnemonic::Bvs => self.branch_if(self.regs.p.is_set(flags::V)),
            Mnemonic::Bcc => self.branch_if(!self.regs.p.is_set(flags::C)),
            Mnemonic::Bcs => self.branch_if(self.regs.p.is_set(flags::C)),
            Mnemonic::Bne => self.branch_if(!self.regs.p.is_set(flags::Z)),
            Mnemonic::Beq => self.branch_if(self.regs.p.is_set(flags::Z)),

            Mnemonic::Jmp => self.jmp(op.mode),
            Mnemonic::Jsr => self.jsr(),
            Mnemonic::Rts => self.rts(),
            Mnemonic::Brk => self.brk(),
            Mnemonic::Rti => self.rti(),

            Mnemonic::Pha => self.push(self.regs.a),
            Mnemonic::Php => self.push(self.regs.p.to_pushed_byte()),
            Mnemonic::Pla => self.pla(),
            Mnemonic::Plp => {
                let value = self.pull();
                self.regs.p = Status::from_popped_byte(value);
            }

            Mnemonic::Clc => self.regs.p.update(Flag::Carry, FlagUpdate::Clear),
            Mnemonic::Sec => self.regs.p.update(Flag::Carry, FlagUpdate::Set),
            Mnemonic::Cli => self.regs.p.update(Flag::InterruptDisable, FlagUpdate::Clear),
            Mnemonic::Sei => self.regs.p.update(Flag::InterruptDisable, FlagUpdate::Set),
            Mnemonic::Clv => self.regs.p.update(Flag::Overflow, FlagUpdate::Clear),
            Mnemonic::Cld => self.regs.p.update(Flag::Decimal, FlagUpdate::Clear),
            Mnemonic::Sed => self.regs.p.update(Flag::Decimal, FlagUpdate::Set),

            Mnemonic::Nop => {}
        }
    }

    // ========================================================================
    // Operand access
    // ========================================================================

    /// Effective address for a store or read-modify-write; no
    /// page-cross penalty on the write path.
    fn operand_address(&mut self, mode: AddressingMode) -> u16 {
        match self.resolve(mode) {
            Target::Memory { addr, .. } => {
                self.fetched = addr;
                addr
            }
            other => unreachable!("address requested for {other:?} operand"),
        }
    }

    /// Fetch the operand value for a read-path instruction, charging
    /// the page-cross penalty where indexing crossed.
    fn read_operand(&mut self, mode: AddressingMode) -> u8 {
        match self.resolve(mode) {
            Target::Memory { addr, page_crossed } => {
                if page_crossed {
                    self.extra_cycles += 1;
                }
                let value = self.memory.read(addr);
                self.fetched = u16::from(value);
                value
            }
            Target::Accumulator => self.regs.a,
            Target::None => unreachable!("value requested for implied operand"),
        }
    }

    // ========================================================================
    // Stack engine
    // ========================================================================

    /// Push a byte; SP wraps within the stack page.
    pub fn push(&mut self, value: u8) {
        let addr = self.regs.push();
        self.memory.write(addr, value);
    }

    /// Pull a byte; SP wraps within the stack page.
    pub fn pull(&mut self) -> u8 {
        let addr = self.regs.pop();
        self.memory.read(addr)
    }

    /// Push a 16-bit word, high byte first, so the low byte pulls out
    /// first.
    pub fn push_word(&mut self, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.push(high);
        self.push(low);
    }

    /// Pull a 16-bit word pushed by [`push_word`](Self::push_word).
    pub fn pull_word(&mut self) -> u16 {
        let low = self.pull();
        let high = self.pull();
        u16::from_le_bytes([low, high])
    }

    // ========================================================================
    // Loads, stores, transfers
    // ========================================================================

    fn lda(&mut self, mode: AddressingMode) {
        self.regs.a = self.read_operand(mode);
        self.regs.p.update_zn(self.regs.a);
    }

    fn ldx(&mut self, mode: AddressingMode) {
        self.regs.x = self.read_operand(mode);
        self.regs.p.update_zn(self.regs.x);
    }

    fn ldy(&mut self, mode: AddressingMode) {
        self.regs.y = self.read_operand(mode);
        self.regs.p.update_zn(self.regs.y);
    }

    /// STA/STX/STY: write a register to the effective address. Flags
    /// untouched.
    fn store(&mut self, mode: AddressingMode, value: u8) {
        let addr = self.operand_address(mode);
        self.memory.write(addr, value);
    }

    fn tax(&mut self) {
        self.regs.x = self.regs.a;
        self.regs.p.update_zn(self.regs.x);
    }

    fn tay(&mut self) {
        self.regs.y = self.regs.a;
        self.regs.p.update_zn(self.regs.y);
    }

    fn txa(&mut self) {
        self.regs.a = self.regs.x;
        self.regs.p.update_zn(self.regs.a);
    }

    fn tya(&mut self) {
        self.regs.a = self.regs.y;
        self.regs.p.update_zn(self.regs.a);
    }

    fn tsx(&mut self) {
        self.regs.x = self.regs.sp;
        self.regs.p.update_zn(self.regs.x);
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// The single add path: `A + value + C`, with carry out and the
    /// signed-overflow rule. SBC routes through here with the operand
    /// complemented. Decimal mode is ignored.
    fn add_to_a(&mut self, value: u8) {
        let a = self.regs.a;
        let carry = u16::from(self.regs.p.is_set(flags::C));
        let sum = u16::from(a) + u16::from(value) + carry;
        let result = sum as u8;

        self.regs.p.set_if(flags::C, sum > 0xFF);
        // Overflow: both inputs agreed on sign and the result disagrees.
        self.regs
            .p
            .set_if(flags::V, (a ^ result) & (value ^ result) & 0x80 != 0);
        self.regs.a = result;
        self.regs.p.update_zn(result);
    }

    fn adc(&mut self, mode: AddressingMode) {
        let value = self.read_operand(mode);
        self.add_to_a(value);
    }

    fn sbc(&mut self, mode: AddressingMode) {
        let value = self.read_operand(mode);
        self.add_to_a(!value);
    }

    fn compare(&mut self, reg: u8, mode: AddressingMode) {
        let value = self.read_operand(mode);
        self.regs.p.set_if(flags::C, reg >= value);
        self.regs.p.update_zn(reg.wrapping_sub(value));
    }

    // ========================================================================
    // Increments, decrements
    // ========================================================================

    fn do_inc(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.regs.p.update_zn(result);
        result
    }

    fn do_dec(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.regs.p.update_zn(result);
        result
    }

    fn inx(&mut self) {
        self.regs.x = self.regs.x.wrapping_add(1);
        self.regs.p.update_zn(self.regs.x);
    }

    fn dex(&mut self) {
        self.regs.x = self.regs.x.wrapping_sub(1);
        self.regs.p.update_zn(self.regs.x);
    }

    fn iny(&mut self) {
        self.regs.y = self.regs.y.wrapping_add(1);
        self.regs.p.update_zn(self.regs.y);
    }

    fn dey(&mut self) {
        self.regs.y = self.regs.y.wrapping_sub(1);
        self.regs.p.update_zn(self.regs.y);
    }

    // ========================================================================
    // Shifts and rotates
    // ========================================================================

    /// Apply a read-modify-write operation to the accumulator or the
    /// addressed memory byte. The indexed RMW forms pay their fixed
    /// cost through the base cycles, never the page-cross penalty.
    fn modify(&mut self, mode: AddressingMode, op: fn(&mut Self, u8) -> u8) {
        match self.resolve(mode) {
            Target::Accumulator => {
                let result = op(self, self.regs.a);
                self.regs.a = result;
            }
            Target::Memory { addr, .. } => {
                let value = self.memory.read(addr);
                self.fetched = u16::from(value);
                let result = op(self, value);
                self.memory.write(addr, result);
            }
            Target::None => unreachable!("read-modify-write on implied operand"),
        }
    }

    fn do_asl(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(flags::C, value & 0x80 != 0);
        let result = value << 1;
        self.regs.p.update_zn(result);
        result
    }

    fn do_lsr(&mut self, value: u8) -> u8 {
        self.regs.p.set_if(flags::C, value & 0x01 != 0);
        let result = value >> 1;
        self.regs.p.update_zn(result);
        result
    }

    fn do_rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.p.is_set(flags::C));
        self.regs.p.set_if(flags::C, value & 0x80 != 0);
        let result = (value << 1) | carry_in;
        self.regs.p.update_zn(result);
        result
    }

    fn do_ror(&mut self, value: u8) -> u8 {
        let carry_in = if self.regs.p.is_set(flags::C) { 0x80 } else { 0 };
        self.regs.p.set_if(flags::C, value & 0x01 != 0);
        let result = (value >> 1) | carry_in;
        self.regs.p.update_zn(result);
        result
    }

    // ========================================================================
    // Logic
    // ========================================================================

    fn and(&mut self, mode: AddressingMode) {
        self.regs.a &= self.read_operand(mode);
        self.regs.p.update_zn(self.regs.a);
    }

    fn ora(&mut self, mode: AddressingMode) {
        self.regs.a |= self.read_operand(mode);
        self.regs.p.update_zn(self.regs.a);
    }

    fn eor(&mut self, mode: AddressingMode) {
        self.regs.a ^= self.read_operand(mode);
        self.regs.p.update_zn(self.regs.a);
    }

    /// BIT: Z from `A AND operand` (result discarded), N and V copied
    /// from bits 7 and 6 of the operand.
    fn bit(&mut self, mode: AddressingMode) {
        let value = self.read_operand(mode);
        self.regs.p.set_if(flags::Z, self.regs.a & value == 0);
        self.regs.p.set_if(flags::N, value & 0x80 != 0);
        self.regs.p.set_if(flags::V, value & 0x40 != 0);
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    /// Take the branch when `condition` holds: 1 extra cycle, or 2 when
    /// the target sits on a different page than the next instruction.
    fn branch_if(&mut self, condition: bool) {
        let Target::Memory { addr, page_crossed } = self.resolve(AddressingMode::Relative)
        else {
            unreachable!("relative mode resolves to memory");
        };
        self.fetched = addr;
        if condition {
            self.extra_cycles += if page_crossed { 2 } else { 1 };
            self.regs.pc = addr;
            self.pc_loaded = true;
        }
    }

    fn jmp(&mut self, mode: AddressingMode) {
        let addr = self.operand_address(mode);
        self.regs.pc = addr;
        self.pc_loaded = true;
    }

    /// JSR pushes the address of its own last operand byte (PC - 1
    /// relative to the next instruction); RTS adds the 1 back.
    fn jsr(&mut self) {
        let target = self.operand_address(AddressingMode::Absolute);
        self.push_word(self.regs.pc.wrapping_add(1));
        self.regs.pc = target;
        self.pc_loaded = true;
    }

    fn rts(&mut self) {
        self.regs.pc = self.pull_word().wrapping_add(1);
        self.pc_loaded = true;
    }

    /// Canonical BRK: push the return address past the padding byte,
    /// push P with B and the unused bit set, set I, and vector through
    /// $FFFE. The run loops halt on the BRK byte before dispatch
    /// instead; this path serves hosts driving `step()` directly.
    fn brk(&mut self) {
        self.push_word(self.regs.pc.wrapping_add(1));
        self.push(self.regs.p.to_pushed_byte());
        self.regs.p.set(flags::I);
        self.regs.pc = self.memory.read_u16(IRQ_VECTOR);
        self.pc_loaded = true;
    }

    fn rti(&mut self) {
        let status = self.pull();
        self.regs.p = Status::from_popped_byte(status);
        self.regs.pc = self.pull_word();
        self.pc_loaded = true;
    }

    // ========================================================================
    // Stack instructions
    // ========================================================================

    fn pla(&mut self) {
        self.regs.a = self.pull();
        self.regs.p.update_zn(self.regs.a);
    }
}
