//! Instruction-accurate MOS 6502 interpreter.
//!
//! Emulates the 8-bit NMOS 6502 at instruction granularity: after every
//! `step()` the registers, memory, flags, and cycle counter hold exactly
//! the state a real 6502 would show after that instruction, including
//! page-crossing cycle penalties and the signed-overflow semantics of
//! ADC/SBC. Decimal mode is inert (the NES variant ignores it) and only
//! the 151 documented opcodes are dispatched.
//!
//! The CPU owns its flat 64 KiB address space. A host loads a program
//! image, resets, and runs:
//!
//! ```
//! use mos6502::Cpu;
//!
//! let mut cpu = Cpu::new();
//! // LDA #$05; TAX; BRK
//! cpu.load_program(&[0xA9, 0x05, 0xAA, 0x00], 0x0600).unwrap();
//! cpu.reset();
//! cpu.run().unwrap();
//! assert_eq!(cpu.regs.x, 0x05);
//! ```
//!
//! `run_with_callback` invokes a host hook before each instruction so
//! the host can poll input or render from memory. `interpret` executes a
//! bare byte buffer without the reset-vector dance, which is what the
//! test suites use.

mod addressing;
mod cpu;
mod error;
pub mod flags;
mod memory;
mod opcode;
mod registers;
pub mod trace;

pub use addressing::{AddressingMode, Target};
pub use cpu::{Cpu, IRQ_VECTOR, NTSC_CYCLE, RESET_VECTOR};
pub use error::CpuError;
pub use flags::{Flag, FlagUpdate, Status};
pub use memory::{AddressSpace, MEMORY_SIZE, STACK_BASE};
pub use opcode::{lookup, Mnemonic, Opcode, OPCODES};
pub use registers::Registers;
