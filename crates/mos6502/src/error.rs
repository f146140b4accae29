//! Error kinds surfaced to the host.

use thiserror::Error;

/// Fatal conditions reported by the load and run paths.
///
/// Everything else a program can do wrong (unbalanced stacks, wild
/// stores) is expressed in the emulated machine's own state, as on real
/// hardware.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CpuError {
    /// A zero-length program was passed to the loader.
    #[error("program contains no instructions")]
    EmptyProgram,

    /// The program does not fit between its base address and the top of
    /// the address space.
    #[error("program of {len} bytes does not fit at base ${base:04X}")]
    ProgramTooLarge { len: usize, base: u16 },

    /// The dispatch loop fetched a byte with no entry in the opcode
    /// table. Undocumented opcodes are not implemented.
    #[error("unknown opcode ${opcode:02X} at ${pc:04X}")]
    UnknownOpcode { opcode: u8, pc: u16 },
}
