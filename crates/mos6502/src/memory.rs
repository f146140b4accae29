//! Flat 64 KiB address space.
//!
//! The core treats memory as a uniform byte-addressable region; PPU
//! registers, mirrors, and mappers are the surrounding program's
//! business. 16-bit accesses are little-endian: low byte at `addr`,
//! high byte at `addr + 1`, with the second address wrapping at the top
//! of the space.

use crate::error::CpuError;

/// Size of the emulated address space in bytes.
pub const MEMORY_SIZE: usize = 0x1_0000;

/// Bottom of the stack page. The effective stack address is always
/// `STACK_BASE | SP`.
pub const STACK_BASE: u16 = 0x0100;

/// Flat 64 KiB byte store, zero-initialized.
pub struct AddressSpace {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressSpace {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: Box::new([0; MEMORY_SIZE]),
        }
    }

    /// Read the byte at `addr`.
    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    /// Write a byte to `addr`.
    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize] = value;
    }

    /// Read a little-endian 16-bit word starting at `addr`.
    #[must_use]
    pub fn read_u16(&self, addr: u16) -> u16 {
        let low = self.read(addr);
        let high = self.read(addr.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    /// Write a little-endian 16-bit word starting at `addr`.
    pub fn write_u16(&mut self, addr: u16, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.write(addr, low);
        self.write(addr.wrapping_add(1), high);
    }

    /// Copy `data` into memory starting at `base`.
    ///
    /// # Errors
    ///
    /// `EmptyProgram` for a zero-length slice, `ProgramTooLarge` if the
    /// slice does not fit between `base` and the top of the space.
    pub fn load(&mut self, base: u16, data: &[u8]) -> Result<(), CpuError> {
        if data.is_empty() {
            return Err(CpuError::EmptyProgram);
        }
        if data.len() > MEMORY_SIZE - base as usize {
            return Err(CpuError::ProgramTooLarge {
                len: data.len(),
                base,
            });
        }
        let start = base as usize;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// View of the whole 64 KiB image.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..]
    }

    /// Format a memory range as hex-dump rows of 16 bytes.
    ///
    /// Bounds are rounded down to 16-byte row boundaries; the row
    /// containing `end` is included.
    #[must_use]
    pub fn hex_dump(&self, start: u16, end: u16) -> String {
        let first = start & !0xF;
        let last = end & !0xF;
        let mut out = String::new();
        let mut row = first;
        loop {
            out.push_str(&format!("{row:04X}:"));
            for offset in 0..16 {
                out.push_str(&format!(" {:02X}", self.read(row.wrapping_add(offset))));
            }
            out.push('\n');
            if row >= last {
                break;
            }
            row = row.wrapping_add(16);
        }
        out
    }

    /// Hex dump of the stack page.
    #[must_use]
    pub fn hex_dump_stack(&self) -> String {
        self.hex_dump(STACK_BASE, STACK_BASE + 0xFF)
    }
}
