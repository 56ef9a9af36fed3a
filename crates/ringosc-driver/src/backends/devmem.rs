//! `/dev/mem` register bus.
//!
//! Maps the GPIO control block and the logic-analyzer block of the
//! management wishbone and performs volatile, bounds-checked 32-bit
//! accesses. This is the genuine-hardware backend; nothing in CI exercises
//! it, and its polls should run with an unbounded budget.

// MMIO registers are naturally aligned by hardware, so pointer casts are safe.
#![allow(clippy::cast_ptr_alignment)]

use crate::bus::RegisterBus;
use crate::error::{FirmwareError, Result};
use ringosc_chip::map::{self, Block, BLOCK_SIZE};
use ringosc_chip::Reg;
use rustix::mm::{mmap, munmap, MapFlags, ProtFlags};
use std::fs::{File, OpenOptions};
use std::os::unix::io::AsFd;
use std::ptr::NonNull;

/// One mapped register block.
struct MappedBlock {
    ptr: NonNull<u8>,
    base: usize,
}

impl std::fmt::Debug for MappedBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedBlock")
            .field("ptr", &format_args!("{:p}", self.ptr))
            .field("base", &format_args!("{:#x}", self.base))
            .finish()
    }
}

impl MappedBlock {
    fn map(mem: &File, base: usize) -> Result<Self> {
        // SAFETY: mmap of an open /dev/mem fd at a page-aligned physical
        // base. Invariants: (1) fd valid for the duration of the call;
        // (2) BLOCK_SIZE is non-zero and page-sized; (3) the mapping is
        // exclusive to this process object and unmapped in Drop.
        let ptr = unsafe {
            mmap(
                std::ptr::null_mut(),
                BLOCK_SIZE,
                ProtFlags::READ | ProtFlags::WRITE,
                MapFlags::SHARED,
                mem.as_fd(),
                base as u64,
            )
            .map_err(|e| FirmwareError::map_failed(base, e.to_string()))?
        };

        let ptr = NonNull::new(ptr.cast::<u8>())
            .ok_or_else(|| FirmwareError::map_failed(base, "mmap returned null"))?;

        tracing::info!("mapped register block {base:#x} at {ptr:p}");
        Ok(Self { ptr, base })
    }

    fn read32(&self, offset: usize) -> u32 {
        assert!(offset + 4 <= BLOCK_SIZE, "register offset out of bounds");
        // SAFETY: volatile read of a hardware register. ptr is valid for
        // BLOCK_SIZE bytes (mapped above), offset is bounds-checked, and
        // 32-bit registers are naturally aligned on the wishbone.
        unsafe { std::ptr::read_volatile(self.ptr.as_ptr().add(offset).cast::<u32>()) }
    }

    fn write32(&self, offset: usize, value: u32) {
        assert!(offset + 4 <= BLOCK_SIZE, "register offset out of bounds");
        // SAFETY: volatile write of a hardware register; same invariants as
        // read32. The write's side effect is the whole point.
        unsafe {
            std::ptr::write_volatile(self.ptr.as_ptr().add(offset).cast::<u32>(), value);
        }
    }
}

impl Drop for MappedBlock {
    fn drop(&mut self) {
        // SAFETY: ptr/BLOCK_SIZE are exactly what mmap returned; Drop runs
        // at most once and no references outlive self.
        unsafe {
            let _ = munmap(self.ptr.as_ptr().cast(), BLOCK_SIZE);
        }
        tracing::debug!("unmapped register block {:#x}", self.base);
    }
}

/// Register bus over `/dev/mem`.
#[derive(Debug)]
pub struct DevMemBus {
    gpio: MappedBlock,
    la: MappedBlock,
    _mem: File,
}

impl DevMemBus {
    /// Map both register blocks at their default physical bases.
    ///
    /// # Errors
    ///
    /// Returns an error if `/dev/mem` cannot be opened (needs root) or a
    /// block cannot be mapped.
    pub fn open() -> Result<Self> {
        Self::open_at(map::GPIO_BASE, map::LA_BASE)
    }

    /// Map both register blocks at explicit physical bases.
    ///
    /// # Errors
    ///
    /// Returns an error if `/dev/mem` cannot be opened or a block cannot be
    /// mapped.
    pub fn open_at(gpio_base: usize, la_base: usize) -> Result<Self> {
        let mem = OpenOptions::new().read(true).write(true).open("/dev/mem")?;
        let gpio = MappedBlock::map(&mem, gpio_base)?;
        let la = MappedBlock::map(&mem, la_base)?;
        Ok(Self { gpio, la, _mem: mem })
    }

    fn block(&self, block: Block) -> &MappedBlock {
        match block {
            Block::Gpio => &self.gpio,
            Block::La => &self.la,
        }
    }
}

impl RegisterBus for DevMemBus {
    fn read(&mut self, reg: Reg) -> Result<u32> {
        let (block, offset) = map::locate(reg);
        Ok(self.block(block).read32(offset))
    }

    fn write(&mut self, reg: Reg, value: u32) -> Result<()> {
        if reg.is_input() {
            return Err(FirmwareError::WriteToInput { reg });
        }
        let (block, offset) = map::locate(reg);
        self.block(block).write32(offset, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires hardware (and root for /dev/mem)
    fn map_default_blocks() {
        let bus = DevMemBus::open().expect("map register blocks");
        println!("mapped: {bus:?}");
    }
}
