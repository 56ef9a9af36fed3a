//! Management-wishbone memory map.
//!
//! Only the `/dev/mem` backend needs physical addresses; the protocol core
//! works on register names. The map is split into two blocks so the backend
//! can map each page-aligned region separately.

use crate::reg::{LaReg, Reg, MPRJ_IO_PADS};

/// Physical base of the GPIO control block.
pub const GPIO_BASE: usize = 0x2600_0000;
/// Physical base of the logic-analyzer block.
pub const LA_BASE: usize = 0x2500_0000;

/// Byte size of each mapped block (one page covers everything we touch).
pub const BLOCK_SIZE: usize = 0x1000;

// GPIO block offsets.
const DATAL_OFFSET: usize = 0x00;
const XFER_OFFSET: usize = 0x08;
const IO_CONFIG_OFFSET: usize = 0x24; // pin 0; 4 bytes per pin

// LA block: 0x10 bytes per bank.
const LA_BANK_STRIDE: usize = 0x10;

/// Which mapped block a register lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// GPIO control block at [`GPIO_BASE`].
    Gpio,
    /// Logic-analyzer block at [`LA_BASE`].
    La,
}

impl Block {
    /// Physical base address of the block.
    #[must_use]
    pub const fn base(self) -> usize {
        match self {
            Self::Gpio => GPIO_BASE,
            Self::La => LA_BASE,
        }
    }
}

/// Locate a register: which block it lives in and its byte offset there.
///
/// # Panics
///
/// Panics if a pad index is outside `0..MPRJ_IO_PADS`.
#[must_use]
pub fn locate(reg: Reg) -> (Block, usize) {
    match reg {
        Reg::MprjDatal => (Block::Gpio, DATAL_OFFSET),
        Reg::MprjXfer => (Block::Gpio, XFER_OFFSET),
        Reg::MprjIo(pin) => {
            assert!(pin < MPRJ_IO_PADS, "pad index {pin} out of range");
            (Block::Gpio, IO_CONFIG_OFFSET + usize::from(pin) * 4)
        }
        Reg::La(bank, r) => {
            let within = match r {
                LaReg::Data => 0x0,
                LaReg::DataIn => 0x4,
                LaReg::Oenb => 0x8,
                LaReg::Iena => 0xC,
            };
            (Block::La, bank.index() * LA_BANK_STRIDE + within)
        }
    }
}
