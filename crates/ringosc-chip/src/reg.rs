//! Register namespace.
//!
//! The firmware sees the chip as a flat set of named 32-bit ports: per-pad
//! mode registers, the transfer-commit register, the low GPIO data word, and
//! four logic-analyzer banks of four registers each. [`Reg`] enumerates them
//! all; backends translate a `Reg` into whatever addressing they use.

/// Number of user-project pads with individual mode registers.
pub const MPRJ_IO_PADS: u8 = 38;

/// One of the four independent logic-analyzer banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaBank {
    /// Bank 0 — project activation (decode-slot select).
    La0,
    /// Bank 1 — DUT control pins and mux addressing.
    La1,
    /// Bank 2 — counter target (out) / oscillation count (in).
    La2,
    /// Bank 3 — mux data bus.
    La3,
}

impl LaBank {
    /// All banks, in index order.
    pub const ALL: [Self; 4] = [Self::La0, Self::La1, Self::La2, Self::La3];

    /// Bank index 0..=3.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::La0 => 0,
            Self::La1 => 1,
            Self::La2 => 2,
            Self::La3 => 3,
        }
    }
}

/// One of the four registers within an LA bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaReg {
    /// Firmware-driven data word.
    Data,
    /// DUT-driven data word. Read-only from firmware.
    DataIn,
    /// Output-enable mask; a 1 means the firmware drives that bit.
    Oenb,
    /// Input-enable mask; 0 enables DUT observation of firmware outputs.
    Iena,
}

/// A named 32-bit register port.
///
/// This is the whole interface the protocol core needs from the outside
/// world; see `RegisterBus` in the driver crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    /// Pad mode register for user-project pin `0..MPRJ_IO_PADS`.
    MprjIo(u8),
    /// Transfer-commit register. Write 1 to commit the pad configuration;
    /// hardware clears it to 0 when the serial transfer finishes.
    MprjXfer,
    /// Low 32 bits of the user-project GPIO data bus (handshake + result).
    MprjDatal,
    /// Logic-analyzer register.
    La(LaBank, LaReg),
}

impl Reg {
    /// Whether the register is driven by the DUT and must never be written
    /// by firmware.
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::La(_, LaReg::DataIn))
    }
}

impl std::fmt::Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MprjIo(pin) => write!(f, "mprj_io_{pin}"),
            Self::MprjXfer => write!(f, "mprj_xfer"),
            Self::MprjDatal => write!(f, "mprj_datal"),
            Self::La(bank, reg) => {
                let suffix = match reg {
                    LaReg::Data => "data",
                    LaReg::DataIn => "data_in",
                    LaReg::Oenb => "oenb",
                    LaReg::Iena => "iena",
                };
                write!(f, "la{}_{suffix}", bank.index())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_data_in_is_input() {
        assert!(Reg::La(LaBank::La1, LaReg::DataIn).is_input());
        assert!(!Reg::La(LaBank::La1, LaReg::Data).is_input());
        assert!(!Reg::MprjXfer.is_input());
    }

    #[test]
    fn display_names_match_harness_convention() {
        assert_eq!(Reg::La(LaBank::La2, LaReg::DataIn).to_string(), "la2_data_in");
        assert_eq!(Reg::MprjIo(13).to_string(), "mprj_io_13");
    }
}
