//! Addressable signal-routing channels inside the DUT.
//!
//! The addressable-mux variant exposes six internal routing selectors. Each
//! `set_mux` write latches a 32-bit value onto one of them; the channels are
//! independent fields of DUT state, so writes may happen in any order.

/// One of the DUT's six mux channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MuxChannel {
    /// Adder `a` input word.
    AInput = 0,
    /// Adder `b` input word.
    BInput = 1,
    /// Which sum bit feeds back into the ring (inverted per-bit select).
    SOutputBit = 2,
    /// Which `a`-input bit connects to the external input (inverted select).
    AInputExtBit = 3,
    /// Which `a`-input bit connects to the ring (inverted select).
    AInputRingBit = 4,
    /// Sum observation tap.
    Sum = 5,
}

impl MuxChannel {
    /// All channels, in address order.
    pub const ALL: [Self; 6] = [
        Self::AInput,
        Self::BInput,
        Self::SOutputBit,
        Self::AInputExtBit,
        Self::AInputRingBit,
        Self::Sum,
    ];

    /// 4-bit channel address placed in the bank-1 `REG_SEL` field.
    #[must_use]
    pub const fn code(self) -> u32 {
        self as u32
    }
}
