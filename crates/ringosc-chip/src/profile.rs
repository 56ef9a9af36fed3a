//! Firmware variant profiles.
//!
//! Two DUT revisions exist. They speak the same measurement protocol but
//! differ in how the internal routing mux is addressed and where the done
//! flag, handshake bits, and result field sit. A [`DutProfile`] bundles all
//! per-variant constants so the protocol core can stay variant-agnostic.

use crate::gpio;

/// Which DUT revision the firmware is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Hard-wired mux routing; topology configured by a literal bit pattern.
    Fixed,
    /// Generic addressable mux with a write-strobe handshake.
    Addressable,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Addressable => write!(f, "addressable"),
        }
    }
}

/// Per-variant constant bundle.
#[derive(Debug, Clone, Copy)]
pub struct DutProfile {
    /// Which revision this profile describes.
    pub variant: Variant,
    /// Pad mode table: `(pin, mode)` pairs programmed before commit.
    pub pin_modes: &'static [(u8, u32)],
    /// Done-flag bit index within LA bank-1 `data_in`.
    pub done_bit: u32,
    /// "Firmware ready" handshake bit in `mprj_datal`.
    pub fw_ready_bit: u32,
    /// "Firmware done" handshake bit in `mprj_datal`.
    pub fw_done_bit: u32,
    /// Left shift applied to the count before it lands in `mprj_datal`.
    pub result_shift: u32,
}

/// Fixed-variant pad table: ready, done, then eight counter-out pads, all
/// management-driven.
const FIXED_PINS: &[(u8, u32)] = &[
    (8, gpio::MGMT_STD_OUTPUT),
    (9, gpio::MGMT_STD_OUTPUT),
    (10, gpio::MGMT_STD_OUTPUT),
    (11, gpio::MGMT_STD_OUTPUT),
    (12, gpio::MGMT_STD_OUTPUT),
    (13, gpio::MGMT_STD_OUTPUT),
    (14, gpio::MGMT_STD_OUTPUT),
    (15, gpio::MGMT_STD_OUTPUT),
    (16, gpio::MGMT_STD_OUTPUT),
    (17, gpio::MGMT_STD_OUTPUT),
];

/// Addressable-variant pad table: stop / ring-out / done are user-driven so
/// the DUT can expose them directly; handshake and counter-out pads are
/// management-driven.
const ADDRESSABLE_PINS: &[(u8, u32)] = &[
    (8, gpio::USER_STD_OUTPUT),
    (9, gpio::USER_STD_OUTPUT),
    (10, gpio::USER_STD_OUTPUT),
    (11, gpio::MGMT_STD_OUTPUT),
    (12, gpio::MGMT_STD_OUTPUT),
    (13, gpio::MGMT_STD_OUTPUT),
    (14, gpio::MGMT_STD_OUTPUT),
    (15, gpio::MGMT_STD_OUTPUT),
    (16, gpio::MGMT_STD_OUTPUT),
    (17, gpio::MGMT_STD_OUTPUT),
    (18, gpio::MGMT_STD_OUTPUT),
    (19, gpio::MGMT_STD_OUTPUT),
    (20, gpio::MGMT_STD_OUTPUT),
];

impl DutProfile {
    /// Profile for the fixed-mux DUT revision.
    #[must_use]
    pub const fn fixed() -> Self {
        Self {
            variant: Variant::Fixed,
            pin_modes: FIXED_PINS,
            done_bit: 8,
            fw_ready_bit: 8,
            fw_done_bit: 9,
            result_shift: 10,
        }
    }

    /// Profile for the addressable-mux DUT revision.
    #[must_use]
    pub const fn addressable() -> Self {
        Self {
            variant: Variant::Addressable,
            pin_modes: ADDRESSABLE_PINS,
            done_bit: 0,
            fw_ready_bit: 11,
            fw_done_bit: 12,
            result_shift: 13,
        }
    }

    /// Whether the DUT's routing mux is addressable via `set_mux`.
    #[must_use]
    pub const fn has_addressable_mux(&self) -> bool {
        matches!(self.variant, Variant::Addressable)
    }
}

impl From<Variant> for DutProfile {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Fixed => Self::fixed(),
            Variant::Addressable => Self::addressable(),
        }
    }
}
