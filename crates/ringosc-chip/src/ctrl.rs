//! LA bank-1 control word.
//!
//! Bank 1 carries the DUT's input control pins. Bits 0–6 are common to both
//! firmware variants; bits 7–12 exist only on the addressable-mux DUT.
//! `_B`-suffixed pins are active-low.

use crate::mux::MuxChannel;

/// Control-pin bit indices within LA bank-1 data.
pub mod pin {
    /// Hold the DUT in reset (active high).
    pub const RESET: u32 = 0;
    /// Ring-oscillator run gate; low stops the ring.
    pub const STOP_B: u32 = 1;
    /// Insert the extra inversion stage into the loop.
    pub const EXTRA_INV: u32 = 2;
    /// Bypass-loop select; low routes the ring through the bypass path.
    pub const BYPASS_B: u32 = 3;
    /// Control-loop select; high disconnects the adder-in-loop path.
    pub const CONTROL_B: u32 = 4;
    /// Counting-window enable.
    pub const COUNTER_EN: u32 = 5;
    /// Counter target load strobe.
    pub const COUNTER_LOAD: u32 = 6;

    // Addressable-mux variant only.

    /// Force the counter clock (debug aid, addressable variant).
    pub const COUNT_FORCE: u32 = 7;
    /// Mux write strobe; a 0→1→0 pulse latches the addressed channel.
    pub const MUX_WRITE: u32 = 8;
    /// Low bit of the 4-bit mux channel-address field.
    pub const REG_SEL_0: u32 = 9;
}

/// Mask of the 4-bit mux channel-address field (bits 9..=12).
pub const REG_SEL_MASK: u32 = 0x1E00;
/// Shift of the channel-address field.
pub const REG_SEL_SHIFT: u32 = pin::REG_SEL_0;

/// Fixed-variant topology literal: inverted per-bit adder-tap selects OR'd
/// into bank 1 to disconnect the sum/ring taps. The shift truncates to
/// `0xFFFF_0000` in 32 bits; that truncated value is what the DUT was ever
/// driven with, so it is preserved verbatim.
pub const ADDER_DISCONNECT: u32 = 0x00FF_FF00 << 8;

/// Typed view of the LA bank-1 control word.
///
/// Named accessors replace raw shift/mask manipulation while preserving the
/// exact bit positions above. `with_*` methods return the modified word so
/// several pins can change in one register write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CtrlWord(u32);

impl CtrlWord {
    /// Wrap a raw register value.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw register value.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    const fn with_bit(self, bit: u32, on: bool) -> Self {
        if on {
            Self(self.0 | (1 << bit))
        } else {
            Self(self.0 & !(1 << bit))
        }
    }

    const fn bit(self, bit: u32) -> bool {
        self.0 & (1 << bit) != 0
    }

    /// Set or clear the DUT reset pin.
    #[must_use]
    pub const fn with_reset(self, on: bool) -> Self {
        self.with_bit(pin::RESET, on)
    }

    /// Reset pin state.
    #[must_use]
    pub const fn reset(self) -> bool {
        self.bit(pin::RESET)
    }

    /// Set or clear the (active-low) ring run gate. `true` lets the ring run.
    #[must_use]
    pub const fn with_stop_b(self, on: bool) -> Self {
        self.with_bit(pin::STOP_B, on)
    }

    /// Ring run gate state.
    #[must_use]
    pub const fn stop_b(self) -> bool {
        self.bit(pin::STOP_B)
    }

    /// Enable the extra inversion stage.
    #[must_use]
    pub const fn with_extra_inv(self, on: bool) -> Self {
        self.with_bit(pin::EXTRA_INV, on)
    }

    /// Bypass-loop select (active low: `false` selects the bypass path).
    #[must_use]
    pub const fn with_bypass_b(self, on: bool) -> Self {
        self.with_bit(pin::BYPASS_B, on)
    }

    /// Control-loop select (`true` disconnects the adder loop).
    #[must_use]
    pub const fn with_control_b(self, on: bool) -> Self {
        self.with_bit(pin::CONTROL_B, on)
    }

    /// Counting-window enable.
    #[must_use]
    pub const fn with_counter_en(self, on: bool) -> Self {
        self.with_bit(pin::COUNTER_EN, on)
    }

    /// Counting-window enable state.
    #[must_use]
    pub const fn counter_en(self) -> bool {
        self.bit(pin::COUNTER_EN)
    }

    /// Counter target load strobe.
    #[must_use]
    pub const fn with_counter_load(self, on: bool) -> Self {
        self.with_bit(pin::COUNTER_LOAD, on)
    }

    /// Counter target load strobe state.
    #[must_use]
    pub const fn counter_load(self) -> bool {
        self.bit(pin::COUNTER_LOAD)
    }

    /// Mux write strobe (addressable variant).
    #[must_use]
    pub const fn with_mux_write(self, on: bool) -> Self {
        self.with_bit(pin::MUX_WRITE, on)
    }

    /// Mux write strobe state.
    #[must_use]
    pub const fn mux_write(self) -> bool {
        self.bit(pin::MUX_WRITE)
    }

    /// Replace the 4-bit mux channel-address field with `channel`.
    #[must_use]
    pub const fn with_mux_channel(self, channel: MuxChannel) -> Self {
        Self((self.0 & !REG_SEL_MASK) | ((channel.code() << REG_SEL_SHIFT) & REG_SEL_MASK))
    }

    /// Current value of the channel-address field.
    #[must_use]
    pub const fn mux_channel_code(self) -> u32 {
        (self.0 & REG_SEL_MASK) >> REG_SEL_SHIFT
    }

    /// OR the fixed-variant adder-disconnect literal into the word.
    #[must_use]
    pub const fn with_adder_disconnected(self) -> Self {
        Self(self.0 | ADDER_DISCONNECT)
    }
}
