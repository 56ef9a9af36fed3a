//! Register-level model of the ring-oscillator instrumented-adder DUT.
//!
//! This crate has **no dependencies** and **no hardware access** — it is a
//! pure model of the test chip as seen from the management core: register
//! names, the wishbone memory map, logic-analyzer control bits, GPIO pin
//! modes, and the two firmware variant profiles.
//!
//! Every constant here must match the DUT and the external test harness
//! exactly; getting one bit index wrong produces a plausible but meaningless
//! oscillation count rather than an error.
//!
//! # Crate organisation
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`reg`] | Register namespace — every 32-bit port the firmware touches |
//! | [`map`] | Management-wishbone memory map for the MMIO backend |
//! | [`gpio`] | Pad-mode encodings and harness handshake bits |
//! | [`ctrl`] | LA bank-1 control-pin bits and the [`ctrl::CtrlWord`] bitfield |
//! | [`mux`] | Addressable signal-routing channels inside the DUT |
//! | [`profile`] | Per-variant constant bundles (fixed vs addressable mux) |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod ctrl;
pub mod gpio;
pub mod map;
pub mod mux;
pub mod profile;
pub mod reg;

pub use ctrl::CtrlWord;
pub use mux::MuxChannel;
pub use profile::{DutProfile, Variant};
pub use reg::{LaBank, LaReg, Reg};

/// LA bank-0 data bit that activates the DUT's project decode slot.
///
/// Until this bit is set every other LA write is invisible to the DUT.
pub const PROJECT_ID: u32 = 3;

/// Counter target loaded into LA bank 2 for a standard measurement window.
pub const DEFAULT_COUNTER_TARGET: u32 = 100;
