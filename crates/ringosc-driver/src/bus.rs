//! Register bus abstraction.
//!
//! The protocol core never touches hardware directly; it goes through a
//! [`RegisterBus`] handed to it at construction. That keeps register state an
//! explicit injected object (multiple simulated DUTs can coexist in tests)
//! and lets the same protocol code run against `/dev/mem` or a simulation.

use crate::error::Result;
use ringosc_chip::Reg;
use std::fmt::Debug;

/// Named 32-bit register file, as seen by the firmware.
///
/// Writes take effect synchronously from the firmware's point of view; the
/// one asynchronous register (`mprj_xfer`) is handled by polling it back, not
/// by an acknowledgement from the bus.
///
/// `read` takes `&mut self` because reads have side effects on both real
/// hardware (DUT-driven inputs advance) and the simulation (the modelled DUT
/// steps once per observation).
pub trait RegisterBus: Debug {
    /// Read a named 32-bit register.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot reach the register.
    fn read(&mut self, reg: Reg) -> Result<u32>;

    /// Write a named 32-bit register.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FirmwareError::WriteToInput`] for DUT-driven
    /// registers, or a backend error if the access fails.
    fn write(&mut self, reg: Reg, value: u32) -> Result<()>;
}
