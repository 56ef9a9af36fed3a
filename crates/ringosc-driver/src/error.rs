//! Error types for firmware operations.

use ringosc_chip::{Reg, Variant};
use thiserror::Error;

/// Result type alias for firmware operations.
pub type Result<T> = std::result::Result<T, FirmwareError>;

/// Errors that can occur while driving the DUT.
///
/// On real hardware the protocol has no recoverable failures — a wrong bit
/// hangs or silently corrupts the count — so most of these only ever surface
/// from bounded test backends or from backend setup.
#[derive(Debug, Error)]
pub enum FirmwareError {
    /// A bounded busy-poll ran out of attempts.
    #[error("poll budget exhausted: {reg} unsatisfied after {attempts} reads")]
    PollBudgetExhausted {
        /// Register that was being polled.
        reg: Reg,
        /// Number of reads performed before giving up.
        attempts: u32,
    },

    /// Firmware attempted to write a DUT-driven register.
    #[error("write to DUT-driven register {reg}")]
    WriteToInput {
        /// The offending register.
        reg: Reg,
    },

    /// `set_mux` was called against a DUT revision without an addressable mux.
    #[error("the {variant} DUT revision has no addressable mux")]
    MuxNotAddressable {
        /// Profile variant in use.
        variant: Variant,
    },

    /// Mapping a register block into the process failed.
    #[error("cannot map register block at {base:#x}: {reason}")]
    MapFailed {
        /// Physical base address of the block.
        base: usize,
        /// Reason for failure.
        reason: String,
    },

    /// I/O error during backend setup.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl FirmwareError {
    /// Create a map-failed error.
    pub fn map_failed(base: usize, reason: impl Into<String>) -> Self {
        Self::MapFailed {
            base,
            reason: reason.into(),
        }
    }
}
