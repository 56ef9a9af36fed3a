//! Test firmware for the ring-oscillator instrumented-adder DUT.
//!
//! Drives an on-chip ring-oscillator measurement circuit through the
//! memory-mapped logic-analyzer control bus and reports the oscillation
//! count back to the external test harness over the GPIO data word.
//!
//! # Backend hierarchy
//!
//! ```text
//! Hardware:
//!   DevMemBus — /dev/mem MMIO over the management wishbone
//!
//! Development / CI:
//!   SimBus    — in-memory register bank with a behavioural DUT model
//! ```
//!
//! # Quick start
//!
//! ```
//! use ringosc_chip::DutProfile;
//! use ringosc_driver::{Firmware, PollBudget, SimBus};
//!
//! # fn main() -> ringosc_driver::Result<()> {
//! let bus = SimBus::new(DutProfile::addressable());
//! let mut fw = Firmware::new(bus, DutProfile::addressable())
//!     .with_poll_budget(PollBudget::Bounded(1_000));
//!
//! let count = fw.measure()?;
//! assert_eq!(count, 100);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod backends;
mod bus;
mod error;
mod firmware;
mod poll;

pub use backends::{BusEvent, DevMemBus, SimBus};
pub use bus::RegisterBus;
pub use error::{FirmwareError, Result};
pub use firmware::{Firmware, Phase};
pub use poll::{wait_until, PollBudget};

/// Commonly used types.
pub mod prelude {
    pub use crate::{Firmware, FirmwareError, Phase, PollBudget, RegisterBus, Result, SimBus};
    pub use ringosc_chip::{CtrlWord, DutProfile, MuxChannel, Reg, Variant};
}
