//! Register bus backends.
//!
//! Two backends implement [`crate::RegisterBus`]:
//! - **Sim**: in-memory register bank with a behavioural DUT model, used by
//!   every test and by the default CLI path;
//! - **DevMem**: `/dev/mem` volatile MMIO for the real management wishbone.

pub mod devmem;
pub mod sim;

pub use devmem::DevMemBus;
pub use sim::{BusEvent, SimBus};
