//! Bounded spin-wait over a register predicate.
//!
//! Both blocking points in the protocol (the pad-configuration commit and the
//! measurement done flag) are busy-polls with no hardware-side timeout. On
//! real hardware the correct behaviour is to spin forever — the firmware has
//! nothing else to do — but test backends must be able to bound the wait so a
//! mis-sequenced protocol fails instead of hanging the test runner.

use crate::bus::RegisterBus;
use crate::error::{FirmwareError, Result};
use ringosc_chip::Reg;
use std::time::Duration;

/// How many polling reads a wait may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollBudget {
    /// Spin until the predicate holds. Hardware default.
    Unbounded,
    /// Give up after this many reads. Test backends.
    Bounded(u32),
}

/// Poll `reg` until `pred` accepts its value.
///
/// Returns the number of reads performed (at least 1). Sleeps `interval`
/// between reads when non-zero; a zero interval is a pure spin.
///
/// # Errors
///
/// Returns [`FirmwareError::PollBudgetExhausted`] if a bounded budget runs
/// out, or any bus error from the underlying reads.
pub fn wait_until<B>(
    bus: &mut B,
    reg: Reg,
    mut pred: impl FnMut(u32) -> bool,
    budget: PollBudget,
    interval: Duration,
) -> Result<u32>
where
    B: RegisterBus + ?Sized,
{
    let mut reads: u32 = 0;
    loop {
        let value = bus.read(reg)?;
        reads += 1;
        if pred(value) {
            tracing::trace!(%reg, reads, value, "wait satisfied");
            return Ok(reads);
        }
        if let PollBudget::Bounded(max) = budget {
            if reads >= max {
                tracing::warn!(%reg, reads, "poll budget exhausted");
                return Err(FirmwareError::PollBudgetExhausted { reg, attempts: reads });
            }
        }
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }
}
