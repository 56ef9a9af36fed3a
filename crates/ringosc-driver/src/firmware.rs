//! Measurement firmware: activation, mux addressing, and the control state
//! machine.
//!
//! The protocol is a fixed sequence of register operations; the only
//! branching is the topology step, which differs between the fixed-mux and
//! addressable-mux DUT revisions. All register state lives behind the
//! injected [`RegisterBus`], never in globals, so several simulated DUTs can
//! run side by side in tests.

use crate::bus::RegisterBus;
use crate::error::{FirmwareError, Result};
use crate::poll::{wait_until, PollBudget};
use ringosc_chip::{
    CtrlWord, DutProfile, LaBank, LaReg, MuxChannel, Reg, DEFAULT_COUNTER_TARGET, PROJECT_ID,
};
use std::time::Duration;
use tracing::{debug, info};

const LA1_DATA: Reg = Reg::La(LaBank::La1, LaReg::Data);

/// Phase of the measurement state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing run yet.
    Idle,
    /// DUT held in reset, ring stopped, extra inverter enabled.
    ResetHold,
    /// Adder taps disconnected, bypass loop selected.
    ConfigureTopology,
    /// Counter target loaded, overlapping reset release.
    ArmCounter,
    /// Ring running and counting window open.
    Run,
    /// Spinning on the done flag.
    AwaitDone,
    /// Count published to the harness. Terminal; no automatic re-arm.
    Report,
}

/// Ring-oscillator measurement firmware over an injected register bus.
#[derive(Debug)]
pub struct Firmware<B: RegisterBus> {
    bus: B,
    profile: DutProfile,
    target: u32,
    budget: PollBudget,
    interval: Duration,
    phase: Phase,
}

impl<B: RegisterBus> Firmware<B> {
    /// Wrap a register bus for the given DUT revision.
    ///
    /// Defaults: counter target 100, unbounded polls, pure spin with no
    /// sleep between reads. Tests should bound the polls.
    pub fn new(bus: B, profile: DutProfile) -> Self {
        Self {
            bus,
            profile,
            target: DEFAULT_COUNTER_TARGET,
            budget: PollBudget::Unbounded,
            interval: Duration::ZERO,
            phase: Phase::Idle,
        }
    }

    /// Override the counter target written in the arm phase.
    #[must_use]
    pub fn with_counter_target(mut self, target: u32) -> Self {
        self.target = target;
        self
    }

    /// Bound every busy-poll to `budget`.
    #[must_use]
    pub fn with_poll_budget(mut self, budget: PollBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Sleep between polling reads instead of pure spinning.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Current state-machine phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Borrow the underlying bus (test inspection).
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Consume the firmware and return the bus.
    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Read-modify-write the bank-1 control word.
    fn modify_ctrl(&mut self, f: impl FnOnce(CtrlWord) -> CtrlWord) -> Result<CtrlWord> {
        let word = f(CtrlWord::from_bits(self.bus.read(LA1_DATA)?));
        self.bus.write(LA1_DATA, word.bits())?;
        Ok(word)
    }

    /// Latch `value` onto one of the DUT's addressable routing channels.
    ///
    /// Replaces the 4-bit channel-address field of the bank-1 control word,
    /// presents `value` on the bank-3 mux data bus, and pulses the write
    /// strobe once. The only observable effect is on DUT-internal routing;
    /// repeating a call with the same arguments is a no-op at the register
    /// level.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareError::MuxNotAddressable`] on the fixed-mux
    /// revision, or any bus error.
    pub fn set_mux(&mut self, channel: MuxChannel, value: u32) -> Result<()> {
        if !self.profile.has_addressable_mux() {
            return Err(FirmwareError::MuxNotAddressable {
                variant: self.profile.variant,
            });
        }
        debug!(?channel, value, "set mux channel");
        let word = self.modify_ctrl(|w| w.with_mux_channel(channel))?;
        self.bus.write(Reg::La(LaBank::La3, LaReg::Data), value)?;
        self.bus.write(LA1_DATA, word.with_mux_write(true).bits())?;
        self.bus.write(LA1_DATA, word.with_mux_write(false).bits())?;
        Ok(())
    }

    /// Bring pads and LA banks into a known, firmware-controlled state.
    ///
    /// Strict order: pad modes → commit + poll → bank-0 enables → decode
    /// slot select → ready handshake → remaining bank enables. Until the
    /// decode slot is selected the DUT sees none of the later writes.
    ///
    /// # Errors
    ///
    /// Returns a bus error, or [`FirmwareError::PollBudgetExhausted`] if the
    /// commit poll is bounded and the transfer never completes.
    pub fn activate(&mut self) -> Result<()> {
        info!(variant = %self.profile.variant, "activating DUT");

        for &(pin, mode) in self.profile.pin_modes {
            self.bus.write(Reg::MprjIo(pin), mode)?;
        }

        self.bus.write(Reg::MprjXfer, 1)?;
        let polls = wait_until(
            &mut self.bus,
            Reg::MprjXfer,
            |v| v == 0,
            self.budget,
            self.interval,
        )?;
        debug!(polls, "pad configuration committed");

        self.bus.write(Reg::La(LaBank::La0, LaReg::Iena), 0)?;
        self.bus.write(Reg::La(LaBank::La0, LaReg::Oenb), 0xFFFF_FFFF)?;

        let la0 = self.bus.read(Reg::La(LaBank::La0, LaReg::Data))?;
        self.bus
            .write(Reg::La(LaBank::La0, LaReg::Data), la0 | (1 << PROJECT_ID))?;

        let datal = self.bus.read(Reg::MprjDatal)?;
        self.bus
            .write(Reg::MprjDatal, datal | (1 << self.profile.fw_ready_bit))?;

        for bank in [LaBank::La1, LaBank::La2, LaBank::La3] {
            self.bus.write(Reg::La(bank, LaReg::Oenb), 0xFFFF_FFFF)?;
            self.bus.write(Reg::La(bank, LaReg::Iena), 0)?;
        }

        info!("DUT active, harness signalled ready");
        Ok(())
    }

    /// Run one full measurement and return the oscillation count.
    ///
    /// Executes `ResetHold → ConfigureTopology → ArmCounter → Run →
    /// AwaitDone → Report`. Terminal: the firmware does not re-arm.
    ///
    /// # Errors
    ///
    /// Returns a bus error, or [`FirmwareError::PollBudgetExhausted`] if the
    /// done-flag poll is bounded and the DUT never completes.
    pub fn run(&mut self) -> Result<u32> {
        self.phase = Phase::ResetHold;
        self.modify_ctrl(|w| w.with_reset(true).with_stop_b(false).with_extra_inv(true))?;

        self.phase = Phase::ConfigureTopology;
        self.configure_topology()?;

        self.phase = Phase::ArmCounter;
        debug!(counter_target = self.target, "arming counter");
        self.bus
            .write(Reg::La(LaBank::La2, LaReg::Data), self.target)?;
        self.modify_ctrl(|w| w.with_counter_load(true))?;
        // The load strobe must overlap reset release so the counter latches
        // in the same transition that frees the DUT.
        self.modify_ctrl(|w| w.with_reset(false))?;
        self.modify_ctrl(|w| w.with_counter_load(false))?;

        self.phase = Phase::Run;
        // One write: the ring starts and the counting window opens on the
        // same DUT clock edge.
        self.modify_ctrl(|w| w.with_stop_b(true).with_counter_en(true))?;

        self.phase = Phase::AwaitDone;
        let done_mask = 1 << self.profile.done_bit;
        let polls = wait_until(
            &mut self.bus,
            Reg::La(LaBank::La1, LaReg::DataIn),
            |v| v & done_mask != 0,
            self.budget,
            self.interval,
        )?;
        debug!(polls, "done flag observed");

        self.phase = Phase::Report;
        let count = self.bus.read(Reg::La(LaBank::La2, LaReg::DataIn))?;
        let datal = self.bus.read(Reg::MprjDatal)?;
        self.bus
            .write(Reg::MprjDatal, datal | (count << self.profile.result_shift))?;
        let datal = self.bus.read(Reg::MprjDatal)?;
        self.bus
            .write(Reg::MprjDatal, datal | (1 << self.profile.fw_done_bit))?;

        info!(count, "measurement reported");
        Ok(count)
    }

    /// Select the ring-through-bypass topology.
    ///
    /// Reproduces the harness's `test_bypass` configuration. Note: under RTL
    /// simulation the bypass ring never resolves from `x` (the first bypass
    /// tristate output stays undefined even with a driven input); the
    /// sequence is kept as documented rather than reworked around it.
    fn configure_topology(&mut self) -> Result<()> {
        if self.profile.has_addressable_mux() {
            // Zero the adder inputs, then force the sum/ring taps to bypass
            // (the per-bit selects are inverted: all-ones disconnects).
            self.set_mux(MuxChannel::AInput, 0)?;
            self.set_mux(MuxChannel::BInput, 0)?;
            self.set_mux(MuxChannel::AInputExtBit, 0)?;
            self.set_mux(MuxChannel::SOutputBit, 0xFFFF_FFFF)?;
            self.set_mux(MuxChannel::AInputRingBit, 0xFFFF_FFFF)?;
        } else {
            self.bus.write(Reg::La(LaBank::La3, LaReg::Data), 0)?;
            self.modify_ctrl(CtrlWord::with_adder_disconnected)?;
        }
        self.modify_ctrl(|w| w.with_control_b(true).with_bypass_b(false))?;
        debug!("bypass topology configured");
        Ok(())
    }

    /// `activate` followed by `run`; the whole firmware main.
    ///
    /// # Errors
    ///
    /// Propagates errors from either step.
    pub fn measure(&mut self) -> Result<u32> {
        self.activate()?;
        self.run()
    }
}
