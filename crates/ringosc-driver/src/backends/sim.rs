//! Simulated register bank and DUT model.
//!
//! Implements [`RegisterBus`] over an in-memory register file plus a
//! behavioural model of the DUT, so the full protocol runs in CI with no
//! silicon. The model covers exactly the behaviour the protocol depends on:
//!
//! - the pad-configuration commit register reads 1 for a configurable number
//!   of polls and then clears;
//! - the DUT observes LA writes only once its decode slot is selected
//!   (`PROJECT_ID` set in bank 0) and the bank's output-enable mask is
//!   all-ones;
//! - the counter target latches from bank 2 only when the `COUNTER_LOAD`
//!   pulse overlaps the reset release — releasing reset without the strobe
//!   leaves the counter unloaded and the done flag never fires, reproducing
//!   the real failure mode of a mis-sequenced arm;
//! - the ring oscillator advances one pulse per read of bank-1 `data_in`
//!   while `RESET=0 ∧ STOP_B=1 ∧ COUNTER_EN=1`, so the firmware's own poll
//!   loop is the simulation clock; the done flag trips exactly once when the
//!   pulse count reaches the latched target, and the count is published to
//!   bank-2 `data_in`.
//!
//! Every access is journalled for ordering-invariant assertions in tests.

use crate::bus::RegisterBus;
use crate::error::{FirmwareError, Result};
use ringosc_chip::reg::MPRJ_IO_PADS;
use ringosc_chip::{CtrlWord, DutProfile, LaBank, LaReg, MuxChannel, Reg, PROJECT_ID};
use tracing::{debug, trace, warn};

/// One journalled bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// A register read and the value it returned.
    Read {
        /// Register that was read.
        reg: Reg,
        /// Value returned.
        value: u32,
    },
    /// A register write.
    Write {
        /// Register that was written.
        reg: Reg,
        /// Value written.
        value: u32,
    },
}

/// Firmware-visible state of one LA bank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct BankState {
    data: u32,
    data_in: u32,
    oenb: u32,
    iena: u32,
}

/// Behavioural DUT state, updated on observed bank-1 writes and `data_in`
/// reads.
#[derive(Debug)]
struct DutModel {
    prev_ctrl: CtrlWord,
    /// Target latched at reset release; `None` means stale/garbage and the
    /// done flag will never fire.
    target: Option<u32>,
    running: bool,
    pulses: u32,
    done: bool,
    /// Last value latched onto each addressable mux channel.
    mux: [u32; 6],
}

impl Default for DutModel {
    fn default() -> Self {
        Self {
            prev_ctrl: CtrlWord::default(),
            target: None,
            running: false,
            pulses: 0,
            done: false,
            mux: [0; 6],
        }
    }
}

/// Full register-file snapshot, for state-equality assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    datal: u32,
    xfer: u32,
    banks: [BankState; 4],
    mux: [u32; 6],
}

/// Simulated register bus with an attached DUT model.
#[derive(Debug)]
pub struct SimBus {
    profile: DutProfile,
    io_modes: [u32; MPRJ_IO_PADS as usize],
    datal: u32,
    xfer: u32,
    /// Number of polls the commit register stays busy once triggered.
    xfer_busy_reads: u32,
    xfer_reads_left: u32,
    banks: [BankState; 4],
    dut: DutModel,
    journal: Vec<BusEvent>,
}

impl SimBus {
    /// Create an all-zero register bank for the given DUT revision.
    #[must_use]
    pub fn new(profile: DutProfile) -> Self {
        Self {
            profile,
            io_modes: [0; MPRJ_IO_PADS as usize],
            datal: 0,
            xfer: 0,
            xfer_busy_reads: 2,
            xfer_reads_left: 0,
            banks: [BankState::default(); 4],
            dut: DutModel::default(),
            journal: Vec::new(),
        }
    }

    /// Configure how many polls the commit register stays at 1 after a
    /// commit is triggered.
    #[must_use]
    pub fn with_xfer_busy_reads(mut self, reads: u32) -> Self {
        self.xfer_busy_reads = reads;
        self
    }

    /// Whether the DUT's decode slot is currently selected.
    #[must_use]
    pub fn dut_active(&self) -> bool {
        let la0 = &self.banks[LaBank::La0.index()];
        la0.oenb == 0xFFFF_FFFF && la0.data & (1 << PROJECT_ID) != 0
    }

    fn bank_observed(&self, bank: LaBank) -> bool {
        self.dut_active() && self.banks[bank.index()].oenb == 0xFFFF_FFFF
    }

    /// Last value latched onto an addressable mux channel.
    #[must_use]
    pub fn mux_value(&self, channel: MuxChannel) -> u32 {
        self.dut.mux[channel.code() as usize]
    }

    /// Everything the bus has seen, in order.
    #[must_use]
    pub fn journal(&self) -> &[BusEvent] {
        &self.journal
    }

    /// Values written to `reg`, in order.
    #[must_use]
    pub fn writes_to(&self, reg: Reg) -> Vec<u32> {
        self.journal
            .iter()
            .filter_map(|e| match e {
                BusEvent::Write { reg: r, value } if *r == reg => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Number of reads of `reg` so far.
    #[must_use]
    pub fn read_count(&self, reg: Reg) -> usize {
        self.journal
            .iter()
            .filter(|e| matches!(e, BusEvent::Read { reg: r, .. } if *r == reg))
            .count()
    }

    /// Current value of a register, without side effects or journalling.
    #[must_use]
    pub fn peek(&self, reg: Reg) -> u32 {
        match reg {
            Reg::MprjIo(pin) => self.io_modes[usize::from(pin)],
            Reg::MprjXfer => self.xfer,
            Reg::MprjDatal => self.datal,
            Reg::La(bank, r) => {
                let b = &self.banks[bank.index()];
                match r {
                    LaReg::Data => b.data,
                    LaReg::DataIn => b.data_in,
                    LaReg::Oenb => b.oenb,
                    LaReg::Iena => b.iena,
                }
            }
        }
    }

    /// Snapshot of all DUT-relevant register state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            datal: self.datal,
            xfer: self.xfer,
            banks: self.banks,
            mux: self.dut.mux,
        }
    }

    /// React to an observed bank-1 control-word write.
    fn observe_ctrl(&mut self, value: u32) {
        let w = CtrlWord::from_bits(value);
        let prev = self.dut.prev_ctrl;

        // Reset release: the counter loads only while the load strobe is
        // asserted in the same transition.
        if prev.reset() && !w.reset() {
            self.dut.target = if w.counter_load() {
                Some(self.banks[LaBank::La2.index()].data)
            } else {
                None
            };
            self.dut.pulses = 0;
            self.dut.done = false;
            self.banks[LaBank::La1.index()].data_in &= !(1 << self.profile.done_bit);
            debug!(counter_target = ?self.dut.target, "dut left reset");
        }

        // Mux write strobe: latch (channel, bank-3 data) on the rising edge.
        if self.profile.has_addressable_mux() && w.mux_write() && !prev.mux_write() {
            let code = w.mux_channel_code();
            if let Some(slot) = self.dut.mux.get_mut(code as usize) {
                *slot = self.banks[LaBank::La3.index()].data;
                trace!(code, value = *slot, "mux channel latched");
            } else {
                warn!(code, "mux strobe with out-of-range channel address");
            }
        }

        self.dut.running = !w.reset() && w.stop_b() && w.counter_en();
        self.dut.prev_ctrl = w;
    }

    /// Advance the modelled ring by one pulse. Called once per observation
    /// of bank-1 `data_in`.
    fn tick(&mut self) {
        if !self.dut.running || self.dut.done {
            return;
        }
        let Some(target) = self.dut.target else {
            // Unloaded counter: the ring oscillates but done never fires.
            return;
        };
        if self.dut.pulses < target {
            self.dut.pulses += 1;
        }
        if self.dut.pulses >= target {
            self.dut.done = true;
            self.banks[LaBank::La1.index()].data_in |= 1 << self.profile.done_bit;
            self.banks[LaBank::La2.index()].data_in = self.dut.pulses;
            debug!(pulses = self.dut.pulses, "dut done flag raised");
        }
    }
}

impl RegisterBus for SimBus {
    fn read(&mut self, reg: Reg) -> Result<u32> {
        let value = match reg {
            Reg::MprjXfer => {
                if self.xfer == 1 {
                    if self.xfer_reads_left > 0 {
                        self.xfer_reads_left -= 1;
                    } else {
                        self.xfer = 0;
                    }
                }
                self.xfer
            }
            Reg::La(LaBank::La1, LaReg::DataIn) => {
                self.tick();
                self.banks[LaBank::La1.index()].data_in
            }
            other => self.peek(other),
        };
        self.journal.push(BusEvent::Read { reg, value });
        Ok(value)
    }

    fn write(&mut self, reg: Reg, value: u32) -> Result<()> {
        if reg.is_input() {
            return Err(FirmwareError::WriteToInput { reg });
        }
        self.journal.push(BusEvent::Write { reg, value });

        match reg {
            Reg::MprjIo(pin) => {
                self.io_modes[usize::from(pin)] = value;
            }
            Reg::MprjXfer => {
                self.xfer = value;
                if value == 1 {
                    self.xfer_reads_left = self.xfer_busy_reads;
                }
            }
            Reg::MprjDatal => {
                self.datal = value;
            }
            Reg::La(bank, r) => {
                {
                    let b = &mut self.banks[bank.index()];
                    match r {
                        LaReg::Data => b.data = value,
                        LaReg::Oenb => b.oenb = value,
                        LaReg::Iena => b.iena = value,
                        LaReg::DataIn => unreachable!("rejected above"),
                    }
                }
                if bank == LaBank::La1 && r == LaReg::Data && self.bank_observed(LaBank::La1) {
                    self.observe_ctrl(value);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed_bus() -> SimBus {
        let mut bus = SimBus::new(DutProfile::addressable());
        bus.write(Reg::La(LaBank::La0, LaReg::Oenb), 0xFFFF_FFFF).unwrap();
        bus.write(Reg::La(LaBank::La0, LaReg::Data), 1 << PROJECT_ID).unwrap();
        bus.write(Reg::La(LaBank::La1, LaReg::Oenb), 0xFFFF_FFFF).unwrap();
        bus
    }

    #[test]
    fn xfer_stays_busy_for_configured_reads() {
        let mut bus = SimBus::new(DutProfile::fixed()).with_xfer_busy_reads(3);
        bus.write(Reg::MprjXfer, 1).unwrap();
        assert_eq!(bus.read(Reg::MprjXfer).unwrap(), 1);
        assert_eq!(bus.read(Reg::MprjXfer).unwrap(), 1);
        assert_eq!(bus.read(Reg::MprjXfer).unwrap(), 1);
        assert_eq!(bus.read(Reg::MprjXfer).unwrap(), 0);
    }

    #[test]
    fn dut_ignores_ctrl_until_project_selected() {
        let mut bus = SimBus::new(DutProfile::addressable());
        bus.write(Reg::La(LaBank::La1, LaReg::Oenb), 0xFFFF_FFFF).unwrap();
        let run = CtrlWord::default()
            .with_stop_b(true)
            .with_counter_en(true)
            .bits();
        bus.write(Reg::La(LaBank::La1, LaReg::Data), run).unwrap();
        assert!(!bus.dut.running, "inactive DUT must not observe control bits");
    }

    #[test]
    fn reset_release_without_load_leaves_counter_stale() {
        let mut bus = observed_bus();
        let held = CtrlWord::default().with_reset(true);
        bus.write(Reg::La(LaBank::La1, LaReg::Data), held.bits()).unwrap();
        bus.write(Reg::La(LaBank::La2, LaReg::Data), 10).unwrap();
        // Release reset with no COUNTER_LOAD overlap.
        let released = held.with_reset(false).with_stop_b(true).with_counter_en(true);
        bus.write(Reg::La(LaBank::La1, LaReg::Data), released.bits()).unwrap();
        for _ in 0..100 {
            let v = bus.read(Reg::La(LaBank::La1, LaReg::DataIn)).unwrap();
            assert_eq!(v, 0, "done must never fire from a stale counter");
        }
    }

    #[test]
    fn writes_to_data_in_are_rejected() {
        let mut bus = SimBus::new(DutProfile::fixed());
        let err = bus
            .write(Reg::La(LaBank::La2, LaReg::DataIn), 1)
            .unwrap_err();
        assert!(matches!(err, FirmwareError::WriteToInput { .. }));
    }

    #[test]
    fn done_fires_exactly_once_per_run() {
        let mut bus = observed_bus();
        let held = CtrlWord::default().with_reset(true);
        bus.write(Reg::La(LaBank::La1, LaReg::Data), held.bits()).unwrap();
        bus.write(Reg::La(LaBank::La2, LaReg::Data), 3).unwrap();
        let loaded = held.with_counter_load(true);
        bus.write(Reg::La(LaBank::La1, LaReg::Data), loaded.bits()).unwrap();
        let released = loaded.with_reset(false);
        bus.write(Reg::La(LaBank::La1, LaReg::Data), released.bits()).unwrap();
        let run = released
            .with_counter_load(false)
            .with_stop_b(true)
            .with_counter_en(true);
        bus.write(Reg::La(LaBank::La1, LaReg::Data), run.bits()).unwrap();

        let mut transitions = 0;
        let mut prev = 0;
        for _ in 0..10 {
            let v = bus.read(Reg::La(LaBank::La1, LaReg::DataIn)).unwrap() & 1;
            if prev == 0 && v == 1 {
                transitions += 1;
            }
            prev = v;
        }
        assert_eq!(transitions, 1);
        assert_eq!(bus.peek(Reg::La(LaBank::La2, LaReg::DataIn)), 3);
    }
}
