//! `ringosc` — command-line driver for ring-oscillator measurements.
//!
//! ```text
//! USAGE:
//!   ringosc run [--variant V] [--target N]     Simulated measurement
//!   ringosc hw-run [--variant V] [...]         Measurement over /dev/mem (root)
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use ringosc_chip::{map, DutProfile, Reg, Variant};
use ringosc_driver::{DevMemBus, Firmware, PollBudget, RegisterBus, SimBus};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ringosc", about = "Ring-oscillator DUT measurement driver", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    /// Hard-wired mux routing.
    Fixed,
    /// Addressable mux with write-strobe handshake.
    Addressable,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Fixed => Self::Fixed,
            VariantArg::Addressable => Self::Addressable,
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Run a full measurement against the simulated register bank.
    Run {
        /// DUT revision to drive.
        #[arg(long, value_enum, default_value_t = VariantArg::Addressable)]
        variant: VariantArg,
        /// Counter target loaded into LA bank 2.
        #[arg(long, default_value_t = 100)]
        target: u32,
        /// Polls the simulated commit register stays busy.
        #[arg(long, default_value_t = 2)]
        xfer_busy_reads: u32,
        /// Maximum polling reads per wait before giving up.
        #[arg(long, default_value_t = 100_000)]
        poll_budget: u32,
    },
    /// Run a full measurement over /dev/mem (requires root).
    HwRun {
        /// DUT revision to drive.
        #[arg(long, value_enum, default_value_t = VariantArg::Addressable)]
        variant: VariantArg,
        /// Counter target loaded into LA bank 2.
        #[arg(long, default_value_t = 100)]
        target: u32,
        /// Physical base of the GPIO control block (hex accepted).
        #[arg(long, value_parser = parse_addr, default_value_t = map::GPIO_BASE)]
        gpio_base: usize,
        /// Physical base of the logic-analyzer block (hex accepted).
        #[arg(long, value_parser = parse_addr, default_value_t = map::LA_BASE)]
        la_base: usize,
    },
}

fn parse_addr(s: &str) -> Result<usize, String> {
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    usize::from_str_radix(digits, radix).map_err(|e| format!("invalid address {s:?}: {e}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Cmd::Run {
            variant,
            target,
            xfer_busy_reads,
            poll_budget,
        } => cmd_run(variant.into(), target, xfer_busy_reads, poll_budget),
        Cmd::HwRun {
            variant,
            target,
            gpio_base,
            la_base,
        } => cmd_hw_run(variant.into(), target, gpio_base, la_base),
    }
}

fn cmd_run(variant: Variant, target: u32, xfer_busy_reads: u32, poll_budget: u32) -> Result<()> {
    let profile = DutProfile::from(variant);
    let bus = SimBus::new(profile).with_xfer_busy_reads(xfer_busy_reads);

    let mut fw = Firmware::new(bus, profile)
        .with_counter_target(target)
        .with_poll_budget(PollBudget::Bounded(poll_budget));

    let count = fw.measure()?;
    let datal = fw.bus().peek(Reg::MprjDatal);

    println!("variant      {variant}");
    println!("count        {count}");
    println!("mprj_datal   {datal:#010x}");
    println!("  ready bit  {}", (datal >> profile.fw_ready_bit) & 1);
    println!("  done bit   {}", (datal >> profile.fw_done_bit) & 1);
    println!("  count field {}", datal >> profile.result_shift);
    Ok(())
}

fn cmd_hw_run(variant: Variant, target: u32, gpio_base: usize, la_base: usize) -> Result<()> {
    let profile = DutProfile::from(variant);
    let bus = DevMemBus::open_at(gpio_base, la_base)?;

    // On hardware the done flag is the only completion signal, so the
    // polls stay unbounded.
    let mut fw = Firmware::new(bus, profile).with_counter_target(target);

    tracing::info!(%variant, gpio_base, la_base, "starting hardware measurement");
    let count = fw.measure()?;

    let mut bus = fw.into_bus();
    let datal = bus.read(Reg::MprjDatal)?;
    println!("count        {count}");
    println!("mprj_datal   {datal:#010x}");
    Ok(())
}
