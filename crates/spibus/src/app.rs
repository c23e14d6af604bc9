//! Host-side drivers used by the `spibus` binary.
use anyhow::{bail, Result};
use spibus_common::{Key, KeyEvent, Modifiers};

use crate::bus::{BusStats, SpiBus};
use crate::config::BusConfig;
use crate::device::Device;
use crate::devices::Keyboard;
use crate::master::SoftSpiMaster;
use crate::via::{ShiftLatch, ShiftRegister};

/// Outcome of replaying a recorded trace.
#[derive(Debug, Clone)]
pub struct ReplaySummary {
    pub stats: BusStats,
    pub initialized: bool,
    pub out_bytes: Vec<(Device, u8)>,
    /// Byte left in the outgoing register when the trace ended.
    pub out_byte: u8,
}

/// Shift register sink that remembers every byte loaded into it.
#[derive(Default)]
struct Capture {
    bytes: Vec<u8>,
}

impl ShiftRegister for Capture {
    fn set_out_byte(&mut self, value: u8) {
        self.bytes.push(value);
    }
}

/// Feed `samples` through a fresh bus with an empty SD slot.
pub fn replay(config: BusConfig, samples: &[u8]) -> ReplaySummary {
    let mut bus: SpiBus = SpiBus::new(config, Default::default(), Default::default());
    let mut capture = Capture::default();
    let mut out_bytes = Vec::new();

    for &sample in samples {
        bus.step(sample, &mut capture);
        if let (Some(byte), Some(device)) = (capture.bytes.pop(), bus.selected()) {
            log::info!("{:?} -> 0x{:02X}", device, byte);
            out_bytes.push((device, byte));
        }
    }

    ReplaySummary {
        stats: bus.stats(),
        initialized: bus.is_initialized(),
        out_bytes,
        out_byte: bus.out_byte(),
    }
}

/// What the bus master read back during [`demo`].
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub typed: Vec<u8>,
    pub rtc: [u8; 7],
}

fn transfer(bus: &mut SpiBus, via: &mut ShiftLatch, master: &mut SoftSpiMaster, byte: u8) -> u8 {
    master.write_byte(byte);
    for sample in master.drain() {
        via.set_port_b(sample);
        bus.tick(via);
    }
    via.shift_register()
}

/// Type `text` on the host keyboard and read it back over the bus the way
/// the KERNAL would, then read the clock.
pub fn demo(text: &str) -> Result<DemoReport> {
    let config = BusConfig::default();
    let mut master = SoftSpiMaster::new(config.select_polarity);
    let mut bus: SpiBus = SpiBus::new(config, Default::default(), Default::default());
    let mut via = ShiftLatch::default();

    master.clock_idle(bus.config().handshake_edges);
    for sample in master.drain() {
        via.set_port_b(sample);
        bus.tick(&mut via);
    }
    if !bus.is_initialized() {
        bail!("bus did not come out of the power-on handshake");
    }

    master.select(Some(Device::Keyboard));
    let mut typed = Vec::with_capacity(text.len());
    for c in text.chars() {
        let Some((key, shift)) = Key::from_char(c) else {
            log::warn!("demo: no key for {:?}, skipped", c);
            continue;
        };
        let modifiers = if shift {
            Modifiers::SHIFT
        } else {
            Modifiers::empty()
        };
        bus.handle_key_event(KeyEvent::press(key, modifiers));
        bus.handle_key_event(KeyEvent::release(key, modifiers));
        typed.push(transfer(&mut bus, &mut via, &mut master, 0x00));
    }

    // Drained keyboard must answer "no key".
    let idle = transfer(&mut bus, &mut via, &mut master, 0x00);
    if idle != Keyboard::NO_KEY {
        bail!("keyboard still had 0x{:02X} pending", idle);
    }

    master.select(None).select(Some(Device::Rtc));
    transfer(&mut bus, &mut via, &mut master, 0x00);
    let mut rtc = [0u8; 7];
    for reg in rtc.iter_mut() {
        *reg = transfer(&mut bus, &mut via, &mut master, 0xFF);
    }
    master.select(None);
    for sample in master.drain() {
        via.set_port_b(sample);
        bus.tick(&mut via);
    }

    Ok(DemoReport { typed, rtc })
}
