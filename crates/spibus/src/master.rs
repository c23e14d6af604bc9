//! Port-level SPI master, producing the port B levels a bit-banging driver
//! writes.
//!
//! Mode 0 framing: MOSI changes while the clock is low and is sampled by
//! the device on the rising edge. Each operation appends snapshots; feed
//! them to [`SpiBus::step`](crate::SpiBus::step) in order.
use crate::config::SelectPolarity;
use crate::device::Device;
use crate::port::PortPins;

#[derive(Debug, Clone, Default)]
pub struct SoftSpiMaster {
    polarity: SelectPolarity,
    selected: Option<Device>,
    clock: bool,
    samples: Vec<u8>,
}

impl SoftSpiMaster {
    pub fn new(polarity: SelectPolarity) -> Self {
        Self {
            polarity,
            ..Self::default()
        }
    }

    fn select_line(device: Device) -> PortPins {
        match device {
            Device::SdCard => PortPins::SS_SDCARD,
            Device::Keyboard => PortPins::SS_KEYBOARD,
            Device::Rtc => PortPins::SS_RTC,
        }
    }

    fn port(&self, clock: bool, mosi: bool) -> u8 {
        let mut pins = match self.polarity {
            SelectPolarity::ActiveLow => PortPins::SELECT_LINES,
            SelectPolarity::ActiveHigh => PortPins::empty(),
        };
        if let Some(device) = self.selected {
            pins.toggle(Self::select_line(device));
        }
        pins.set(PortPins::CLK, clock);
        pins.set(PortPins::MOSI, mosi);
        pins.bits()
    }

    fn push(&mut self, clock: bool, mosi: bool) {
        self.clock = clock;
        let sample = self.port(clock, mosi);
        self.samples.push(sample);
    }

    /// Change the chip-select lines, leaving the clock where it is.
    pub fn select(&mut self, device: Option<Device>) -> &mut Self {
        self.selected = device;
        self.push(self.clock, true);
        self
    }

    /// `count` full clock pulses with MOSI held high.
    pub fn clock_idle(&mut self, count: u32) -> &mut Self {
        for _ in 0..count {
            self.push(false, true);
            self.push(true, true);
        }
        self
    }

    /// Shift out one byte, most significant bit first.
    pub fn write_byte(&mut self, byte: u8) -> &mut Self {
        for i in (0..8).rev() {
            let bit = (byte >> i) & 1 != 0;
            self.push(false, bit);
            self.push(true, bit);
        }
        self
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        for &b in bytes {
            self.write_byte(b);
        }
        self
    }

    /// Repeat the current port level `count` times, as a driver polling
    /// without changing anything would.
    pub fn hold(&mut self, count: usize) -> &mut Self {
        if let Some(&last) = self.samples.last() {
            self.samples.extend(std::iter::repeat(last).take(count));
        }
        self
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Take the snapshots generated so far.
    pub fn drain(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.samples)
    }
}
