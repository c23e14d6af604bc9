use spibus_common::KeyEvent;

use crate::config::BusConfig;
use crate::device::{Device, SpiDevice};
use crate::devices::{Keyboard, NoCard, Rtc};
use crate::edge::EdgeDetector;
use crate::framer::BitFramer;
use crate::handshake::{Handshake, HandshakeEdge};
use crate::port::BusSample;
use crate::select::DeviceSelector;
use crate::via::{ShiftRegister, ViaPort};

/// Counters kept for diagnostics; they do not influence decoding.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BusStats {
    pub samples: u64,
    pub rising_edges: u64,
    pub bytes_exchanged: u64,
}

/// Decoder state carried from one port snapshot to the next.
struct BusState {
    edge: EdgeDetector,
    selector: DeviceSelector,
    handshake: Handshake,
    framer: BitFramer,
    out_byte: u8,
    stats: BusStats,
}

impl BusState {
    fn new(config: &BusConfig) -> Self {
        Self {
            edge: EdgeDetector::default(),
            selector: DeviceSelector::new(config.select_polarity),
            handshake: Handshake::new(config.handshake_edges),
            framer: BitFramer::default(),
            out_byte: 0xFF,
            stats: BusStats::default(),
        }
    }
}

/// SPI bus shared by the SD card, keyboard and RTC.
///
/// The bus is driven purely by port snapshots: call [`SpiBus::step`] (or
/// [`SpiBus::tick`]) once per emulated cycle with the current port B
/// levels. Clock edges, chip-select changes and byte boundaries are all
/// reconstructed from the sequence of snapshots.
pub struct SpiBus<S = NoCard, R = Rtc> {
    config: BusConfig,
    state: BusState,
    sdcard: S,
    keyboard: Keyboard,
    rtc: R,
}

impl<S: SpiDevice + Default, R: SpiDevice + Default> Default for SpiBus<S, R> {
    fn default() -> Self {
        Self::new(BusConfig::default(), S::default(), R::default())
    }
}

impl<S: SpiDevice, R: SpiDevice> SpiBus<S, R> {
    pub fn new(config: BusConfig, sdcard: S, rtc: R) -> Self {
        Self {
            state: BusState::new(&config),
            config,
            sdcard,
            keyboard: Keyboard::new(),
            rtc,
        }
    }

    /// Back to the power-on state: the handshake has to be clocked again
    /// and no device is selected. Devices keep their own state.
    pub fn reset(&mut self) {
        self.state = BusState::new(&self.config);
    }

    /// Read port B from the VIA and process it.
    pub fn tick(&mut self, via: &mut impl ViaPort) {
        let port = via.port_b();
        self.step(port, via);
    }

    /// Process one port snapshot. A completed byte exchange is pushed to
    /// `out` before this returns.
    pub fn step(&mut self, sample: impl Into<BusSample>, out: &mut impl ShiftRegister) {
        let sample = sample.into();
        self.state.stats.samples += 1;

        let rising = self.state.edge.sample(sample.clock());
        self.update_selection(sample);

        if !rising {
            return;
        }
        self.state.stats.rising_edges += 1;

        match self.state.handshake.on_rising_edge() {
            HandshakeEdge::Passed => {}
            HandshakeEdge::Consumed => return,
            HandshakeEdge::Completed => {
                log::info!(
                    "SPI: power-on handshake complete after {} clocks",
                    self.state.handshake.edges()
                );
                self.state.framer.reset();
                self.sdcard.select();
                return;
            }
        }

        let Some(device) = self.state.selector.current() else {
            return;
        };
        let Some(byte_in) = self.state.framer.push(sample.mosi()) else {
            return;
        };

        let byte_out = self.exchange(device, byte_in);
        log::trace!("SPI: {:?} 0x{:02X} -> 0x{:02X}", device, byte_in, byte_out);
        self.state.out_byte = byte_out;
        self.state.stats.bytes_exchanged += 1;
        out.set_out_byte(byte_out);
    }

    fn update_selection(&mut self, sample: BusSample) {
        let change = self.state.selector.update(sample);
        if !change.changed {
            return;
        }

        log::debug!("SPI: select {:?} -> {:?}", change.deselected, change.selected);
        self.state.framer.reset();

        // Only the RTC is told when it loses the bus. The SD card tracks
        // its own command state across chip-select changes.
        if change.deselected == Some(Device::Rtc) {
            self.rtc.deselect();
        }
        if let Some(device) = change.selected {
            match device {
                Device::SdCard => self.sdcard.select(),
                Device::Keyboard => self.keyboard.select(),
                Device::Rtc => self.rtc.select(),
            }
        }
    }

    fn exchange(&mut self, device: Device, byte_in: u8) -> u8 {
        match device {
            Device::SdCard => self.sdcard.exchange(byte_in),
            Device::Keyboard => self.keyboard.exchange(byte_in),
            Device::Rtc => self.rtc.exchange(byte_in),
        }
    }

    /// Forward a host key event to the keyboard controller.
    pub fn handle_key_event(&mut self, event: KeyEvent) {
        self.keyboard.handle_key_event(event);
    }

    pub fn is_initialized(&self) -> bool {
        self.state.handshake.is_initialized()
    }

    /// Rising edges counted by the power-on handshake so far.
    pub fn handshake_edges_seen(&self) -> u32 {
        self.state.handshake.edges()
    }

    pub fn selected(&self) -> Option<Device> {
        self.state.selector.current()
    }

    /// Last byte a device answered with.
    pub fn out_byte(&self) -> u8 {
        self.state.out_byte
    }

    /// Bits received towards the next byte.
    pub fn bit_count(&self) -> u8 {
        self.state.framer.bit_count()
    }

    pub fn stats(&self) -> BusStats {
        self.state.stats
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    pub fn sdcard(&self) -> &S {
        &self.sdcard
    }

    pub fn sdcard_mut(&mut self) -> &mut S {
        &mut self.sdcard
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    pub fn rtc(&self) -> &R {
        &self.rtc
    }

    pub fn rtc_mut(&mut self) -> &mut R {
        &mut self.rtc
    }
}

#[cfg(test)]
mod tests;
