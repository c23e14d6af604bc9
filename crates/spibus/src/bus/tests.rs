use chrono::NaiveDate;
use spibus_common::{Key, KeyEvent, Modifiers};

use super::SpiBus;
use crate::config::{BusConfig, SelectPolarity};
use crate::device::{Device, SpiDevice};
use crate::devices::{Keyboard, NoCard, Rtc, RtcClock};
use crate::master::SoftSpiMaster;
use crate::via::ShiftLatch;

/// Device double that records every call made by the bus.
#[derive(Default, Debug)]
struct Recorder {
    reply: u8,
    selects: u32,
    deselects: u32,
    received: Vec<u8>,
}

impl Recorder {
    fn replying(reply: u8) -> Self {
        Self {
            reply,
            ..Self::default()
        }
    }
}

impl SpiDevice for Recorder {
    fn select(&mut self) {
        self.selects += 1;
    }

    fn deselect(&mut self) {
        self.deselects += 1;
    }

    fn exchange(&mut self, byte_in: u8) -> u8 {
        self.received.push(byte_in);
        self.reply
    }
}

type TestBus = SpiBus<Recorder, Recorder>;

fn bus_with_threshold(edges: u32) -> TestBus {
    let config = BusConfig::builder().handshake_edges(edges).build();
    SpiBus::new(config, Recorder::replying(0x5A), Recorder::replying(0x11))
}

fn run<S: SpiDevice, R: SpiDevice>(bus: &mut SpiBus<S, R>, latch: &mut ShiftLatch, samples: &[u8]) {
    for &s in samples {
        bus.step(s, latch);
    }
}

/// Bus that has already been clocked through the power-on handshake with
/// nothing selected.
fn initialized_bus() -> (TestBus, ShiftLatch, SoftSpiMaster) {
    let mut bus = bus_with_threshold(74);
    let mut latch = ShiftLatch::default();
    let mut master = SoftSpiMaster::new(SelectPolarity::ActiveLow);
    master.select(None).clock_idle(74);
    run(&mut bus, &mut latch, &master.drain());
    assert!(bus.is_initialized());
    (bus, latch, master)
}

#[test]
fn handshake_gates_sdcard_until_74th_edge() {
    let mut bus = bus_with_threshold(74);
    let mut latch = ShiftLatch::default();
    let mut master = SoftSpiMaster::new(SelectPolarity::ActiveLow);

    master.select(Some(Device::SdCard)).clock_idle(73);
    run(&mut bus, &mut latch, &master.drain());
    assert!(!bus.is_initialized());
    assert_eq!(bus.handshake_edges_seen(), 73);
    // One select from the chip-select transition, none from the handshake.
    assert_eq!(bus.sdcard().selects, 1);
    assert!(bus.sdcard().received.is_empty());

    master.clock_idle(1);
    run(&mut bus, &mut latch, &master.drain());
    assert!(bus.is_initialized());
    assert_eq!(bus.sdcard().selects, 2);
    assert!(bus.sdcard().received.is_empty());
    assert_eq!(latch.loads(), 0);
}

#[test]
fn legacy_threshold_of_70() {
    let mut bus = bus_with_threshold(70);
    let mut latch = ShiftLatch::default();
    let mut master = SoftSpiMaster::new(SelectPolarity::ActiveLow);
    master.clock_idle(69);
    run(&mut bus, &mut latch, &master.drain());
    assert!(!bus.is_initialized());
    master.clock_idle(1);
    run(&mut bus, &mut latch, &master.drain());
    assert!(bus.is_initialized());
    // Handshake completion notifies the card even when it is not selected.
    assert_eq!(bus.sdcard().selects, 1);
    assert_eq!(bus.selected(), None);
}

#[test]
fn no_exchange_before_handshake_regardless_of_selection() {
    let mut bus = bus_with_threshold(74);
    let mut latch = ShiftLatch::default();
    let mut master = SoftSpiMaster::new(SelectPolarity::ActiveLow);
    bus.keyboard_mut().queue(0x41);

    master
        .select(Some(Device::SdCard))
        .write_bytes(&[0x40, 0x00, 0x00])
        .select(Some(Device::Keyboard))
        .write_bytes(&[0x00, 0x00, 0x00])
        .select(Some(Device::Rtc))
        .write_bytes(&[0x00, 0x00, 0x00]);
    run(&mut bus, &mut latch, &master.drain());

    assert_eq!(bus.handshake_edges_seen(), 72);
    assert!(!bus.is_initialized());
    assert!(bus.sdcard().received.is_empty());
    assert!(bus.rtc().received.is_empty());
    assert_eq!(bus.keyboard().pending(), Some(0x41));
    assert_eq!(latch.loads(), 0);
}

#[test]
fn byte_is_delivered_msb_first_and_latched_immediately() {
    let (mut bus, mut latch, mut master) = initialized_bus();

    master.select(Some(Device::SdCard)).write_byte(0b1011_0011);
    let samples = master.drain();
    let (last, rest) = samples.split_last().unwrap();

    run(&mut bus, &mut latch, rest);
    assert!(bus.sdcard().received.is_empty());
    assert_eq!(bus.bit_count(), 7);
    assert_eq!(latch.loads(), 0);

    bus.step(*last, &mut latch);
    assert_eq!(bus.sdcard().received, [0xB3]);
    assert_eq!(latch.loads(), 1);
    assert_eq!(latch.shift_register(), 0x5A);
    assert_eq!(bus.out_byte(), 0x5A);
    assert_eq!(bus.bit_count(), 0);
}

#[test]
fn held_clock_does_not_advance_framing() {
    let (mut bus, mut latch, mut master) = initialized_bus();

    master.select(Some(Device::SdCard)).clock_idle(1).hold(500);
    run(&mut bus, &mut latch, &master.drain());
    assert_eq!(bus.bit_count(), 1);

    // Falling edge and low hold do not count either.
    for _ in 0..500 {
        bus.step(0x8Cu8, &mut latch);
    }
    assert_eq!(bus.bit_count(), 1);
}

#[test]
fn each_byte_reaches_device_exactly_once() {
    let (mut bus, mut latch, mut master) = initialized_bus();

    master
        .select(Some(Device::SdCard))
        .write_bytes(&[0xFF, 0x40, 0x00, 0x00, 0x00, 0x00, 0x95]);
    run(&mut bus, &mut latch, &master.drain());

    assert_eq!(
        bus.sdcard().received,
        [0xFF, 0x40, 0x00, 0x00, 0x00, 0x00, 0x95]
    );
    assert_eq!(latch.loads(), 7);
    assert_eq!(bus.stats().bytes_exchanged, 7);
}

#[test]
fn switching_devices_mid_byte_delivers_nothing() {
    let (mut bus, mut latch, mut master) = initialized_bus();

    master
        .select(Some(Device::SdCard))
        .clock_idle(5)
        .select(Some(Device::Rtc))
        .clock_idle(7)
        .select(Some(Device::SdCard))
        .clock_idle(7);
    run(&mut bus, &mut latch, &master.drain());

    assert!(bus.sdcard().received.is_empty());
    assert!(bus.rtc().received.is_empty());
    assert_eq!(bus.bit_count(), 7);
    assert_eq!(bus.rtc().selects, 1);
    assert_eq!(bus.rtc().deselects, 1);
    // Initial handshake select plus two chip-select transitions.
    assert_eq!(bus.sdcard().selects, 3);
    assert_eq!(bus.sdcard().deselects, 0);
    assert_eq!(latch.loads(), 0);
}

#[test]
fn only_rtc_is_told_about_deselection() {
    let (mut bus, mut latch, mut master) = initialized_bus();

    master
        .select(Some(Device::SdCard))
        .select(None)
        .select(Some(Device::Rtc))
        .select(Some(Device::SdCard))
        .select(Some(Device::Rtc))
        .select(None);
    run(&mut bus, &mut latch, &master.drain());

    assert_eq!(bus.sdcard().deselects, 0);
    // Handshake select plus two chip-select transitions.
    assert_eq!(bus.sdcard().selects, 3);
    assert_eq!(bus.rtc().selects, 2);
    assert_eq!(bus.rtc().deselects, 2);
}

#[test]
fn framing_restarts_after_reselect() {
    let (mut bus, mut latch, mut master) = initialized_bus();

    master
        .select(Some(Device::SdCard))
        .clock_idle(3)
        .select(None)
        .select(Some(Device::SdCard))
        .write_byte(0x3C);
    run(&mut bus, &mut latch, &master.drain());

    assert_eq!(bus.sdcard().received, [0x3C]);
}

#[test]
fn selection_changes_without_clock() {
    let mut bus = bus_with_threshold(74);
    let mut latch = ShiftLatch::default();
    let mut master = SoftSpiMaster::new(SelectPolarity::ActiveLow);

    master.select(Some(Device::Rtc)).select(None).select(Some(Device::Rtc));
    run(&mut bus, &mut latch, &master.drain());

    assert_eq!(bus.rtc().selects, 2);
    assert_eq!(bus.rtc().deselects, 1);
    assert_eq!(bus.selected(), Some(Device::Rtc));
    assert_eq!(bus.stats().rising_edges, 0);
}

#[test]
fn conflicting_select_lines_drop_partial_byte() {
    let (mut bus, mut latch, mut master) = initialized_bus();

    master.select(Some(Device::SdCard)).clock_idle(3);
    run(&mut bus, &mut latch, &master.drain());
    assert_eq!(bus.bit_count(), 3);

    // SS1 and SS3 both low.
    bus.step(0x84u8, &mut latch);
    assert_eq!(bus.selected(), None);
    assert_eq!(bus.bit_count(), 0);
    assert_eq!(bus.sdcard().deselects, 0);

    // Clocking with nothing addressed is ignored.
    for _ in 0..8 {
        bus.step(0x84u8, &mut latch);
        bus.step(0x85u8, &mut latch);
    }
    assert_eq!(bus.bit_count(), 0);
    assert!(bus.sdcard().received.is_empty());
    assert_eq!(latch.loads(), 0);
}

#[test]
fn keyboard_returns_queued_key_then_sentinel() {
    let (mut bus, mut latch, mut master) = initialized_bus();
    bus.keyboard_mut().queue(0x41);

    master.select(Some(Device::Keyboard)).write_byte(0xA5);
    run(&mut bus, &mut latch, &master.drain());
    assert_eq!(latch.shift_register(), 0x41);

    master.write_byte(0x00);
    run(&mut bus, &mut latch, &master.drain());
    assert_eq!(latch.shift_register(), Keyboard::NO_KEY);
    assert_eq!(latch.loads(), 2);
}

#[test]
fn host_key_events_reach_the_bus() {
    let (mut bus, mut latch, mut master) = initialized_bus();
    bus.handle_key_event(KeyEvent::press(Key::H, Modifiers::SHIFT));
    bus.handle_key_event(KeyEvent::release(Key::H, Modifiers::SHIFT));

    master.select(Some(Device::Keyboard)).write_byte(0x00);
    run(&mut bus, &mut latch, &master.drain());
    assert_eq!(bus.out_byte(), 0xC8);
}

#[test]
fn rtc_registers_over_the_bus() {
    let t = NaiveDate::from_ymd_opt(2024, 2, 29)
        .and_then(|d| d.and_hms_opt(23, 59, 58))
        .unwrap();
    let mut bus: SpiBus<NoCard, Rtc> =
        SpiBus::new(BusConfig::default(), NoCard, Rtc::new(RtcClock::Fixed(t)));
    let mut latch = ShiftLatch::default();
    let mut master = SoftSpiMaster::new(SelectPolarity::ActiveLow);
    master.clock_idle(74);
    run(&mut bus, &mut latch, &master.drain());

    fn transfer(
        bus: &mut SpiBus<NoCard, Rtc>,
        latch: &mut ShiftLatch,
        master: &mut SoftSpiMaster,
        byte: u8,
    ) -> u8 {
        master.write_byte(byte);
        run(bus, latch, &master.drain());
        latch.shift_register()
    }

    master.select(Some(Device::Rtc));
    let replies: Vec<u8> = [0x00, 0xFF, 0xFF, 0xFF]
        .iter()
        .map(|&b| transfer(&mut bus, &mut latch, &mut master, b))
        .collect();
    assert_eq!(replies, [0x00, 0x58, 0x59, 0x23]);

    // Deselect ends the transaction; the next byte is a command again.
    master.select(None).select(Some(Device::Rtc));
    let replies: Vec<u8> = [0x05, 0xFF, 0xFF]
        .iter()
        .map(|&b| transfer(&mut bus, &mut latch, &mut master, b))
        .collect();
    assert_eq!(replies, [0x00, 0x02, 0x24]);
}

#[test]
fn sdcard_slot_without_card_reads_high() {
    let mut bus: SpiBus = SpiBus::default();
    let mut latch = ShiftLatch::default();
    let mut master = SoftSpiMaster::new(SelectPolarity::ActiveLow);
    master
        .clock_idle(74)
        .select(Some(Device::SdCard))
        .write_byte(0x40);
    run(&mut bus, &mut latch, &master.drain());
    assert_eq!(latch.loads(), 1);
    assert_eq!(latch.shift_register(), 0xFF);
}

#[test]
fn active_high_wiring() {
    let config = BusConfig::builder()
        .handshake_edges(8)
        .select_polarity(SelectPolarity::ActiveHigh)
        .build();
    let mut bus = SpiBus::new(config, Recorder::replying(1), Recorder::replying(2));
    let mut latch = ShiftLatch::default();
    let mut master = SoftSpiMaster::new(SelectPolarity::ActiveHigh);
    master
        .clock_idle(8)
        .select(Some(Device::Rtc))
        .write_byte(0x77);
    run(&mut bus, &mut latch, &master.drain());
    assert_eq!(bus.rtc().received, [0x77]);
    assert_eq!(latch.shift_register(), 2);
}

#[test]
fn tick_reads_port_from_via() {
    let (mut bus, _, mut master) = initialized_bus();
    let mut via = ShiftLatch::default();
    master.select(Some(Device::SdCard)).write_byte(0x81);
    for s in master.drain() {
        via.set_port_b(s);
        bus.tick(&mut via);
    }
    assert_eq!(bus.sdcard().received, [0x81]);
    assert_eq!(via.shift_register(), 0x5A);
}

#[test]
fn reset_rearms_handshake() {
    let (mut bus, mut latch, mut master) = initialized_bus();
    bus.reset();
    assert!(!bus.is_initialized());
    assert_eq!(bus.handshake_edges_seen(), 0);
    assert_eq!(bus.selected(), None);

    master.select(Some(Device::SdCard)).write_byte(0x12);
    run(&mut bus, &mut latch, &master.drain());
    assert!(bus.sdcard().received.is_empty());
    // The edge detector restarts low, so the clock still held high from
    // before the reset counts as one more edge.
    assert_eq!(bus.handshake_edges_seen(), 9);
}

#[test]
fn handshake_is_one_shot() {
    let (mut bus, mut latch, mut master) = initialized_bus();
    master
        .select(Some(Device::Keyboard))
        .select(None)
        .clock_idle(200);
    run(&mut bus, &mut latch, &master.drain());
    assert_eq!(bus.handshake_edges_seen(), 74);
    assert_eq!(bus.sdcard().selects, 1);
    assert_eq!(bus.stats().rising_edges, 274);
}
