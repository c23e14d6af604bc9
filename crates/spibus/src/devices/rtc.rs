use chrono::{Datelike, Local, NaiveDateTime, Timelike};

use crate::device::SpiDevice;

const REGISTER_COUNT: usize = 0x80;
const TIME_REGISTERS: usize = 7;
/// First byte of battery-backed user RAM.
pub const RTC_SRAM_START: u8 = 0x20;

/// Where the RTC takes the time from when it is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcClock {
    System,
    Fixed(NaiveDateTime),
}

impl RtcClock {
    fn now(&self) -> NaiveDateTime {
        match self {
            RtcClock::System => Local::now().naive_local(),
            RtcClock::Fixed(t) => *t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transfer {
    Idle,
    Command,
    Read(u8),
    Write(u8),
}

/// SPI real-time clock with a small register file.
///
/// A transaction starts at chip select. Its first byte is a command: bit 7
/// selects write, bits 6-0 the start register. Every following byte reads or
/// writes one register with the address auto-incrementing.
///
/// | reg  | content (BCD)   |
/// |------|-----------------|
/// | 0x00 | seconds         |
/// | 0x01 | minutes         |
/// | 0x02 | hours (24h)     |
/// | 0x03 | weekday, Mon=1  |
/// | 0x04 | day of month    |
/// | 0x05 | month           |
/// | 0x06 | year mod 100    |
/// | 0x20-0x7F | user RAM   |
#[derive(Debug, Clone)]
pub struct Rtc {
    clock: RtcClock,
    registers: [u8; REGISTER_COUNT],
    transfer: Transfer,
}

impl Default for Rtc {
    fn default() -> Self {
        Self::new(RtcClock::System)
    }
}

impl Rtc {
    pub fn new(clock: RtcClock) -> Self {
        Self {
            clock,
            registers: [0; REGISTER_COUNT],
            transfer: Transfer::Idle,
        }
    }

    pub fn register(&self, addr: u8) -> u8 {
        self.registers[addr as usize % REGISTER_COUNT]
    }

    pub fn set_clock(&mut self, clock: RtcClock) {
        self.clock = clock;
    }

    fn latch_time(&mut self) {
        let now = self.clock.now();
        let fields = [
            now.second(),
            now.minute(),
            now.hour(),
            now.weekday().number_from_monday(),
            now.day(),
            now.month(),
            now.year().rem_euclid(100) as u32,
        ];
        for (reg, value) in self.registers[..TIME_REGISTERS].iter_mut().zip(fields) {
            *reg = to_bcd(value as u8);
        }
    }
}

#[inline]
fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

#[inline]
fn next_addr(addr: u8) -> u8 {
    addr.wrapping_add(1) % REGISTER_COUNT as u8
}

impl SpiDevice for Rtc {
    fn select(&mut self) {
        self.latch_time();
        self.transfer = Transfer::Command;
        log::trace!("RTC: select");
    }

    fn deselect(&mut self) {
        self.transfer = Transfer::Idle;
        log::trace!("RTC: deselect");
    }

    fn exchange(&mut self, byte_in: u8) -> u8 {
        match self.transfer {
            Transfer::Idle => 0xFF,
            Transfer::Command => {
                let addr = byte_in & 0x7F;
                self.transfer = if byte_in & 0x80 != 0 {
                    Transfer::Write(addr)
                } else {
                    Transfer::Read(addr)
                };
                0x00
            }
            Transfer::Read(addr) => {
                self.transfer = Transfer::Read(next_addr(addr));
                self.registers[addr as usize]
            }
            Transfer::Write(addr) => {
                let old = self.registers[addr as usize];
                self.registers[addr as usize] = byte_in;
                self.transfer = Transfer::Write(next_addr(addr));
                old
            }
        }
    }
}
