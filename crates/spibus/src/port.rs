//! Pin layout of VIA #2 port B as seen by the SPI bus.
//!
//! ```text
//! PB0  SPICLK
//! PB1  SS1  SD card
//! PB2  SS2  keyboard
//! PB3  SS3  RTC
//! PB4  unassigned
//! PB5  SD write protect
//! PB6  SD card detect
//! PB7  MOSI
//! ```
//!
//! MISO comes back through the VIA shift register (CB2), not through this
//! port, so it has no pin here.
use bitflags::bitflags;

bitflags! {
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct PortPins: u8 {
        const CLK = 0b0000_0001;
        const SS_SDCARD = 0b0000_0010;
        const SS_KEYBOARD = 0b0000_0100;
        const SS_RTC = 0b0000_1000;
        const UNUSED = 0b0001_0000;
        const SD_WRITE_PROTECT = 0b0010_0000;
        const SD_DETECT = 0b0100_0000;
        const MOSI = 0b1000_0000;

        const SELECT_LINES = Self::SS_SDCARD.bits()
            | Self::SS_KEYBOARD.bits()
            | Self::SS_RTC.bits();
    }
}

/// One snapshot of the port pins, taken once per bus tick.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct BusSample(u8);

impl BusSample {
    #[inline]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn pins(self) -> PortPins {
        PortPins::from_bits_retain(self.0)
    }

    #[inline]
    pub fn clock(self) -> bool {
        self.pins().contains(PortPins::CLK)
    }

    #[inline]
    pub fn mosi(self) -> bool {
        self.pins().contains(PortPins::MOSI)
    }

    /// Raw levels of the three chip-select lines, other pins masked off.
    #[inline]
    pub fn select_lines(self) -> PortPins {
        self.pins() & PortPins::SELECT_LINES
    }
}

impl From<u8> for BusSample {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl From<PortPins> for BusSample {
    fn from(pins: PortPins) -> Self {
        Self(pins.bits())
    }
}
