/// The three peripherals sharing the bus.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Device {
    SdCard,
    Keyboard,
    Rtc,
}

/// Capability every device on the bus exposes to the master.
///
/// `exchange` is one full-duplex byte: the master's byte goes in, the
/// device's reply comes out. The lifecycle hooks default to no-ops so that
/// devices only implement the notifications they care about.
pub trait SpiDevice {
    /// Chip select went active for this device.
    fn select(&mut self) {}

    /// Chip select went inactive for this device.
    fn deselect(&mut self) {}

    fn exchange(&mut self, byte_in: u8) -> u8;
}

impl<T: SpiDevice + ?Sized> SpiDevice for Box<T> {
    fn select(&mut self) {
        (**self).select()
    }

    fn deselect(&mut self) {
        (**self).deselect()
    }

    fn exchange(&mut self, byte_in: u8) -> u8 {
        (**self).exchange(byte_in)
    }
}
