use crate::device::SpiDevice;

/// Empty SD slot.
///
/// With no card driving MISO the line floats high, so every transfer reads
/// back `0xFF`. A block-protocol implementation replaces this by
/// implementing [`SpiDevice`] itself.
#[derive(Default, Debug, Clone, Copy)]
pub struct NoCard;

impl SpiDevice for NoCard {
    fn select(&mut self) {
        log::trace!("SD: select with no card inserted");
    }

    fn exchange(&mut self, _byte_in: u8) -> u8 {
        0xFF
    }
}
