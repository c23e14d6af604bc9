/// MSB-first shift register for bits arriving on MOSI.
#[derive(Default, Debug, Clone)]
pub(crate) struct BitFramer {
    accumulator: u8,
    bits: u8,
}

impl BitFramer {
    /// Shift in one bit; yields the byte once eight have arrived.
    pub(crate) fn push(&mut self, bit: bool) -> Option<u8> {
        self.accumulator = (self.accumulator << 1) | bit as u8;
        self.bits += 1;
        if self.bits < 8 {
            return None;
        }
        self.bits = 0;
        Some(self.accumulator)
    }

    /// Drop any partially received byte.
    pub(crate) fn reset(&mut self) {
        self.accumulator = 0;
        self.bits = 0;
    }

    #[inline]
    pub(crate) fn bit_count(&self) -> u8 {
        self.bits
    }
}
