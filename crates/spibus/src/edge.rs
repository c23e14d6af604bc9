/// Rising-edge detector for the SPI clock line.
///
/// The port can be polled many times while the clock holds a level, so
/// only a 0 -> 1 change between two consecutive samples counts.
#[derive(Default, Debug, Clone)]
pub(crate) struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    /// Record `clock` and report whether it rose since the previous sample.
    #[inline]
    pub(crate) fn sample(&mut self, clock: bool) -> bool {
        let rising = !self.last && clock;
        self.last = clock;
        rising
    }

    #[cfg(test)]
    pub(crate) fn level(&self) -> bool {
        self.last
    }
}
