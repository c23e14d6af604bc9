use typed_builder::TypedBuilder;

use crate::DEFAULT_HANDSHAKE_EDGES;

/// Electrical level that asserts a chip-select line.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SelectPolarity {
    /// A line pulled to 0 selects its device (the VIA #2 wiring).
    #[default]
    ActiveLow,
    ActiveHigh,
}

impl SelectPolarity {
    #[inline]
    pub(crate) fn is_asserted(self, level: bool) -> bool {
        match self {
            SelectPolarity::ActiveLow => !level,
            SelectPolarity::ActiveHigh => level,
        }
    }
}

#[derive(TypedBuilder, Clone, Debug, Eq, PartialEq)]
pub struct BusConfig {
    /// Rising edges swallowed by the power-on handshake before framing
    /// starts. Older boards used 70.
    #[builder(default = DEFAULT_HANDSHAKE_EDGES)]
    pub handshake_edges: u32,
    #[builder(default)]
    pub select_polarity: SelectPolarity,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
