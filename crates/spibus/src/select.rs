use crate::config::SelectPolarity;
use crate::device::Device;
use crate::port::{BusSample, PortPins};

/// Outcome of one selector update.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct SelectionChange {
    /// Device that lost the bus this sample.
    pub(crate) deselected: Option<Device>,
    /// Device that gained the bus this sample.
    pub(crate) selected: Option<Device>,
    /// Whether selection differs from the previous sample at all,
    /// including a change to or from "nothing addressed".
    pub(crate) changed: bool,
}

/// Tracks which device the chip-select lines address.
///
/// Runs on every sample: the select lines are levels, independent of the
/// clock.
#[derive(Debug, Clone)]
pub(crate) struct DeviceSelector {
    polarity: SelectPolarity,
    current: Option<Device>,
}

impl DeviceSelector {
    pub(crate) fn new(polarity: SelectPolarity) -> Self {
        Self {
            polarity,
            current: None,
        }
    }

    #[inline]
    pub(crate) fn current(&self) -> Option<Device> {
        self.current
    }

    /// Decode the select lines. Anything other than exactly one asserted
    /// line means no device is addressed.
    pub(crate) fn decode(&self, sample: BusSample) -> Option<Device> {
        let lines = sample.select_lines();
        let asserted = |pin: PortPins| self.polarity.is_asserted(lines.contains(pin));

        match (
            asserted(PortPins::SS_SDCARD),
            asserted(PortPins::SS_KEYBOARD),
            asserted(PortPins::SS_RTC),
        ) {
            (true, false, false) => Some(Device::SdCard),
            (false, true, false) => Some(Device::Keyboard),
            (false, false, true) => Some(Device::Rtc),
            _ => None,
        }
    }

    pub(crate) fn update(&mut self, sample: BusSample) -> SelectionChange {
        let next = self.decode(sample);
        if next == self.current {
            return SelectionChange::default();
        }

        let change = SelectionChange {
            deselected: self.current,
            selected: next,
            changed: true,
        };
        self.current = next;
        change
    }
}
