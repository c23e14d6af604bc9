use spibus_common::{Key, KeyEvent, Modifiers};

use crate::device::SpiDevice;

/// SPI keyboard controller.
///
/// Output-only: whatever the master shifts in is ignored, and each transfer
/// shifts out the pending key byte. There is a single slot; a new key press
/// replaces a byte the machine has not read yet.
#[derive(Default, Debug, Clone)]
pub struct Keyboard {
    pending: Option<u8>,
}

impl Keyboard {
    /// Byte shifted out when no key is waiting.
    pub const NO_KEY: u8 = 0xFF;

    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a host key event. Releases carry no byte.
    pub fn handle_key_event(&mut self, event: KeyEvent) {
        if !event.pressed {
            return;
        }
        let byte = translate(event.key, event.modifiers);
        log::trace!(
            "keyboard: {:?} {:?} -> 0x{:02X}",
            event.key,
            event.modifiers,
            byte
        );
        self.queue(byte);
    }

    /// Put an already translated byte in the slot.
    pub fn queue(&mut self, byte: u8) {
        if let Some(old) = self.pending.replace(byte) {
            log::debug!("keyboard: 0x{:02X} overwritten before it was read", old);
        }
    }

    pub fn pending(&self) -> Option<u8> {
        self.pending
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

impl SpiDevice for Keyboard {
    fn exchange(&mut self, _byte_in: u8) -> u8 {
        self.pending.take().unwrap_or(Self::NO_KEY)
    }
}

/// Translate a host key into the PETSCII byte the machine expects.
///
/// Keys without a PETSCII meaning pass through as their raw code.
pub fn translate(key: Key, modifiers: Modifiers) -> u8 {
    let shift = modifiers.contains(Modifiers::SHIFT);

    if let Some(index) = key.letter_index() {
        let code = b'A' + index;
        return if modifiers.contains(Modifiers::CTRL) {
            code & 0x1F
        } else if shift {
            code | 0x80
        } else {
            code
        };
    }

    if let Some(digit) = key.digit() {
        // Shifted digit row gives !"#$%&'() on 1..9.
        return if shift && digit != 0 {
            0x20 + digit
        } else {
            b'0' + digit
        };
    }

    match key {
        Key::Space => 0x20,
        Key::Return => 0x0D,
        Key::Backspace if shift => 0x94,
        Key::Backspace => 0x14,
        Key::Escape => 0x03,
        Key::Home if shift => 0x93,
        Key::Home => 0x13,
        Key::Up => 0x91,
        Key::Down => 0x11,
        Key::Left => 0x9D,
        Key::Right => 0x1D,
        Key::F1 => 0x85,
        Key::F3 => 0x86,
        Key::F5 => 0x87,
        Key::F7 => 0x88,
        Key::F2 => 0x89,
        Key::F4 => 0x8A,
        Key::F6 => 0x8B,
        Key::F8 => 0x8C,
        Key::Raw(code) => code,
        // Letters and digits were handled above.
        _ => 0xFF,
    }
}
