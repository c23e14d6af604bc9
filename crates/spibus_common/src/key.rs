use bitflags::bitflags;

/// Host key identity as reported by the frontend input source.
///
/// Only keys with a meaning on the emulated machine are named; everything
/// else travels as `Raw` with the host's own code.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    Space,
    Return,
    Backspace,
    Escape,
    Home,
    Up,
    Down,
    Left,
    Right,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    Raw(u8),
}

impl Key {
    const LETTERS: [Key; 26] = [
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
    ];

    const DIGITS: [Key; 10] = [
        Key::Num0,
        Key::Num1,
        Key::Num2,
        Key::Num3,
        Key::Num4,
        Key::Num5,
        Key::Num6,
        Key::Num7,
        Key::Num8,
        Key::Num9,
    ];

    /// Zero-based position in the alphabet for letter keys.
    pub fn letter_index(self) -> Option<u8> {
        Self::LETTERS
            .iter()
            .position(|&k| k == self)
            .map(|i| i as u8)
    }

    /// Numeric value for the digit row.
    pub fn digit(self) -> Option<u8> {
        Self::DIGITS.iter().position(|&k| k == self).map(|i| i as u8)
    }

    /// Map a printable host character onto the key that produces it.
    ///
    /// Returns the key together with whether Shift has to be held. Used by
    /// frontends that feed pasted text rather than physical key events.
    pub fn from_char(c: char) -> Option<(Key, bool)> {
        match c {
            'a'..='z' => Some((Self::LETTERS[(c as u8 - b'a') as usize], false)),
            'A'..='Z' => Some((Self::LETTERS[(c as u8 - b'A') as usize], true)),
            '0'..='9' => Some((Self::DIGITS[(c as u8 - b'0') as usize], false)),
            ' ' => Some((Key::Space, false)),
            '\n' | '\r' => Some((Key::Return, false)),
            _ => None,
        }
    }
}

bitflags! {
    /// Modifier keys held while a key event was generated.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CTRL = 0b0000_0010;
        const ALT = 0b0000_0100;
        const GUI = 0b0000_1000;
    }
}

/// A single press or release reported by the host.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn press(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            pressed: true,
            modifiers,
        }
    }

    pub fn release(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            pressed: false,
            modifiers,
        }
    }
}
