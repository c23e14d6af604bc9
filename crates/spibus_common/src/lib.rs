pub mod key;

pub use key::{Key, KeyEvent, Modifiers};
