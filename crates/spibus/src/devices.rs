mod keyboard;
mod rtc;
mod sdcard;

pub use keyboard::{translate, Keyboard};
pub use rtc::{Rtc, RtcClock, RTC_SRAM_START};
pub use sdcard::NoCard;
