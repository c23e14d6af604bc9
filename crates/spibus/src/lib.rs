pub mod app;
pub mod bus;
pub mod config;
pub mod device;
pub mod devices;
pub mod master;
pub mod port;
pub mod trace;
pub mod via;

mod edge;
mod framer;
mod handshake;
mod select;

pub use bus::{BusStats, SpiBus};
pub use config::{BusConfig, SelectPolarity};
pub use device::{Device, SpiDevice};
pub use devices::{Keyboard, NoCard, Rtc, RtcClock};
pub use master::SoftSpiMaster;
pub use port::{BusSample, PortPins};
pub use via::{ShiftLatch, ShiftRegister, ViaPort};

pub use spibus_common;

/// Rising clock edges an SD card needs before its first command.
///
/// The SD physical layer asks for "at least 74" dummy clocks after power-up.
pub const DEFAULT_HANDSHAKE_EDGES: u32 = 74;
