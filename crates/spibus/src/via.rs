/// Receiver of the byte the addressed device answers with.
///
/// On the real board this is the VIA shift register, which the 6502 reads
/// back after each transfer.
pub trait ShiftRegister {
    fn set_out_byte(&mut self, value: u8);
}

/// The parallel port the bus is wired to.
pub trait ViaPort: ShiftRegister {
    /// Current output levels of port B.
    fn port_b(&self) -> u8;
}

/// Minimal in-memory VIA port: holds the port B level the master drives and
/// the last byte shifted back by a device.
#[derive(Debug, Clone)]
pub struct ShiftLatch {
    port_b: u8,
    shift_register: u8,
    loads: u64,
}

impl Default for ShiftLatch {
    fn default() -> Self {
        // All select lines high: nothing addressed.
        Self {
            port_b: 0x0E,
            shift_register: 0xFF,
            loads: 0,
        }
    }
}

impl ShiftLatch {
    pub fn set_port_b(&mut self, value: u8) {
        self.port_b = value;
    }

    pub fn shift_register(&self) -> u8 {
        self.shift_register
    }

    /// Number of bytes loaded into the shift register so far.
    pub fn loads(&self) -> u64 {
        self.loads
    }
}

impl ShiftRegister for ShiftLatch {
    fn set_out_byte(&mut self, value: u8) {
        self.shift_register = value;
        self.loads += 1;
    }
}

impl ViaPort for ShiftLatch {
    fn port_b(&self) -> u8 {
        self.port_b
    }
}
