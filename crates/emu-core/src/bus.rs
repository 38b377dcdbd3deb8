//! Memory and I/O bus interface.

/// A 16-bit address bus.
///
/// Every CPU cycle performs exactly one `read` or `write`. Both are
/// side-effecting: a read may clear a status flag or shift a controller
/// register, so callers that only want to look must use a component's own
/// peek method instead.
pub trait Bus {
    /// Read a byte from the given address.
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, address: u16, value: u8);
}

/// Flat 64 KiB RAM with no mirroring or I/O.
///
/// Useful for CPU tests and tools. Records how many bus accesses were made
/// so tests can assert cycle counts against bus traffic.
pub struct SimpleBus {
    memory: Box<[u8; 0x10000]>,
    accesses: u64,
    writes: u64,
}

impl SimpleBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            memory: Box::new([0; 0x10000]),
            accesses: 0,
            writes: 0,
        }
    }

    /// Copy `data` into memory starting at `address`, wrapping at $FFFF.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        let mut addr = address;
        for &byte in data {
            self.memory[addr as usize] = byte;
            addr = addr.wrapping_add(1);
        }
    }

    /// Read without counting an access.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.memory[address as usize]
    }

    /// Write without counting an access.
    pub fn poke(&mut self, address: u16, value: u8) {
        self.memory[address as usize] = value;
    }

    /// Total bus accesses (reads and writes) since creation.
    #[must_use]
    pub fn accesses(&self) -> u64 {
        self.accesses
    }

    /// Bus writes since creation.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for SimpleBus {
    fn read(&mut self, address: u16) -> u8 {
        self.accesses += 1;
        self.memory[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.accesses += 1;
        self.writes += 1;
        self.memory[address as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_wraps_at_top_of_memory() {
        let mut bus = SimpleBus::new();
        bus.load(0xFFFF, &[0x11, 0x22]);
        assert_eq!(bus.peek(0xFFFF), 0x11);
        assert_eq!(bus.peek(0x0000), 0x22);
        assert_eq!(bus.accesses(), 0);
    }

    #[test]
    fn accesses_are_counted() {
        let mut bus = SimpleBus::new();
        bus.write(0x10, 5);
        assert_eq!(bus.read(0x10), 5);
        assert_eq!(bus.accesses(), 2);
        assert_eq!(bus.writes(), 1);
    }
}
