//! Per-cycle scratch latches.

/// Internal latches the sequencers use between cycles.
///
/// `adl`/`adh` are built up byte by byte and only become the effective
/// address when [`Latches::drive`] copies them onto the address bus. Code
/// that changes either half must drive again before the next access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latches {
    /// Address low.
    pub adl: u8,
    /// Address high.
    pub adh: u8,
    /// Data buffer: holds a byte across cycles (zero-page pointer,
    /// branch displacement, vector low byte).
    pub db: u8,
    /// The value read from or written to the bus this cycle.
    pub data: u8,
    /// Effective address as last driven.
    pub addr: u16,
    /// Set when an index addition carried out of the low byte.
    pub page_crossed: bool,
}

impl Latches {
    /// Latch `adh:adl` onto the address bus and return it.
    pub fn drive(&mut self) -> u16 {
        self.addr = u16::from_le_bytes([self.adl, self.adh]);
        self.addr
    }

    /// Point the latches at a zero-page address.
    pub fn zero_page(&mut self, offset: u8) {
        self.adl = offset;
        self.adh = 0;
    }

    /// Add an index to `adl` without carrying into `adh`, recording
    /// whether a carry was dropped.
    pub fn index_low(&mut self, index: u8) {
        let (low, carry) = self.adl.overflowing_add(index);
        self.adl = low;
        self.page_crossed = carry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_does_not_follow_latches_until_driven() {
        let mut latch = Latches {
            adl: 0x34,
            adh: 0x12,
            ..Latches::default()
        };
        assert_eq!(latch.drive(), 0x1234);
        latch.adh = 0x56;
        assert_eq!(latch.addr, 0x1234);
        assert_eq!(latch.drive(), 0x5634);
    }

    #[test]
    fn index_low_keeps_high_byte() {
        let mut latch = Latches {
            adl: 0xF0,
            adh: 0x02,
            ..Latches::default()
        };
        latch.index_low(0x20);
        assert_eq!((latch.adh, latch.adl), (0x02, 0x10));
        assert!(latch.page_crossed);
    }
}
