//! Delta modulation channel.
//!
//! Plays 1-bit delta samples fetched from CPU memory. The channel never
//! touches the bus itself: when its one-byte sample buffer is empty and
//! bytes remain, [`Dmc::dma_request`] yields the address to fetch and the
//! system delivers the byte through [`Dmc::dma_complete`].

use tracing::debug;

use crate::Region;
use crate::channel::Channel;
use crate::tables::dmc_rates;

#[derive(Debug, Clone)]
pub struct Dmc {
    rates: &'static [u16; 16],
    level: u8,
    irq_enabled: bool,
    pub(crate) irq_flag: bool,
    looping: bool,
    timer: u16,
    period: u16,
    sample_address: u16,
    sample_length: u16,
    address: u16,
    remaining: u16,
    buffer: Option<u8>,
    shift: u8,
    bits_left: u8,
    silent: bool,
}

impl Dmc {
    #[must_use]
    pub fn new(region: Region) -> Self {
        let rates = dmc_rates(region);
        Self {
            rates,
            level: 0,
            irq_enabled: false,
            irq_flag: false,
            looping: false,
            timer: rates[0] - 1,
            period: rates[0],
            sample_address: 0xC000,
            sample_length: 1,
            address: 0xC000,
            remaining: 0,
            buffer: None,
            shift: 0,
            bits_left: 8,
            silent: true,
        }
    }

    /// Address of the next sample byte, when the buffer needs refilling.
    #[must_use]
    pub fn dma_request(&self) -> Option<u16> {
        (self.buffer.is_none() && self.remaining > 0).then_some(self.address)
    }

    /// Deliver the byte fetched for the last request.
    pub fn dma_complete(&mut self, byte: u8) {
        if self.remaining == 0 {
            return;
        }
        self.buffer = Some(byte);
        // Wraps from $FFFF into $8000
        self.address = self.address.checked_add(1).unwrap_or(0x8000);
        self.remaining -= 1;

        if self.remaining == 0 {
            if self.looping {
                debug!(
                    address = format_args!("${:04X}", self.sample_address),
                    length = self.sample_length,
                    "DMC sample restart"
                );
                self.restart();
            } else if self.irq_enabled {
                self.irq_flag = true;
            }
        }
    }

    fn restart(&mut self) {
        self.address = self.sample_address;
        self.remaining = self.sample_length;
    }

    #[must_use]
    pub fn bytes_remaining(&self) -> u16 {
        self.remaining
    }

    #[must_use]
    pub fn irq_flag(&self) -> bool {
        self.irq_flag
    }

    fn clock_output(&mut self) {
        if !self.silent {
            if self.shift & 1 != 0 {
                if self.level <= 125 {
                    self.level += 2;
                }
            } else if self.level >= 2 {
                self.level -= 2;
            }
            self.shift >>= 1;
        }

        self.bits_left -= 1;
        if self.bits_left == 0 {
            self.bits_left = 8;
            match self.buffer.take() {
                Some(byte) => {
                    self.silent = false;
                    self.shift = byte;
                }
                None => self.silent = true,
            }
        }
    }
}

impl Channel for Dmc {
    /// One CPU cycle.
    fn step(&mut self) {
        if self.timer == 0 {
            self.timer = self.period.saturating_sub(1);
            self.clock_output();
        } else {
            self.timer -= 1;
        }
    }

    fn write(&mut self, register: u8, value: u8) {
        match register & 0x03 {
            0 => {
                self.irq_enabled = value & 0x80 != 0;
                self.looping = value & 0x40 != 0;
                self.period = self.rates[usize::from(value & 0x0F)];
                if !self.irq_enabled {
                    self.irq_flag = false;
                }
            }
            1 => self.level = value & 0x7F,
            2 => self.sample_address = 0xC000 | (u16::from(value) << 6),
            _ => self.sample_length = (u16::from(value) << 4) | 1,
        }
    }

    fn level(&self) -> u8 {
        self.level
    }

    fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.remaining = 0;
        } else if self.remaining == 0 {
            self.restart();
        }
    }

    fn is_active(&self) -> bool {
        self.remaining > 0
    }
}
