//! NES bus: CPU address routing.
//!
//! Routes CPU addresses to internal RAM, PPU registers, the APU, the
//! controller ports and the cartridge. Addresses nothing drives read back
//! through [`open_bus`].

use emu_core::Bus;
use nes_cartridge::Cartridge;
use ricoh_apu_2a03::Apu;
use ricoh_ppu_2c02::Ppu;
use tracing::warn;

use crate::controller::InputDevice;
use crate::error::NesError;

/// Number of controller ports.
pub const PORTS: usize = 2;

/// Value read from an address nothing drives.
///
/// The data bus keeps the last byte it carried, which for an absolute
/// operand fetch is the high byte of the address.
#[must_use]
pub const fn open_bus(addr: u16) -> u8 {
    (addr >> 8) as u8
}

pub struct NesBus {
    /// 2K internal RAM, mirrored to `$1FFF`.
    pub ram: [u8; 0x800],
    pub ppu: Ppu,
    pub apu: Apu,
    pub cartridge: Box<dyn Cartridge>,
    ports: [Option<Box<dyn InputDevice>>; PORTS],
    /// Page written to `$4014`, waiting for the DMA unit.
    pub oam_dma_page: Option<u8>,
}

impl NesBus {
    #[must_use]
    pub fn new(cartridge: Box<dyn Cartridge>, ppu: Ppu, apu: Apu) -> Self {
        Self {
            ram: [0; 0x800],
            ppu,
            apu,
            cartridge,
            ports: [None, None],
            oam_dma_page: None,
        }
    }

    /// Plug `device` into controller port 0 or 1.
    pub fn connect(&mut self, port: usize, device: Box<dyn InputDevice>) -> Result<(), NesError> {
        let Some(slot) = self.ports.get_mut(port) else {
            warn!(port, "no such controller port");
            return Err(NesError::PortUnavailable { port });
        };
        if slot.is_some() {
            warn!(port, "controller port already occupied");
            return Err(NesError::PortOccupied { port });
        }
        *slot = Some(device);
        Ok(())
    }

    /// Remove whatever is plugged into `port`.
    pub fn disconnect(&mut self, port: usize) -> Option<Box<dyn InputDevice>> {
        self.ports.get_mut(port).and_then(Option::take)
    }

    /// Read without side effects. Registers with read side effects return
    /// open bus.
    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr & 0x07FF)],
            0x4015 => self.apu.peek_status(),
            0x4020..=0xFFFF => self.cartridge.peek(addr),
            _ => open_bus(addr),
        }
    }

    fn read_port(&mut self, port: usize, addr: u16) -> u8 {
        match self.ports[port].as_mut() {
            Some(device) => open_bus(addr) | u8::from(device.on_read()),
            None => open_bus(addr),
        }
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr & 0x07FF)],
            0x2000..=0x3FFF => self.ppu.cpu_read(addr),
            0x4000..=0x4015 => self.apu.read(addr).unwrap_or(open_bus(addr)),
            0x4016 => self.read_port(0, addr),
            0x4017 => self.read_port(1, addr),
            0x4018..=0x401F => open_bus(addr),
            0x4020..=0xFFFF => self.cartridge.cpu_read(addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr & 0x07FF)] = value,
            0x2000..=0x3FFF => self.ppu.cpu_write(addr, value),
            0x4014 => self.oam_dma_page = Some(value),
            0x4016 => {
                let strobe = value & 1 != 0;
                for device in self.ports.iter_mut().flatten() {
                    device.on_write(strobe);
                }
            }
            0x4000..=0x4013 | 0x4015 | 0x4017 => self.apu.write(addr, value),
            0x4018..=0x401F => {}
            0x4020..=0xFFFF => self.cartridge.cpu_write(addr, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{InputSnapshot, NesButton, StandardController};
    use nes_cartridge::{DiscreteCartridge, Mirroring};
    use ricoh_apu_2a03::Region;

    fn make_bus() -> NesBus {
        let mut prg = vec![0xEA; 0x4000];
        prg[0] = 0x42;
        let cart = DiscreteCartridge::new(prg, vec![], Mirroring::Horizontal).unwrap();
        NesBus::new(Box::new(cart), Ppu::new(262), Apu::new(Region::Ntsc, 48_000))
    }

    #[test]
    fn ram_is_mirrored() {
        let mut bus = make_bus();
        bus.write(0x0000, 0xAB);
        for addr in [0x0800, 0x1000, 0x1800] {
            assert_eq!(bus.read(addr), 0xAB);
        }
        bus.write(0x1FFF, 0x12);
        assert_eq!(bus.peek(0x07FF), 0x12);
    }

    #[test]
    fn cartridge_reads() {
        let mut bus = make_bus();
        assert_eq!(bus.read(0x8000), 0x42);
        assert_eq!(bus.read(0xC000), 0x42);
        assert_eq!(bus.read(0x6000), 0x60);
    }

    #[test]
    fn write_only_registers_read_open_bus() {
        let mut bus = make_bus();
        assert_eq!(bus.read(0x4000), 0x40);
        assert_eq!(bus.read(0x4014), 0x40);
        assert_eq!(bus.read(0x401A), 0x40);
        assert_eq!(open_bus(0x2002), 0x20);
    }

    #[test]
    fn empty_ports_read_open_bus() {
        let mut bus = make_bus();
        assert_eq!(bus.read(0x4016), 0x40);
        assert_eq!(bus.read(0x4017), 0x40);
    }

    #[test]
    fn ppu_registers_mirror_every_eight_bytes() {
        let mut bus = make_bus();
        bus.write(0x2003, 0x10);
        bus.write(0x3FFC, 0x99);
        assert_eq!(bus.ppu.oam()[0x10], 0x99);
    }

    #[test]
    fn oam_dma_trigger() {
        let mut bus = make_bus();
        assert!(bus.oam_dma_page.is_none());
        bus.write(0x4014, 0x02);
        assert_eq!(bus.oam_dma_page, Some(0x02));
    }

    #[test]
    fn controller_serial_read() {
        let mut bus = make_bus();
        let input = InputSnapshot::new();
        bus.connect(0, Box::new(StandardController::new(input.clone())))
            .unwrap();
        input.press(NesButton::B);

        bus.write(0x4016, 1);
        bus.write(0x4016, 0);
        assert_eq!(bus.read(0x4016), 0x40);
        assert_eq!(bus.read(0x4016), 0x41);
        assert_eq!(bus.read(0x4017), 0x40);
    }

    #[test]
    fn port_connection_errors() {
        let mut bus = make_bus();
        let pad = || Box::new(StandardController::new(InputSnapshot::new()));
        assert!(matches!(
            bus.connect(2, pad()),
            Err(NesError::PortUnavailable { port: 2 })
        ));
        bus.connect(1, pad()).unwrap();
        assert!(matches!(
            bus.connect(1, pad()),
            Err(NesError::PortOccupied { port: 1 })
        ));
        assert!(bus.disconnect(1).is_some());
        bus.connect(1, pad()).unwrap();
    }

    #[test]
    fn status_read_goes_to_apu() {
        let mut bus = make_bus();
        bus.write(0x4015, 0x01);
        bus.write(0x4003, 0x08);
        assert_eq!(bus.peek(0x4015) & 0x01, 0x01);
        assert_eq!(bus.read(0x4015) & 0x01, 0x01);
    }
}
