use std::fs;
use std::path::Path;

use tracing::info;

use crate::{Cartridge, CartridgeError, Mirroring, Rom};

/// 16 KiB program ROM, mirrored into both halves of `$8000-$FFFF`.
pub const PRG_SMALL: usize = 0x4000;
/// 32 KiB program ROM, mapped flat at `$8000-$FFFF`.
pub const PRG_LARGE: usize = 0x8000;
/// The only legal non-empty character ROM size.
pub const CHR_SIZE: usize = 0x2000;

/// A board with fixed program and character ROM and hard-wired mirroring.
///
/// Reads below `$8000` see nothing on the cartridge and return the high
/// byte of the address, which is what the data bus floats to after the
/// operand fetch. Writes are ignored.
#[derive(Debug, Clone)]
pub struct DiscreteCartridge {
    prg: Vec<u8>,
    chr: Vec<u8>,
    mirroring: Mirroring,
}

impl DiscreteCartridge {
    pub fn new(prg: Vec<u8>, chr: Vec<u8>, mirroring: Mirroring) -> Result<Self, CartridgeError> {
        match prg.len() {
            0 => return Err(CartridgeError::MissingProgram),
            PRG_SMALL | PRG_LARGE => {}
            len if len > PRG_LARGE => {
                return Err(CartridgeError::TooLarge {
                    rom: Rom::Program,
                    len,
                    max: PRG_LARGE,
                });
            }
            len => {
                return Err(CartridgeError::IllegalSize {
                    rom: Rom::Program,
                    len,
                });
            }
        }
        match chr.len() {
            0 | CHR_SIZE => {}
            len if len > CHR_SIZE => {
                return Err(CartridgeError::TooLarge {
                    rom: Rom::Character,
                    len,
                    max: CHR_SIZE,
                });
            }
            len => {
                return Err(CartridgeError::IllegalSize {
                    rom: Rom::Character,
                    len,
                });
            }
        }

        info!(
            prg = prg.len(),
            chr = chr.len(),
            ?mirroring,
            "cartridge inserted"
        );
        Ok(Self {
            prg,
            chr,
            mirroring,
        })
    }

    /// Load raw ROM images from disk.
    pub fn load_from_files(
        program: &Path,
        character: Option<&Path>,
        mirroring: Mirroring,
    ) -> Result<Self, CartridgeError> {
        let prg = read_image(program)?;
        let chr = match character {
            Some(path) => read_image(path)?,
            None => Vec::new(),
        };
        Self::new(prg, chr, mirroring)
    }

    fn read_prg(&self, addr: u16) -> u8 {
        if addr < 0x8000 {
            return (addr >> 8) as u8;
        }
        // Both legal sizes are powers of two.
        self.prg[usize::from(addr) & (self.prg.len() - 1)]
    }
}

fn read_image(path: &Path) -> Result<Vec<u8>, CartridgeError> {
    fs::read(path).map_err(|e| CartridgeError::from_io(path.to_path_buf(), e))
}

impl Cartridge for DiscreteCartridge {
    fn cpu_read(&mut self, addr: u16) -> u8 {
        self.read_prg(addr)
    }

    fn cpu_write(&mut self, _addr: u16, _value: u8) {}

    fn peek(&self, addr: u16) -> u8 {
        self.read_prg(addr)
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn chr(&self) -> &[u8] {
        &self.chr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prg(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i >> 8) as u8 ^ i as u8).collect()
    }

    #[test]
    fn small_program_is_mirrored() {
        let mut cart = DiscreteCartridge::new(prg(PRG_SMALL), vec![], Mirroring::Vertical).unwrap();
        for addr in [0x8000u16, 0x8123, 0xBFFF] {
            assert_eq!(cart.cpu_read(addr), cart.cpu_read(addr + 0x4000));
        }
        assert_eq!(cart.mirroring(), Mirroring::Vertical);
    }

    #[test]
    fn large_program_is_flat() {
        let data = prg(PRG_LARGE);
        let cart = DiscreteCartridge::new(data.clone(), vec![0; CHR_SIZE], Mirroring::Horizontal)
            .unwrap();
        assert_eq!(cart.peek(0x8000), data[0]);
        assert_eq!(cart.peek(0xC001), data[0x4001]);
        assert_eq!(cart.peek(0xFFFF), data[0x7FFF]);
        assert_eq!(cart.chr().len(), CHR_SIZE);
    }

    #[test]
    fn low_addresses_float_to_high_byte() {
        let mut cart = DiscreteCartridge::new(prg(PRG_SMALL), vec![], Mirroring::Horizontal).unwrap();
        assert_eq!(cart.cpu_read(0x4020), 0x40);
        assert_eq!(cart.cpu_read(0x6000), 0x60);
        assert_eq!(cart.peek(0x7FFF), 0x7F);
    }

    #[test]
    fn writes_are_ignored() {
        let mut cart = DiscreteCartridge::new(vec![0xAA; PRG_SMALL], vec![], Mirroring::Horizontal)
            .unwrap();
        cart.cpu_write(0x8000, 0x55);
        assert_eq!(cart.peek(0x8000), 0xAA);
        assert!(!cart.irq_pending());
        assert!((cart.shape_audio(0.25) - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_bad_program_sizes() {
        assert!(matches!(
            DiscreteCartridge::new(vec![], vec![], Mirroring::Horizontal),
            Err(CartridgeError::MissingProgram)
        ));
        assert!(matches!(
            DiscreteCartridge::new(vec![0; 0x2000], vec![], Mirroring::Horizontal),
            Err(CartridgeError::IllegalSize { rom: Rom::Program, len: 0x2000 })
        ));
        assert!(matches!(
            DiscreteCartridge::new(vec![0; 0xC000], vec![], Mirroring::Horizontal),
            Err(CartridgeError::TooLarge { rom: Rom::Program, max: PRG_LARGE, .. })
        ));
    }

    #[test]
    fn rejects_bad_character_sizes() {
        assert!(matches!(
            DiscreteCartridge::new(vec![0; PRG_SMALL], vec![0; 0x1000], Mirroring::Horizontal),
            Err(CartridgeError::IllegalSize { rom: Rom::Character, .. })
        ));
        assert!(matches!(
            DiscreteCartridge::new(vec![0; PRG_SMALL], vec![0; 0x4000], Mirroring::Horizontal),
            Err(CartridgeError::TooLarge { rom: Rom::Character, .. })
        ));
    }
}
