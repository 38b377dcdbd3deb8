//! Ricoh 2C02 PPU, timing only.
//!
//! One `tick()` = one PPU dot. The frame is 341 dots per scanline with
//! the visible picture on lines 0-239, vblank from line 241 and the
//! pre-render line last (261 on NTSC, 311 on PAL). No pixels are
//! produced: this model exists so the CPU sees vblank, NMI and OAM the
//! way software expects.

use emu_core::{Observable, Value};

/// Dots per scanline.
pub const DOTS_PER_LINE: u16 = 341;

/// First vblank scanline.
pub const VBLANK_LINE: u16 = 241;

const STATUS_VBLANK: u8 = 0x80;
const CTRL_NMI_ENABLE: u8 = 0x80;

#[derive(Debug, Clone)]
pub struct Ppu {
    scanlines: u16,
    scanline: u16,
    dot: u16,
    frame: u64,
    ctrl: u8,
    status: u8,
    oam_addr: u8,
    oam: [u8; 256],
    /// Last value written to any register; write-only registers read
    /// back as this.
    latch: u8,
    /// Registers with no timing effect, kept for inspection.
    registers: [u8; 8],
}

impl Ppu {
    /// `scanlines` per frame: 262 (NTSC) or 312 (PAL).
    #[must_use]
    pub fn new(scanlines: u16) -> Self {
        Self {
            scanlines,
            // Start on the pre-render line
            scanline: scanlines.saturating_sub(1),
            dot: 0,
            frame: 0,
            ctrl: 0,
            status: 0,
            oam_addr: 0,
            oam: [0; 256],
            latch: 0,
            registers: [0; 8],
        }
    }

    fn pre_render_line(&self) -> u16 {
        self.scanlines.saturating_sub(1)
    }

    /// Advance one dot. Returns true when a frame's picture is complete
    /// (the dot vblank begins).
    pub fn tick(&mut self) -> bool {
        let mut frame_done = false;
        if self.dot == 1 {
            if self.scanline == VBLANK_LINE {
                self.status |= STATUS_VBLANK;
                self.frame += 1;
                frame_done = true;
            } else if self.scanline == self.pre_render_line() {
                self.status &= !STATUS_VBLANK;
            }
        }

        self.dot += 1;
        if self.dot == DOTS_PER_LINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline == self.scanlines {
                self.scanline = 0;
            }
        }
        frame_done
    }

    /// Level of the NMI output: vblank while NMI generation is enabled.
    #[must_use]
    pub fn nmi_line(&self) -> bool {
        self.status & STATUS_VBLANK != 0 && self.ctrl & CTRL_NMI_ENABLE != 0
    }

    #[must_use]
    pub fn in_vblank(&self) -> bool {
        self.status & STATUS_VBLANK != 0
    }

    /// CPU read of `$2000-$2007` (mirrored).
    pub fn cpu_read(&mut self, addr: u16) -> u8 {
        match addr & 0x07 {
            2 => {
                let value = (self.status & 0xE0) | (self.latch & 0x1F);
                self.status &= !STATUS_VBLANK;
                self.latch = value;
                value
            }
            4 => {
                self.latch = self.oam[usize::from(self.oam_addr)];
                self.latch
            }
            _ => self.latch,
        }
    }

    /// CPU write of `$2000-$2007` (mirrored).
    pub fn cpu_write(&mut self, addr: u16, value: u8) {
        self.latch = value;
        let reg = addr & 0x07;
        self.registers[usize::from(reg)] = value;
        match reg {
            0 => self.ctrl = value,
            3 => self.oam_addr = value,
            4 => {
                self.oam[usize::from(self.oam_addr)] = value;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            _ => {}
        }
    }

    /// OAM DMA write, relative to the current OAM address.
    pub fn write_oam(&mut self, offset: u8, value: u8) {
        let index = self.oam_addr.wrapping_add(offset);
        self.oam[usize::from(index)] = value;
    }

    #[must_use]
    pub fn oam(&self) -> &[u8; 256] {
        &self.oam
    }

    #[must_use]
    pub fn oam_addr(&self) -> u8 {
        self.oam_addr
    }

    #[must_use]
    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    #[must_use]
    pub fn dot(&self) -> u16 {
        self.dot
    }

    /// Frames completed since power-on.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Observable for Ppu {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "scanline" => Some(self.scanline.into()),
            "dot" => Some(self.dot.into()),
            "frame" => Some(self.frame.into()),
            "vblank" => Some(self.in_vblank().into()),
            "nmi" => Some(self.nmi_line().into()),
            "ctrl" => Some(self.ctrl.into()),
            "mask" => Some(self.registers[1].into()),
            "oam_addr" => Some(self.oam_addr.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &["scanline", "dot", "frame", "vblank", "nmi", "ctrl", "mask", "oam_addr"]
    }
}
