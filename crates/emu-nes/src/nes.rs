//! Top-level NES system.
//!
//! The master clock ticks at the crystal rate (21,477,272 Hz NTSC,
//! 26,601,712 Hz PAL). Components derive their timing from it:
//! - PPU: one dot every 4 (NTSC) or 5 (PAL) crystal ticks
//! - CPU and APU: one cycle every 12 (NTSC) or 16 (PAL) crystal ticks
//!
//! While OAM or DMC DMA owns the bus the CPU is not ticked; the APU and
//! PPU keep running.

use emu_core::{Bus, Cpu, MasterClock, MonotonicClock, Observable, Tickable, Ticks, Value};
use mos_6502::Mos6502;
use nes_cartridge::Cartridge;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ricoh_apu_2a03::Apu;
use ricoh_ppu_2c02::Ppu;
use tracing::{debug, info, warn};

use crate::audio::{NullSink, SampleSink};
use crate::bus::NesBus;
use crate::config::{NesConfig, NesRegion};
use crate::controller::InputDevice;
use crate::error::NesError;
use crate::listener::{DotListener, FramePresenter};
use crate::pacing::{Pacer, SystemClock, Throttle};
use crate::quit::QuitFlag;

/// CPU cycles stolen per DMC sample byte.
const DMC_STALL_CYCLES: u8 = 4;

/// An OAM DMA transfer in progress: one or two alignment cycles, then
/// alternating reads and writes for 256 bytes.
#[derive(Debug, Clone, Copy)]
struct OamDma {
    page: u8,
    idle: u8,
    index: u16,
    data: u8,
}

impl OamDma {
    fn new(page: u8, odd_cycle: bool) -> Self {
        Self {
            page,
            idle: 1 + u8::from(odd_cycle),
            index: 0,
            data: 0,
        }
    }

    /// One DMA cycle. Returns true when the transfer is complete.
    fn step(&mut self, bus: &mut NesBus) -> bool {
        if self.idle > 0 {
            self.idle -= 1;
            return false;
        }
        let offset = (self.index >> 1) as u8;
        if self.index & 1 == 0 {
            self.data = bus.read(u16::from_le_bytes([offset, self.page]));
        } else {
            bus.ppu.write_oam(offset, self.data);
        }
        self.index += 1;
        self.index == 512
    }
}

/// NES system.
pub struct Nes {
    cpu: Mos6502,
    bus: NesBus,
    config: NesConfig,
    /// Crystal ticks since power-on.
    master_clock: u64,
    cpu_cycles: u64,
    frame_count: u64,
    /// Set when the PPU finishes a frame; cleared by `run_frame`.
    frame_done: bool,
    oam_dma: Option<OamDma>,
    dmc_stall: u8,
    quit: QuitFlag,
    /// First fatal error, handed out once.
    error: Option<NesError>,
    throttle: Throttle,
    pacer: Pacer,
    sink: Box<dyn SampleSink>,
    audio_dropped: u64,
    dropped_this_frame: u64,
    dot_listeners: Vec<Box<dyn DotListener>>,
    presenter: Option<Box<dyn FramePresenter>>,
}

impl Nes {
    /// Build a machine around `cartridge` and power it on.
    #[must_use]
    pub fn new(cartridge: Box<dyn Cartridge>, config: NesConfig) -> Self {
        let region = config.region;
        let frame = MasterClock::new(region.crystal_hz())
            .duration_of(Ticks::new(region.ticks_per_frame()));
        let pacer = Pacer::new(
            Box::new(SystemClock::new()),
            frame,
            config.strict_timing,
            config.lag_tolerance_frames,
        );
        let bus = NesBus::new(
            cartridge,
            Ppu::new(region.scanlines_per_frame()),
            Apu::new(region.apu_region(), config.sample_rate),
        );

        let mut nes = Self {
            cpu: Mos6502::new(),
            bus,
            throttle: Throttle::new(config.throttle),
            config,
            master_clock: 0,
            cpu_cycles: 0,
            frame_count: 0,
            frame_done: false,
            oam_dma: None,
            dmc_stall: 0,
            quit: QuitFlag::new(),
            error: None,
            pacer,
            sink: Box::new(NullSink),
            audio_dropped: 0,
            dropped_this_frame: 0,
            dot_listeners: Vec::new(),
            presenter: None,
        };
        nes.power_on();
        nes
    }

    /// Cold start: CPU registers are drawn from the configured seed, RAM,
    /// PPU and APU are cleared and the CPU's reset sequence is queued.
    pub fn power_on(&mut self) {
        let region = self.config.region;
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.cpu = Mos6502::power_on(&mut rng);
        self.bus.ram = [0; 0x800];
        self.bus.ppu = Ppu::new(region.scanlines_per_frame());
        self.bus.apu = Apu::new(region.apu_region(), self.config.sample_rate);
        self.bus.oam_dma_page = None;
        self.master_clock = 0;
        self.cpu_cycles = 0;
        self.frame_count = 0;
        self.frame_done = false;
        self.oam_dma = None;
        self.dmc_stall = 0;
        self.error = None;
        info!(
            seed = self.config.seed,
            ?region,
            sample_rate = self.config.sample_rate,
            "power on"
        );
    }

    /// Warm reset: only the CPU's reset line is pulsed.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Advance to the end of the next CPU cycle.
    pub fn step_cpu_cycle(&mut self) -> Result<(), NesError> {
        let divisor = self.config.region.cpu_divisor();
        loop {
            if self.quit.is_requested() {
                return Err(self.take_error());
            }
            self.tick();
            if self.master_clock.is_multiple_of(divisor) {
                break;
            }
        }
        if self.quit.is_requested() {
            return Err(self.take_error());
        }
        Ok(())
    }

    /// Run until the PPU completes a frame, then pace.
    ///
    /// Returns the fatal error that stopped the machine the first time it
    /// is observed and [`NesError::QuitRequested`] afterwards.
    pub fn run_frame(&mut self) -> Result<(), NesError> {
        self.frame_done = false;
        while !self.frame_done {
            if self.quit.is_requested() {
                return Err(self.take_error());
            }
            self.tick();
        }
        if self.quit.is_requested() {
            return Err(self.take_error());
        }
        if let Err(e) = self.pacer.pace(self.throttle.get()) {
            self.fail(e);
            return Err(self.take_error());
        }
        Ok(())
    }

    /// Run frames until quit. A plain quit request is `Ok`.
    pub fn run(&mut self) -> Result<(), NesError> {
        loop {
            match self.run_frame() {
                Ok(()) => {}
                Err(NesError::QuitRequested) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }

    fn fail(&mut self, error: NesError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self.quit.request();
    }

    fn take_error(&mut self) -> NesError {
        self.error.take().unwrap_or(NesError::QuitRequested)
    }

    fn ppu_dot(&mut self) {
        let frame_done = self.bus.ppu.tick();
        self.cpu.set_nmi_line(self.bus.ppu.nmi_line());

        let (scanline, dot) = (self.bus.ppu.scanline(), self.bus.ppu.dot());
        for listener in &mut self.dot_listeners {
            listener.on_dot(scanline, dot);
        }

        if frame_done {
            self.frame_count += 1;
            self.frame_done = true;
            if self.dropped_this_frame > 0 {
                warn!(dropped = self.dropped_this_frame, "audio sink full");
                self.dropped_this_frame = 0;
            }
            if let Some(presenter) = self.presenter.as_mut() {
                presenter.present();
            }
        }
    }

    fn cpu_cycle(&mut self) {
        let odd_cycle = self.cpu_cycles & 1 == 1;
        self.cpu_cycles += 1;

        if let Some(page) = self.bus.oam_dma_page.take() {
            debug!(page, odd_cycle, "OAM DMA");
            self.oam_dma = Some(OamDma::new(page, odd_cycle));
        }
        if self.dmc_stall == 0
            && self.oam_dma.is_none()
            && self.bus.apu.dmc_dma_request().is_some()
        {
            self.dmc_stall = DMC_STALL_CYCLES;
        }

        if self.dmc_stall > 0 {
            self.dmc_stall -= 1;
            if self.dmc_stall == 0 {
                if let Some(addr) = self.bus.apu.dmc_dma_request() {
                    let byte = self.bus.peek(addr);
                    self.bus.apu.dmc_dma_complete(byte);
                }
            }
        } else if let Some(dma) = self.oam_dma.as_mut() {
            if dma.step(&mut self.bus) {
                self.oam_dma = None;
            }
        } else {
            self.cpu.tick(&mut self.bus);
            if let Some(fault) = self.cpu.take_fault() {
                self.fail(fault.into());
            }
        }

        if let Some(sample) = self.bus.apu.tick() {
            self.emit(sample);
        }
        let irq = self.bus.apu.irq_pending() || self.bus.cartridge.irq_pending();
        self.cpu.set_irq_line(irq);
        self.cpu.set_nmi_line(self.bus.ppu.nmi_line());
    }

    fn emit(&mut self, sample: f32) {
        let sample = self.bus.cartridge.shape_audio(sample);
        if !self.sink.push(sample) {
            self.audio_dropped += 1;
            self.dropped_this_frame += 1;
        }
    }

    /// Plug a device into controller port 0 or 1.
    pub fn connect(&mut self, port: usize, device: Box<dyn InputDevice>) -> Result<(), NesError> {
        self.bus.connect(port, device)
    }

    pub fn set_sample_sink(&mut self, sink: Box<dyn SampleSink>) {
        self.sink = sink;
    }

    pub fn add_dot_listener(&mut self, listener: impl DotListener + 'static) {
        self.dot_listeners.push(Box::new(listener));
    }

    pub fn set_frame_presenter(&mut self, presenter: impl FramePresenter + 'static) {
        self.presenter = Some(Box::new(presenter));
    }

    /// Replace the wall clock used for pacing.
    pub fn set_clock(&mut self, clock: Box<dyn MonotonicClock + Send>) {
        self.pacer.set_clock(clock);
    }

    /// Shared handle; raising it stops the machine at the next tick.
    #[must_use]
    pub fn quit_flag(&self) -> QuitFlag {
        self.quit.clone()
    }

    /// Shared handle to the speed multiplier.
    #[must_use]
    pub fn throttle(&self) -> Throttle {
        self.throttle.clone()
    }

    #[must_use]
    pub fn region(&self) -> NesRegion {
        self.config.region
    }

    #[must_use]
    pub fn cpu(&self) -> &Mos6502 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Mos6502 {
        &mut self.cpu
    }

    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    /// Crystal ticks since power-on.
    #[must_use]
    pub fn master_clock(&self) -> u64 {
        self.master_clock
    }

    /// CPU cycles since power-on, including cycles lost to DMA.
    #[must_use]
    pub fn cpu_cycles(&self) -> u64 {
        self.cpu_cycles
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Samples the sink refused.
    #[must_use]
    pub fn audio_dropped(&self) -> u64 {
        self.audio_dropped
    }
}

impl Tickable for Nes {
    fn tick(&mut self) {
        if self.quit.is_requested() {
            return;
        }
        self.master_clock += 1;
        let region = self.config.region;

        if self.master_clock.is_multiple_of(region.ppu_divisor()) {
            self.ppu_dot();
        }
        if self.master_clock.is_multiple_of(region.cpu_divisor()) {
            self.cpu_cycle();
        }
    }
}

fn parse_address(text: &str) -> Option<u16> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else if let Some(hex) = text.strip_prefix('$') {
        u16::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

impl Observable for Nes {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("ppu.") {
            self.bus.ppu.query(rest)
        } else if let Some(rest) = path.strip_prefix("apu.") {
            self.bus.apu.query(rest)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            parse_address(rest).map(|addr| Value::U8(self.bus.peek(addr)))
        } else {
            match path {
                "master_clock" => Some(self.master_clock.into()),
                "frame_count" => Some(self.frame_count.into()),
                "audio.dropped" => Some(self.audio_dropped.into()),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<6502_paths>",
            "apu.<2a03_paths>",
            "ppu.scanline",
            "ppu.dot",
            "ppu.frame",
            "ppu.vblank",
            "memory.<address>",
            "master_clock",
            "frame_count",
            "audio.dropped",
        ]
    }
}
