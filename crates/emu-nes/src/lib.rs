//! Cycle-accurate NES system.
//!
//! Ties the 6502 core, APU and PPU timing model to a cartridge through
//! the NES bus, and drives them from one master clock. The NTSC crystal
//! ticks at 21,477,272 Hz; the PPU runs at crystal/4 and the CPU at
//! crystal/12, a 3:1 dot-to-cycle ratio. PAL divides by 5 and 16.
//!
//! One NTSC frame = 341 dots × 262 scanlines = 89,342 PPU dots.

mod audio;
mod bus;
mod config;
mod controller;
mod error;
mod listener;
mod nes;
mod pacing;
mod quit;

pub use audio::{NullSink, RingSink, SampleSink, VecSink};
pub use bus::{NesBus, PORTS, open_bus};
pub use config::{DEFAULT_SEED, NesConfig, NesRegion};
pub use controller::{InputDevice, InputSnapshot, NesButton, StandardController, button};
pub use error::NesError;
pub use listener::{DotListener, FramePresenter};
pub use nes::Nes;
pub use pacing::{Pacer, SystemClock, Throttle};
pub use quit::QuitFlag;
