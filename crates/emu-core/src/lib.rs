//! Core traits and types for cycle-accurate emulation.
//!
//! Everything is driven from a master crystal. Chips advance in fixed
//! ratios of it and talk to each other only through a [`Bus`].

mod bus;
mod clock;
mod cpu;
mod observable;
mod tickable;
mod ticks;

pub use bus::{Bus, SimpleBus};
pub use clock::{MasterClock, MonotonicClock};
pub use cpu::Cpu;
pub use observable::{Observable, Value};
pub use tickable::Tickable;
pub use ticks::Ticks;
