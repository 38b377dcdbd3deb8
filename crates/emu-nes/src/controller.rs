//! Controller ports.
//!
//! A port device sees the strobe bit written to `$4016` and answers one
//! bit per read of its data register. The standard pad is an 8-bit shift
//! register: strobe high keeps reloading it from the live button state,
//! the falling edge latches, and each read shifts out one button.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Button bit positions in the shift order.
pub mod button {
    pub const A: u8 = 0;
    pub const B: u8 = 1;
    pub const SELECT: u8 = 2;
    pub const START: u8 = 3;
    pub const UP: u8 = 4;
    pub const DOWN: u8 = 5;
    pub const LEFT: u8 = 6;
    pub const RIGHT: u8 = 7;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NesButton {
    A,
    B,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
}

impl NesButton {
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::A => button::A,
            Self::B => button::B,
            Self::Select => button::SELECT,
            Self::Start => button::START,
            Self::Up => button::UP,
            Self::Down => button::DOWN,
            Self::Left => button::LEFT,
            Self::Right => button::RIGHT,
        }
    }

    const fn mask(self) -> u8 {
        1 << self.bit()
    }
}

/// Anything plugged into a controller port.
pub trait InputDevice: Send {
    /// `$4016` write: bit 0 of the written value.
    fn on_write(&mut self, strobe: bool);

    /// Data register read. Returns the serial data bit.
    fn on_read(&mut self) -> bool;
}

/// Live button state published by the input worker.
///
/// One writer (the input worker) and one reader (the emulation thread).
/// Clones share the same byte.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot(Arc<AtomicU8>);

impl InputSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole button byte.
    pub fn set(&self, buttons: u8) {
        self.0.store(buttons, Ordering::Release);
    }

    pub fn press(&self, button: NesButton) {
        self.0.fetch_or(button.mask(), Ordering::AcqRel);
    }

    pub fn release(&self, button: NesButton) {
        self.0.fetch_and(!button.mask(), Ordering::AcqRel);
    }

    #[must_use]
    pub fn get(&self) -> u8 {
        self.0.load(Ordering::Acquire)
    }
}

/// The standard eight-button pad.
#[derive(Debug)]
pub struct StandardController {
    input: InputSnapshot,
    shift_register: u8,
    strobe: bool,
}

impl StandardController {
    #[must_use]
    pub fn new(input: InputSnapshot) -> Self {
        Self {
            input,
            shift_register: 0,
            strobe: false,
        }
    }
}

impl InputDevice for StandardController {
    fn on_write(&mut self, strobe: bool) {
        if strobe || self.strobe {
            self.shift_register = self.input.get();
        }
        self.strobe = strobe;
    }

    fn on_read(&mut self) -> bool {
        if self.strobe {
            return self.input.get() & 1 != 0;
        }
        let bit = self.shift_register & 1 != 0;
        // Ones shift in behind the buttons
        self.shift_register = (self.shift_register >> 1) | 0x80;
        bit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(pad: &mut StandardController) -> Vec<bool> {
        (0..8).map(|_| pad.on_read()).collect()
    }

    #[test]
    fn strobe_latch_and_read() {
        let input = InputSnapshot::new();
        let mut pad = StandardController::new(input.clone());
        input.press(NesButton::A);
        input.press(NesButton::Start);

        pad.on_write(true);
        pad.on_write(false);

        assert_eq!(
            read_all(&mut pad),
            [true, false, false, true, false, false, false, false]
        );
        assert!(pad.on_read());
        assert!(pad.on_read());
    }

    #[test]
    fn strobe_high_reports_a_continuously() {
        let input = InputSnapshot::new();
        let mut pad = StandardController::new(input.clone());
        input.press(NesButton::A);
        pad.on_write(true);

        assert!(pad.on_read());
        assert!(pad.on_read());

        input.release(NesButton::A);
        assert!(!pad.on_read());
    }

    #[test]
    fn latched_state_ignores_later_presses() {
        let input = InputSnapshot::new();
        let mut pad = StandardController::new(input.clone());
        pad.on_write(true);
        pad.on_write(false);
        input.press(NesButton::A);
        assert!(!pad.on_read());
    }

    #[test]
    fn snapshot_set_replaces_all_buttons() {
        let input = InputSnapshot::new();
        input.press(NesButton::Left);
        input.set(0x03);
        assert_eq!(input.get(), 0x03);
        input.release(NesButton::B);
        assert_eq!(input.get(), 0x01);
        assert_eq!(NesButton::Right.bit(), 7);
    }
}
