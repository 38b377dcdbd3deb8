//! The interface every APU voice presents to the frame sequencer and
//! register decoder.

pub trait Channel {
    /// Advance the channel timer by one of its clocks.
    fn step(&mut self);

    /// Envelope and linear counter clock.
    fn quarter_frame(&mut self) {}

    /// Length counter and sweep clock.
    fn half_frame(&mut self) {}

    /// Register write; `register` is the offset within the channel's
    /// four-byte block.
    fn write(&mut self, register: u8, value: u8);

    /// Instantaneous output: 0-15, or 0-127 for the DMC. No side effects.
    fn level(&self) -> u8;

    /// `$4015` enable bit.
    fn set_enabled(&mut self, enabled: bool);

    /// `$4015` status bit.
    fn is_active(&self) -> bool;
}
