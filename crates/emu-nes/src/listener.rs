//! Per-dot and per-frame callbacks.

/// Notified once per PPU dot, after the dot has been processed.
pub trait DotListener: Send {
    fn on_dot(&mut self, scanline: u16, dot: u16);
}

impl<F: FnMut(u16, u16) + Send> DotListener for F {
    fn on_dot(&mut self, scanline: u16, dot: u16) {
        self(scanline, dot);
    }
}

/// Invoked once per completed frame.
pub trait FramePresenter: Send {
    fn present(&mut self);
}

impl<F: FnMut() + Send> FramePresenter for F {
    fn present(&mut self) {
        self();
    }
}
