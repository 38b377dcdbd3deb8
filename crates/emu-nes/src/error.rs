use std::time::Duration;

use mos_6502::CpuFault;
use nes_cartridge::CartridgeError;
use thiserror::Error;

/// Why the machine stopped or refused a request.
#[derive(Debug, Error)]
pub enum NesError {
    #[error("cartridge: {0}")]
    Cartridge(#[from] CartridgeError),

    #[error("CPU stopped: {0}")]
    Cpu(#[from] CpuFault),

    #[error("emulation fell {behind:?} behind real time")]
    PacingShortfall { behind: Duration },

    #[error("no controller port {port}")]
    PortUnavailable { port: usize },

    #[error("controller port {port} already has a device")]
    PortOccupied { port: usize },

    #[error("quit requested")]
    QuitRequested,
}
