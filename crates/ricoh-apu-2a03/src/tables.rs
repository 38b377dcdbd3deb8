//! Fixed lookup tables.

use crate::Region;

/// Length counter load values, indexed by the top five bits of the
/// length/timer-high register.
pub(crate) const LENGTH_TABLE: [u8; 32] = [
    10, 254, 20, 2, 40, 4, 80, 6, 160, 8, 60, 10, 14, 12, 26, 14, 12, 16, 24, 18, 48, 20, 96,
    22, 192, 24, 72, 26, 16, 28, 32, 30,
];

/// Pulse waveforms, one bit per sequencer phase: 12.5%, 25%, 50% and
/// 75% (inverted 25%).
pub(crate) const DUTY_MASKS: [u8; 4] = [0x02, 0x06, 0x1E, 0xF9];

const NOISE_PERIODS_NTSC: [u16; 16] = [
    4, 8, 16, 32, 64, 96, 128, 160, 202, 254, 380, 508, 762, 1016, 2034, 4068,
];

const NOISE_PERIODS_PAL: [u16; 16] = [
    4, 8, 14, 30, 60, 88, 118, 148, 188, 236, 354, 472, 708, 944, 1890, 3778,
];

/// CPU cycles per DMC output bit.
const DMC_RATES_NTSC: [u16; 16] = [
    428, 380, 340, 320, 286, 254, 226, 214, 190, 160, 142, 128, 106, 84, 72, 54,
];

const DMC_RATES_PAL: [u16; 16] = [
    398, 354, 316, 298, 276, 236, 210, 198, 176, 148, 132, 118, 98, 78, 66, 50,
];

/// Frame sequencer step thresholds in CPU cycles (4-step, then 5-step).
const FRAME_STEPS_NTSC: ([u32; 4], [u32; 5]) = (
    [7457, 14913, 22371, 29829],
    [7457, 14913, 22371, 29829, 37281],
);

const FRAME_STEPS_PAL: ([u32; 4], [u32; 5]) = (
    [8313, 16627, 24939, 33253],
    [8313, 16627, 24939, 33253, 41565],
);

pub(crate) fn noise_periods(region: Region) -> &'static [u16; 16] {
    match region {
        Region::Ntsc => &NOISE_PERIODS_NTSC,
        Region::Pal => &NOISE_PERIODS_PAL,
    }
}

pub(crate) fn dmc_rates(region: Region) -> &'static [u16; 16] {
    match region {
        Region::Ntsc => &DMC_RATES_NTSC,
        Region::Pal => &DMC_RATES_PAL,
    }
}

pub(crate) fn frame_steps(region: Region) -> &'static ([u32; 4], [u32; 5]) {
    match region {
        Region::Ntsc => &FRAME_STEPS_NTSC,
        Region::Pal => &FRAME_STEPS_PAL,
    }
}
