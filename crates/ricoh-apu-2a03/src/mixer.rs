//! Non-linear output mixer.

/// Instantaneous channel outputs: pulses, triangle and noise 0-15, DMC
/// 0-127.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelLevels {
    pub pulse1: u8,
    pub pulse2: u8,
    pub triangle: u8,
    pub noise: u8,
    pub dmc: u8,
}

/// Mix five channel levels into one sample in `-1.0..=1.0`.
///
/// Uses the approximation of the analog mixing network rather than a
/// linear sum, rescaled with `2x - 1`. Silence is exactly `-1.0`.
#[must_use]
pub fn mix(levels: ChannelLevels) -> f32 {
    let pulse_sum = f32::from(levels.pulse1) + f32::from(levels.pulse2);
    let pulse = if pulse_sum > 0.0 {
        95.88 / (8128.0 / pulse_sum + 100.0)
    } else {
        0.0
    };

    let tnd = if levels.triangle | levels.noise | levels.dmc != 0 {
        let sum = f32::from(levels.triangle) / 8227.0
            + f32::from(levels.noise) / 12241.0
            + f32::from(levels.dmc) / 22638.0;
        159.79 / (1.0 / sum + 100.0)
    } else {
        0.0
    };

    2.0 * (pulse + tnd) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_is_exactly_minus_one() {
        assert_eq!(mix(ChannelLevels::default()), -1.0);
    }

    #[test]
    fn full_scale_reaches_plus_one() {
        let loudest = mix(ChannelLevels {
            pulse1: 15,
            pulse2: 15,
            triangle: 15,
            noise: 15,
            dmc: 127,
        });
        assert!((loudest - 1.0).abs() < 1e-3, "{loudest}");
    }

    #[test]
    fn pulse_mixing_is_not_linear() {
        let one = mix(ChannelLevels {
            pulse1: 15,
            ..ChannelLevels::default()
        }) + 1.0;
        let two = mix(ChannelLevels {
            pulse1: 15,
            pulse2: 15,
            ..ChannelLevels::default()
        }) + 1.0;
        assert!(two < 2.0 * one);
        assert!(two > one);
    }
}
