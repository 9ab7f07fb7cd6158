use serde::{Deserialize, Serialize};

/// Number of slots in the effect catalog
pub const MAX_EFFECTS: usize = 32;

/// Shape of a periodic force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
}

/// A force feedback waveform that can be stored in the catalog and
/// instantiated on any player's device.
///
/// Durations are milliseconds. Direction is polar, in hundredths of a degree
/// (0 = north, 9000 = east).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectDefinition {
    Periodic {
        waveform: Waveform,
        direction: u16,
        period: u16,
        magnitude: i16,
        length: u16,
        attack_length: u16,
        attack_level: u16,
        fade_length: u16,
        fade_level: u16,
    },
    /// Dual motor rumble
    LeftRight {
        length: u16,
        large_magnitude: u16,
        small_magnitude: u16,
    },
}

impl EffectDefinition {
    /// Periodic effect with no envelope, pointing north
    pub const fn periodic(waveform: Waveform, period: u16, magnitude: i16, length: u16) -> Self {
        Self::Periodic {
            waveform,
            direction: 0,
            period,
            magnitude,
            length,
            attack_length: 0,
            attack_level: 0,
            fade_length: 0,
            fade_level: 0,
        }
    }

    pub const fn left_right(length: u16, large_magnitude: u16, small_magnitude: u16) -> Self {
        Self::LeftRight {
            length,
            large_magnitude,
            small_magnitude,
        }
    }

    pub const fn with_envelope(self, attack: u16, fade: u16) -> Self {
        match self {
            Self::Periodic {
                waveform,
                direction,
                period,
                magnitude,
                length,
                attack_level,
                fade_level,
                ..
            } => Self::Periodic {
                waveform,
                direction,
                period,
                magnitude,
                length,
                attack_length: attack,
                attack_level,
                fade_length: fade,
                fade_level,
            },
            other => other,
        }
    }

    pub const fn length(&self) -> u16 {
        match self {
            Self::Periodic { length, .. } | Self::LeftRight { length, .. } => *length,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Periodic {
                waveform: Waveform::Sine,
                ..
            } => "sine",
            Self::Periodic {
                waveform: Waveform::Triangle,
                ..
            } => "triangle",
            Self::LeftRight { .. } => "leftright",
        }
    }
}

/// Effects the demo host registers on startup
pub mod presets {
    use super::{EffectDefinition, Waveform};

    pub const NUDGE_INDEX: usize = 1;
    pub const LASER_INDEX: usize = 2;
    pub const EXPLODE_INDEX: usize = 3;
    pub const LEFTRIGHT1_INDEX: usize = 4;
    pub const LEFTRIGHT2_INDEX: usize = 5;

    pub const NUDGE: EffectDefinition = EffectDefinition::periodic(Waveform::Sine, 25, 15000, 100);

    pub const LASER: EffectDefinition =
        EffectDefinition::periodic(Waveform::Triangle, 2, 12000, 800).with_envelope(10, 20);

    pub const EXPLODE: EffectDefinition =
        EffectDefinition::periodic(Waveform::Sine, 80, 20000, 600).with_envelope(0, 550);

    pub const LEFTRIGHT1: EffectDefinition = EffectDefinition::left_right(700, 32767, 0);
    pub const LEFTRIGHT2: EffectDefinition = EffectDefinition::left_right(700, 0, 32767);

    /// (index, label, definition) for every preset
    pub const ALL: [(usize, &str, EffectDefinition); 5] = [
        (NUDGE_INDEX, "Nudge", NUDGE),
        (LASER_INDEX, "Laser", LASER),
        (EXPLODE_INDEX, "Explode", EXPLODE),
        (LEFTRIGHT1_INDEX, "Left/Right 1", LEFTRIGHT1),
        (LEFTRIGHT2_INDEX, "Left/Right 2", LEFTRIGHT2),
    ];
}

#[cfg(test)]
mod tests {
    use super::{presets, EffectDefinition, Waveform, MAX_EFFECTS};

    #[test]
    fn envelope_only_applies_to_periodic() {
        let laser = presets::LASER;
        match laser {
            EffectDefinition::Periodic {
                waveform,
                attack_length,
                fade_length,
                length,
                ..
            } => {
                assert_eq!(waveform, Waveform::Triangle);
                assert_eq!(attack_length, 10);
                assert_eq!(fade_length, 20);
                assert_eq!(length, 800);
            }
            other => panic!("expected periodic laser, got {other:?}"),
        }

        let rumble = EffectDefinition::left_right(100, 1, 2).with_envelope(5, 5);
        assert_eq!(rumble, EffectDefinition::left_right(100, 1, 2));
    }

    #[test]
    fn presets_fit_in_catalog() {
        for (index, label, definition) in presets::ALL {
            assert!(index < MAX_EFFECTS, "{label} index {index} out of range");
            assert!(definition.length() > 0, "{label} should have a length");
        }
    }

    #[test]
    fn definitions_serialize_with_type_tag() {
        let json = serde_json::to_value(presets::LEFTRIGHT1).unwrap();
        assert_eq!(json["type"], "left_right");
        assert_eq!(json["large_magnitude"], 32767);

        let json = serde_json::to_value(presets::NUDGE).unwrap();
        assert_eq!(json["type"], "periodic");
        assert_eq!(json["waveform"], "sine");
    }
}
