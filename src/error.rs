use thiserror::Error;

use crate::effect::MAX_EFFECTS;
use crate::player::Player;

#[derive(Error, Debug)]
pub enum HapticsError {
    #[error("haptics subsystem unavailable: {0}")]
    SubsystemUnavailable(#[source] anyhow::Error),
    #[error("failed to open haptic device for player {player}: {source}")]
    DeviceOpen {
        player: Player,
        #[source]
        source: anyhow::Error,
    },
    #[error("effect catalog is full ({max} slots)", max = MAX_EFFECTS)]
    CatalogFull,
    #[error("effect index {0} out of range (expected < {max})", max = MAX_EFFECTS)]
    InvalidEffectIndex(usize),
}

pub type Result<T> = std::result::Result<T, HapticsError>;
