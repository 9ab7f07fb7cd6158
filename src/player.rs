use std::{fmt, result};

use enum_iterator::{cardinality, Sequence};
use thiserror::Error;

/// One of the logical seats a controller can be bound to
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Sequence)]
pub enum Player {
    One,
    Two,
    Three,
    Four,
}

impl Player {
    pub const COUNT: usize = cardinality::<Self>();

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
            Self::Three => 2,
            Self::Four => 3,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

impl From<Player> for usize {
    fn from(player: Player) -> Self {
        player.index()
    }
}

impl TryFrom<usize> for Player {
    type Error = FromPlayerError;

    fn try_from(src: usize) -> result::Result<Self, Self::Error> {
        match src {
            0 => Ok(Self::One),
            1 => Ok(Self::Two),
            2 => Ok(Self::Three),
            3 => Ok(Self::Four),
            _ => Err(FromPlayerError(src)),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid player index {0}")]
pub struct FromPlayerError(pub usize);

/// Intended haptic intensity, 0..=9
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Gain(u8);

impl Gain {
    pub const MAX: Self = Self(9);

    /// Clamps into range
    pub fn saturating(value: i64) -> Self {
        Self(value.clamp(0, i64::from(Self::MAX.0)) as u8)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<Gain> for i32 {
    fn from(gain: Gain) -> Self {
        i32::from(gain.0)
    }
}

#[cfg(test)]
mod tests {
    use enum_iterator::all;

    use super::{Gain, Player};

    #[test]
    fn player_index_round_trips() {
        let players = all::<Player>().collect::<Vec<_>>();
        assert_eq!(players.len(), Player::COUNT);
        assert_eq!(Player::COUNT, 4);

        for (i, player) in players.into_iter().enumerate() {
            assert_eq!(player.index(), i);
            assert_eq!(Player::try_from(i), Ok(player));
        }

        assert!(Player::try_from(4).is_err());
    }

    #[test]
    fn gain_saturates() {
        let tests = [(-3, 0), (0, 0), (5, 5), (9, 9), (10, 9), (1000, 9)];

        for (raw, expected) in tests.into_iter() {
            let gain = Gain::saturating(raw);
            assert_eq!(
                gain.get(),
                expected,
                "expected gain({raw}) = {expected}, was {}",
                gain.get()
            );
        }
    }
}
