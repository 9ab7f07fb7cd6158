use enum_iterator::all;
use padhaptics::Player;

/// Seats controllers in the first free player slot
#[derive(Debug)]
pub struct PlayerSlots<K> {
    seats: [Option<K>; Player::COUNT],
}

impl<K> Default for PlayerSlots<K> {
    fn default() -> Self {
        Self {
            seats: std::array::from_fn(|_| None),
        }
    }
}

impl<K: Copy + PartialEq> PlayerSlots<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the player already holding `key`, or seats it in the lowest
    /// free slot. `None` when every slot is taken.
    pub fn assign(&mut self, key: K) -> Option<Player> {
        if let Some(player) = self.player_of(key) {
            return Some(player);
        }
        let player = all::<Player>().find(|p| self.seats[p.index()].is_none())?;
        self.seats[player.index()] = Some(key);
        Some(player)
    }

    pub fn release(&mut self, key: K) -> Option<Player> {
        let player = self.player_of(key)?;
        self.seats[player.index()] = None;
        Some(player)
    }

    pub fn player_of(&self, key: K) -> Option<Player> {
        all::<Player>().find(|p| self.seats[p.index()] == Some(key))
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerSlots;
    use padhaptics::Player;

    #[test]
    fn assigns_lowest_free_slot() {
        let mut slots = PlayerSlots::new();

        assert_eq!(slots.assign(10), Some(Player::One));
        assert_eq!(slots.assign(11), Some(Player::Two));
        assert_eq!(slots.assign(10), Some(Player::One));

        assert_eq!(slots.release(10), Some(Player::One));
        assert_eq!(slots.release(10), None);
        assert_eq!(slots.assign(12), Some(Player::One));
        assert_eq!(slots.player_of(11), Some(Player::Two));
    }

    #[test]
    fn full_when_every_player_seated() {
        let mut slots = PlayerSlots::new();
        for key in 0..Player::COUNT {
            assert!(slots.assign(key).is_some());
        }

        assert_eq!(slots.assign(99), None);
        assert_eq!(slots.player_of(99), None);
    }
}
