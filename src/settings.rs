//! Key/value boundary used to persist per-player preferences.
//!
//! The host supplies the storage; the registry only knows key names.

use std::collections::BTreeMap;

use crate::player::Player;

pub trait ConfigReader {
    /// Returns `None` when the key is not present
    fn get_int(&self, key: &str) -> Option<i32>;
}

pub trait ConfigWriter {
    fn set_int(&mut self, key: &str, value: i32) -> anyhow::Result<()>;
}

pub fn enabled_key(player: Player) -> String {
    format!("haptics_player_{}_enabled", player.index())
}

pub fn gain_key(player: Player) -> String {
    format!("haptics_player_{}_gain", player.index())
}

impl ConfigReader for BTreeMap<String, i32> {
    fn get_int(&self, key: &str) -> Option<i32> {
        self.get(key).copied()
    }
}

impl ConfigWriter for BTreeMap<String, i32> {
    fn set_int(&mut self, key: &str, value: i32) -> anyhow::Result<()> {
        self.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{enabled_key, gain_key};
    use crate::player::Player;

    #[test]
    fn key_names() {
        assert_eq!(enabled_key(Player::One), "haptics_player_0_enabled");
        assert_eq!(gain_key(Player::Four), "haptics_player_3_gain");
    }
}
