//! Per-player bookkeeping of haptic devices and the effects uploaded to them.
//!
//! The registry owns every opened device. A player's effect handle at index
//! `i` only exists while that player has a device open and catalog slot `i`
//! holds a definition.

use enum_iterator::all;

use crate::backend::{HapticDevice, HapticSubsystem};
use crate::effect::{EffectDefinition, MAX_EFFECTS};
use crate::error::{HapticsError, Result};
use crate::player::{Gain, Player};
use crate::settings::{enabled_key, gain_key, ConfigReader, ConfigWriter};

struct PlayerBinding<D: HapticDevice> {
    enabled: bool,
    gain: Gain,
    device: Option<D>,
    effects: [Option<D::Effect>; MAX_EFFECTS],
}

impl<D: HapticDevice> Default for PlayerBinding<D> {
    fn default() -> Self {
        Self {
            enabled: false,
            gain: Gain::default(),
            device: None,
            effects: std::array::from_fn(|_| None),
        }
    }
}

impl<D: HapticDevice> PlayerBinding<D> {
    /// Upload `definition` into slot `index`, erasing whatever was there first.
    /// Returns false if the device refused the effect.
    fn instantiate(&mut self, player: Player, index: usize, definition: &EffectDefinition) -> bool {
        let Some(device) = self.device.as_mut() else {
            return false;
        };

        if let Some(previous) = self.effects[index].take() {
            device.destroy_effect(previous);
        }

        match device.new_effect(definition) {
            Ok(effect) => {
                self.effects[index] = Some(effect);
                true
            }
            Err(e) => {
                log::warn!(
                    "Unable to register effect {} with player {}: {}",
                    index,
                    player,
                    e
                );
                false
            }
        }
    }

    fn release(&mut self) -> Option<String> {
        let Some(mut device) = self.device.take() else {
            self.effects.iter_mut().for_each(|effect| *effect = None);
            return None;
        };

        // Effects are erased through the device before it is closed
        for effect in self.effects.iter_mut().filter_map(Option::take) {
            device.destroy_effect(effect);
        }

        let name = device.name().to_string();
        device.close();
        Some(name)
    }
}

pub struct HapticsRegistry<S: HapticSubsystem> {
    subsystem: S,
    enabled: bool,
    catalog: [Option<EffectDefinition>; MAX_EFFECTS],
    players: [PlayerBinding<S::Device>; Player::COUNT],
}

impl<S: HapticSubsystem> HapticsRegistry<S> {
    /// Start the haptics subsystem with an empty catalog and no devices bound
    pub fn init(mut subsystem: S) -> Result<Self> {
        subsystem
            .init()
            .map_err(HapticsError::SubsystemUnavailable)?;

        log::info!("Haptics initialized");

        Ok(Self {
            subsystem,
            enabled: true,
            catalog: [None; MAX_EFFECTS],
            players: std::array::from_fn(|_| PlayerBinding::default()),
        })
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling stops everything that is currently playing
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.stop_all();
        }
    }

    pub fn player_enabled(&self, player: Player) -> bool {
        self.players[player.index()].enabled
    }

    pub fn player_set_enabled(&mut self, player: Player, enabled: bool) {
        self.players[player.index()].enabled = enabled;
        if !enabled {
            self.player_stop_all(player);
        }
    }

    pub fn player_gain(&self, player: Player) -> Gain {
        self.players[player.index()].gain
    }

    /// Stores the preferred intensity. The value is kept for the host and
    /// persisted with the settings; it does not scale playback.
    pub fn player_set_gain(&mut self, player: Player, value: u8) {
        let gain = Gain::saturating(i64::from(value));
        if gain.get() != value {
            log::warn!(
                "Gain {} for player {} out of range, clamped to {}",
                value,
                player,
                gain.get()
            );
        }
        self.players[player.index()].gain = gain;
    }

    pub fn has_device(&self, player: Player) -> bool {
        self.players[player.index()].device.is_some()
    }

    pub fn device_name(&self, player: Player) -> Option<&str> {
        self.players[player.index()]
            .device
            .as_ref()
            .map(|device| device.name())
    }

    pub fn is_effect_bound(&self, player: Player, index: usize) -> bool {
        self.players[player.index()]
            .effects
            .get(index)
            .is_some_and(Option::is_some)
    }

    pub fn effect(&self, index: usize) -> Option<&EffectDefinition> {
        self.catalog.get(index).and_then(Option::as_ref)
    }

    /// Number of occupied catalog slots
    pub fn catalog_len(&self) -> usize {
        self.catalog.iter().filter(|slot| slot.is_some()).count()
    }

    /// Store `definition` in the first free catalog slot and upload it to
    /// every open device.
    pub fn register_effect(&mut self, definition: EffectDefinition) -> Result<usize> {
        let index = self
            .catalog
            .iter()
            .position(Option::is_none)
            .ok_or(HapticsError::CatalogFull)?;

        self.store_effect(definition, index);
        Ok(index)
    }

    /// Store `definition` at `index`, replacing any existing definition, and
    /// upload it to every open device.
    pub fn register_effect_at(&mut self, definition: EffectDefinition, index: usize) -> Result<()> {
        if index >= MAX_EFFECTS {
            return Err(HapticsError::InvalidEffectIndex(index));
        }
        self.store_effect(definition, index);
        Ok(())
    }

    /// Replace the definition at `index`. Device-side instances are erased and
    /// uploaded again; a device refusing the new definition leaves that player
    /// with the effect unbound.
    pub fn set_effect(&mut self, definition: EffectDefinition, index: usize) -> Result<()> {
        self.register_effect_at(definition, index)
    }

    fn store_effect(&mut self, definition: EffectDefinition, index: usize) {
        log::debug!("Registering {} effect at {}", definition.kind_name(), index);
        self.catalog[index] = Some(definition);

        for (player, binding) in all::<Player>().zip(self.players.iter_mut()) {
            binding.instantiate(player, index, &definition);
        }
    }

    /// Clear catalog slot `index` and erase the effect from every device
    pub fn remove_effect(&mut self, index: usize) -> Result<()> {
        if index >= MAX_EFFECTS {
            return Err(HapticsError::InvalidEffectIndex(index));
        }
        self.catalog[index] = None;

        for binding in self.players.iter_mut() {
            let PlayerBinding {
                device, effects, ..
            } = binding;
            if let (Some(device), Some(effect)) = (device.as_mut(), effects[index].take()) {
                device.destroy_effect(effect);
            }
        }
        Ok(())
    }

    /// Bind the device identified by `source` to `player` and upload every
    /// registered effect to it. Effects the device refuses stay unbound.
    pub fn open_device_for_player(&mut self, source: &S::Source, player: Player) -> Result<()> {
        if self.has_device(player) {
            log::info!("Player {} already has a device, replacing it", player);
            self.close_device_for_player(player);
        }

        let device = self
            .subsystem
            .open(source)
            .map_err(|source| HapticsError::DeviceOpen { player, source })?;

        log::info!("Bound {} to player {}", device.name(), player);

        let binding = &mut self.players[player.index()];
        binding.device = Some(device);

        let mut bound = 0;
        for (index, definition) in self.catalog.iter().enumerate() {
            if let Some(definition) = definition {
                if binding.instantiate(player, index, definition) {
                    bound += 1;
                }
            }
        }
        log::debug!("Player {} has {} effects bound", player, bound);

        Ok(())
    }

    /// Release the player's device and forget its effect handles
    pub fn close_device_for_player(&mut self, player: Player) {
        if let Some(name) = self.players[player.index()].release() {
            log::info!("Released {} from player {}", name, player);
        }
    }

    /// Call when a controller disconnects. Playback is stopped before the
    /// device is closed, then the player is disabled.
    pub fn on_controller_removed(&mut self, player: Player) {
        self.player_stop_all(player);
        self.close_device_for_player(player);
        self.player_set_enabled(player, false);
    }

    /// Play an effect if haptics are enabled globally and for the player and
    /// the effect is bound on the player's device. Otherwise does nothing.
    pub fn player_run_effect(&mut self, player: Player, index: usize, iterations: u32) {
        if !self.enabled {
            return;
        }

        let PlayerBinding {
            enabled,
            device,
            effects,
            ..
        } = &mut self.players[player.index()];

        if !*enabled {
            return;
        }
        let (Some(device), Some(Some(effect))) = (device.as_mut(), effects.get_mut(index)) else {
            return;
        };

        if let Err(e) = device.run_effect(effect, iterations) {
            log::warn!("Failed to run effect {} for player {}: {}", index, player, e);
        }
    }

    /// Replace the parameters of one player's instance of an effect without
    /// touching the catalog. Does nothing if the effect is not bound.
    pub fn player_update_effect(
        &mut self,
        player: Player,
        index: usize,
        definition: &EffectDefinition,
    ) {
        let PlayerBinding {
            device, effects, ..
        } = &mut self.players[player.index()];

        let (Some(device), Some(Some(effect))) = (device.as_mut(), effects.get_mut(index)) else {
            return;
        };

        if let Err(e) = device.update_effect(effect, definition) {
            log::warn!("Failed to update effect {} for player {}: {}", index, player, e);
        }
    }

    pub fn player_stop_effect(&mut self, player: Player, index: usize) {
        let PlayerBinding {
            device, effects, ..
        } = &mut self.players[player.index()];

        let (Some(device), Some(Some(effect))) = (device.as_mut(), effects.get_mut(index)) else {
            return;
        };

        if let Err(e) = device.stop_effect(effect) {
            log::warn!("Failed to stop effect {} for player {}: {}", index, player, e);
        }
    }

    pub fn pause_all(&mut self) {
        for player in all::<Player>() {
            self.player_pause_all(player);
        }
    }

    pub fn unpause_all(&mut self) {
        for player in all::<Player>() {
            self.player_unpause_all(player);
        }
    }

    pub fn stop_all(&mut self) {
        for player in all::<Player>() {
            self.player_stop_all(player);
        }
    }

    pub fn player_pause_all(&mut self, player: Player) {
        self.with_device(player, "pause", HapticDevice::pause);
    }

    pub fn player_unpause_all(&mut self, player: Player) {
        self.with_device(player, "unpause", HapticDevice::unpause);
    }

    pub fn player_stop_all(&mut self, player: Player) {
        self.with_device(player, "stop", HapticDevice::stop_all);
    }

    fn with_device(
        &mut self,
        player: Player,
        action: &str,
        op: impl FnOnce(&mut S::Device) -> anyhow::Result<()>,
    ) {
        if let Some(device) = self.players[player.index()].device.as_mut() {
            if let Err(e) = op(device) {
                log::warn!("Failed to {} effects for player {}: {}", action, player, e);
            }
        }
    }

    /// Stop and release every open device. Safe to call more than once.
    pub fn close(&mut self) {
        for player in all::<Player>() {
            if self.has_device(player) {
                self.player_stop_all(player);
                self.close_device_for_player(player);
            }
        }
    }

    /// Read each player's enabled flag and gain. Keys the reader does not
    /// have leave the current value alone.
    pub fn settings_load(&mut self, reader: &dyn ConfigReader) {
        for (player, binding) in all::<Player>().zip(self.players.iter_mut()) {
            if let Some(value) = reader.get_int(&enabled_key(player)) {
                binding.enabled = value != 0;
            }
            if let Some(value) = reader.get_int(&gain_key(player)) {
                binding.gain = Gain::saturating(i64::from(value));
                if i32::from(binding.gain) != value {
                    log::warn!(
                        "Stored gain {} for player {} out of range, clamped to {}",
                        value,
                        player,
                        binding.gain.get()
                    );
                }
            }
        }
    }

    pub fn settings_save(&self, writer: &mut dyn ConfigWriter) -> anyhow::Result<()> {
        for (player, binding) in all::<Player>().zip(self.players.iter()) {
            writer.set_int(&enabled_key(player), i32::from(binding.enabled))?;
            writer.set_int(&gain_key(player), i32::from(binding.gain))?;
        }
        Ok(())
    }
}

impl<S: HapticSubsystem> Drop for HapticsRegistry<S> {
    fn drop(&mut self) {
        self.close();
    }
}
