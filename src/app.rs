use crate::input::{ControllerEvent, InputReader, PlayerSlots};
use eframe::egui;
use enum_iterator::all;
use gilrs::GamepadId;
use padhaptics::backend::PlatformSubsystem;
use padhaptics::config::JsonSettings;
use padhaptics::effect::presets;
use padhaptics::settings::enabled_key;
use padhaptics::{ConfigReader, HapticsRegistry, Player};

const EFFECT_KEYS: [(egui::Key, usize); 5] = [
    (egui::Key::Num1, presets::NUDGE_INDEX),
    (egui::Key::Num2, presets::LASER_INDEX),
    (egui::Key::Num3, presets::EXPLODE_INDEX),
    (egui::Key::Num4, presets::LEFTRIGHT1_INDEX),
    (egui::Key::Num5, presets::LEFTRIGHT2_INDEX),
];

/// Something the user asked for this frame
#[derive(Debug, Clone, Copy)]
enum Action {
    Play(usize),
    StopAll,
    TogglePause,
    SetEnabled(bool),
    SetPlayerEnabled(Player, bool),
    SetPlayerGain(Player, u8),
    SaveSettings,
}

/// A freshly connected player is switched on unless the loaded settings
/// already hold a choice for it
fn enable_on_connect(settings: &impl ConfigReader, player: Player) -> bool {
    settings.get_int(&enabled_key(player)).is_none()
}

pub struct HapticsDemoApp {
    registry: Option<HapticsRegistry<PlatformSubsystem>>,
    input_reader: Option<InputReader>,
    slots: PlayerSlots<GamepadId>,
    controllers: [Option<String>; Player::COUNT],
    settings: JsonSettings,
    paused: bool,

    // UI state
    status_message: String,
    show_debug: bool,
}

impl HapticsDemoApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = JsonSettings::load();

        let registry = match HapticsRegistry::init(PlatformSubsystem::new()) {
            Ok(mut registry) => {
                for (index, label, definition) in presets::ALL {
                    if let Err(e) = registry.register_effect_at(definition, index) {
                        log::error!("Failed to register {}: {}", label, e);
                    }
                }
                registry.settings_load(&settings);
                Some(registry)
            }
            Err(e) => {
                log::error!("Continuing without haptics: {}", e);
                None
            }
        };

        let input_reader = match InputReader::new() {
            Ok(reader) => Some(reader),
            Err(e) => {
                log::error!("Failed to initialize input reader: {}", e);
                None
            }
        };

        let mut app = Self {
            registry,
            input_reader,
            slots: PlayerSlots::new(),
            controllers: Default::default(),
            settings,
            paused: false,
            status_message: String::new(),
            show_debug: false,
        };

        let present = app
            .input_reader
            .as_ref()
            .map(InputReader::connected)
            .unwrap_or_default();
        for event in present {
            app.handle_controller(event);
        }

        app
    }

    fn process_inputs(&mut self) {
        let Some(ref mut reader) = self.input_reader else {
            return;
        };

        for event in reader.poll() {
            self.handle_controller(event);
        }
    }

    fn handle_controller(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::Connected { gamepad, info } => {
                let Some(player) = self.slots.assign(gamepad) else {
                    log::warn!("No free player slot for {}", info.name);
                    return;
                };
                self.controllers[player.index()] = Some(info.name.clone());
                log::info!("Added controller {} for player {}", info.name, player);

                let Some(ref mut registry) = self.registry else {
                    return;
                };
                let Some(path) = info.device_path else {
                    log::warn!("No haptic device for {}", info.name);
                    return;
                };

                match registry.open_device_for_player(&path, player) {
                    Ok(()) => {
                        if enable_on_connect(&self.settings, player) {
                            registry.player_set_enabled(player, true);
                        }
                        self.status_message = format!("Player {}: {}", player, info.name);
                    }
                    Err(e) => {
                        log::warn!("{}", e);
                        self.status_message = e.to_string();
                    }
                }
            }
            ControllerEvent::Disconnected { gamepad } => {
                let Some(player) = self.slots.release(gamepad) else {
                    return;
                };
                self.controllers[player.index()] = None;
                if let Some(ref mut registry) = self.registry {
                    registry.on_controller_removed(player);
                }
                log::info!("Removed controller for player {}", player);
            }
        }
    }

    fn key_actions(ctx: &egui::Context, actions: &mut Vec<Action>) {
        ctx.input(|i| {
            for (key, index) in EFFECT_KEYS {
                if i.key_released(key) {
                    actions.push(Action::Play(index));
                }
            }
            if i.key_released(egui::Key::S) {
                actions.push(Action::StopAll);
            }
            if i.key_released(egui::Key::P) {
                actions.push(Action::TogglePause);
            }
        });

        if ctx.input(|i| i.key_released(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn apply(&mut self, action: Action) {
        let Some(ref mut registry) = self.registry else {
            return;
        };

        match action {
            Action::Play(index) => {
                for player in all::<Player>() {
                    registry.player_run_effect(player, index, 1);
                }
            }
            Action::StopAll => registry.stop_all(),
            Action::TogglePause => {
                self.paused = !self.paused;
                if self.paused {
                    registry.pause_all();
                } else {
                    registry.unpause_all();
                }
            }
            Action::SetEnabled(enabled) => registry.set_enabled(enabled),
            Action::SetPlayerEnabled(player, enabled) => {
                registry.player_set_enabled(player, enabled)
            }
            Action::SetPlayerGain(player, gain) => registry.player_set_gain(player, gain),
            Action::SaveSettings => {
                let saved = registry
                    .settings_save(&mut self.settings)
                    .and_then(|()| self.settings.save());
                self.status_message = match saved {
                    Ok(()) => format!("Saved settings to {}", self.settings.path().display()),
                    Err(e) => {
                        log::error!("Failed to save settings: {}", e);
                        format!("Failed to save settings: {}", e)
                    }
                };
            }
        }
    }

    fn render_ui(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Haptics");
                ui.separator();
                if let Some(ref registry) = self.registry {
                    let mut enabled = registry.enabled();
                    if ui.checkbox(&mut enabled, "Enabled").changed() {
                        actions.push(Action::SetEnabled(enabled));
                    }
                }
                ui.separator();
                ui.checkbox(&mut self.show_debug, "Debug");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let status = if self.registry.is_some() {
                        egui::RichText::new("Available").color(egui::Color32::GREEN)
                    } else {
                        egui::RichText::new("Unavailable").color(egui::Color32::RED)
                    };
                    ui.label(status);
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.status_message.is_empty() {
                ui.label(&self.status_message);
                ui.add_space(10.0);
            }

            let Some(ref registry) = self.registry else {
                ui.label("No haptics backend on this system.");
                return;
            };

            ui.heading("Players");
            ui.add_space(10.0);

            for player in all::<Player>() {
                ui.group(|ui| {
                    let controller = self.controllers[player.index()]
                        .as_deref()
                        .unwrap_or("No controller");
                    ui.label(egui::RichText::new(format!("Player {}: {}", player, controller)).strong());

                    ui.horizontal(|ui| {
                        let mut enabled = registry.player_enabled(player);
                        if ui.checkbox(&mut enabled, "Enabled").changed() {
                            actions.push(Action::SetPlayerEnabled(player, enabled));
                        }

                        let mut gain = registry.player_gain(player).get();
                        if ui.add(egui::Slider::new(&mut gain, 0..=9).text("Gain")).changed() {
                            actions.push(Action::SetPlayerGain(player, gain));
                        }
                    });

                    if let Some(name) = registry.device_name(player) {
                        ui.label(format!("Haptic device: {}", name));
                    }
                });
            }

            ui.add_space(10.0);
            ui.heading("Effects");
            ui.label("Keys 1-5 play, S stops, P pauses, Escape quits");
            ui.horizontal_wrapped(|ui| {
                for (index, label, _) in presets::ALL {
                    if ui.button(format!("{} {}", index, label)).clicked() {
                        actions.push(Action::Play(index));
                    }
                }
            });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("Stop all").clicked() {
                    actions.push(Action::StopAll);
                }
                let pause_label = if self.paused { "Resume" } else { "Pause" };
                if ui.button(pause_label).clicked() {
                    actions.push(Action::TogglePause);
                }
                if ui.button("Save settings").clicked() {
                    actions.push(Action::SaveSettings);
                }
            });

            if self.show_debug {
                ui.add_space(20.0);
                ui.separator();
                ui.heading("Debug Info");

                ui.collapsing("Bound Effects", |ui| {
                    for player in all::<Player>() {
                        let bound: Vec<String> = presets::ALL
                            .iter()
                            .filter(|(index, _, _)| registry.is_effect_bound(player, *index))
                            .map(|(index, _, _)| index.to_string())
                            .collect();
                        ui.label(format!("Player {}: [{}]", player, bound.join(", ")));
                    }
                });

                ui.label(format!(
                    "Catalog: {} effects, settings at {}",
                    registry.catalog_len(),
                    self.settings.path().display()
                ));
            }
        });
    }
}

impl eframe::App for HapticsDemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_inputs();
        ctx.request_repaint();

        let mut actions = Vec::new();
        Self::key_actions(ctx, &mut actions);
        self.render_ui(ctx, &mut actions);

        for action in actions {
            self.apply(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn connect_keeps_stored_enable_choice() {
        let mut stored: BTreeMap<String, i32> = BTreeMap::new();
        assert!(enable_on_connect(&stored, Player::One));

        stored.insert(enabled_key(Player::One), 0);
        assert!(!enable_on_connect(&stored, Player::One));
        assert!(enable_on_connect(&stored, Player::Two));

        stored.insert(enabled_key(Player::Two), 1);
        assert!(!enable_on_connect(&stored, Player::Two));
    }
}
