use bevy::prelude::*;
use bevy::window::PresentMode;

use simulation::NewGameConfig;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Cityward".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(new_game_config())
    .add_plugins((simulation::SimulationPlugin, save::SavePlugin));

    app.run();
}

/// Seed from `CITYWARD_SEED` when set, otherwise the default city.
fn new_game_config() -> NewGameConfig {
    let mut config = NewGameConfig::default();
    if let Ok(value) = std::env::var("CITYWARD_SEED") {
        match value.parse::<u64>() {
            Ok(seed) => config.seed = seed,
            Err(_) => warn!("ignoring unparsable CITYWARD_SEED '{value}'"),
        }
    }
    config
}
