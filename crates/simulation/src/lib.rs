//! Core simulation crate: the procedural city generator and the
//! narrative objective engine.
//!
//! Everything here is plain logic in resource methods with thin Bevy
//! systems on top; rendering and UI live in other crates and only read
//! these resources.

use bevy::prelude::*;

pub mod activities;
pub mod blocks;
pub mod building_placement;
pub mod buildings;
pub mod catalog;
pub mod city_generator;
pub mod config;
pub mod density;
pub mod grid;
pub mod lots;
pub mod notifications;
pub mod objective_manager;
pub mod objectives;
pub mod player;
pub mod road_growth;
pub mod sim_rng;


pub use city_generator::{CityGeneratorPlugin, NewGameConfig};
pub use grid::{CityGrid, TileType};
pub use notifications::{NotificationEvent, NotificationPriority, NotificationsPlugin};
pub use objective_manager::{ObjectiveManager, ObjectivesPlugin};
pub use player::{PlayerPlugin, PlayerState};
pub use sim_rng::SimRng;

/// Frame ordering: raw input and movement resolve before the objective
/// engine looks at where the player is.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Objectives,
}

/// Adds the whole simulation: generation at startup, then the player,
/// objective and notification systems every frame.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (SimulationSet::Input, SimulationSet::Objectives).chain(),
        )
        .add_plugins((
            CityGeneratorPlugin,
            NotificationsPlugin,
            PlayerPlugin,
            ObjectivesPlugin,
        ));
    }
}
