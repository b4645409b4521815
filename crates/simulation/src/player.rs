//! Player position state and tile-stepped movement.
//!
//! The player occupies exactly one tile. Movement is one tile per key
//! press, rejected when the destination is off-map or not walkable, and
//! suspended entirely while an activity owns the input.

use bevy::prelude::*;

use crate::grid::CityGrid;
use crate::objective_manager::ObjectiveManager;

/// Player tile position. Spawned at the map center after generation.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    pub x: usize,
    pub y: usize,
}

impl PlayerState {
    pub fn at_center(grid: &CityGrid) -> Self {
        let (x, y) = grid.center();
        Self { x, y }
    }

    /// Attempt a one-tile step. Returns whether the player moved.
    pub fn try_step(&mut self, dx: i32, dy: i32, grid: &CityGrid) -> bool {
        let nx = self.x as i32 + dx;
        let ny = self.y as i32 + dy;
        if nx < 0 || ny < 0 {
            return false;
        }
        let (nx, ny) = (nx as usize, ny as usize);
        if !grid.in_bounds(nx, ny) || !grid.get(nx, ny).is_walkable() {
            return false;
        }
        self.x = nx;
        self.y = ny;
        true
    }
}

fn spawn_player(mut commands: Commands, grid: Res<CityGrid>) {
    commands.insert_resource(PlayerState::at_center(&grid));
}

fn player_movement(
    keys: Res<ButtonInput<KeyCode>>,
    grid: Res<CityGrid>,
    manager: Option<Res<ObjectiveManager>>,
    mut player: ResMut<PlayerState>,
) {
    if manager.is_some_and(|m| m.activity_running()) {
        return;
    }
    let step = if keys.just_pressed(KeyCode::ArrowUp) || keys.just_pressed(KeyCode::KeyW) {
        (0, -1)
    } else if keys.just_pressed(KeyCode::ArrowDown) || keys.just_pressed(KeyCode::KeyS) {
        (0, 1)
    } else if keys.just_pressed(KeyCode::ArrowLeft) || keys.just_pressed(KeyCode::KeyA) {
        (-1, 0)
    } else if keys.just_pressed(KeyCode::ArrowRight) || keys.just_pressed(KeyCode::KeyD) {
        (1, 0)
    } else {
        return;
    };
    player.try_step(step.0, step.1, &grid);
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_player)
            .add_systems(Update, player_movement.in_set(crate::SimulationSet::Input));
    }
}
