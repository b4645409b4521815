//! Interactive activities: self-contained mini-games an objective can
//! open. While one is running it owns all input; the manager only asks
//! whether it is still active and whether it finished.

use bevy::prelude::{KeyCode, MouseButton, Vec2};

mod cutscene;
mod drag_drop;
mod negotiation;
mod quiz;
mod shopping;

pub use cutscene::ScriptedCutscene;
pub use drag_drop::{Document, DragDropForm, FormSlot};
pub use negotiation::{NegotiationDialogue, NegotiationTopic};
pub use quiz::{Quiz, QuizQuestion};
pub use shopping::{ShopItem, ShoppingCart};

/// Contract between the objective manager and a running mini-game.
/// Completion is decided internally; the manager never forces it.
pub trait Activity: Send + Sync + std::fmt::Debug {
    fn start(&mut self);
    fn update(&mut self, dt: f32);
    fn handle_key(&mut self, key: KeyCode);
    fn handle_mouse_motion(&mut self, position: Vec2);
    fn handle_mouse_click(&mut self, button: MouseButton, position: Vec2);
    fn is_active(&self) -> bool;
    fn is_completed(&self) -> bool;
}
