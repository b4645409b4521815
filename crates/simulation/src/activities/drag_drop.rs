//! Document-sorting form activity. Click a document to pick it up, move
//! it with the mouse, click a slot to drop it. The form can be confirmed
//! only once every required slot holds a document.

use bevy::prelude::{KeyCode, MouseButton, Rect, Vec2};

use super::Activity;

/// A draggable document card with its on-screen region.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub rect: Rect,
}

/// A drop target. Required slots gate form completion.
#[derive(Debug, Clone)]
pub struct FormSlot {
    pub name: String,
    pub rect: Rect,
    pub required: bool,
}

#[derive(Debug)]
pub struct DragDropForm {
    documents: Vec<Document>,
    slots: Vec<FormSlot>,
    /// `placements[slot] = document index`.
    placements: Vec<Option<usize>>,
    held: Option<usize>,
    active: bool,
    completed: bool,
}

impl DragDropForm {
    pub fn new(documents: Vec<Document>, slots: Vec<FormSlot>) -> Self {
        let placements = vec![None; slots.len()];
        Self {
            documents,
            slots,
            placements,
            held: None,
            active: false,
            completed: false,
        }
    }

    pub fn held_document(&self) -> Option<&Document> {
        self.held.and_then(|i| self.documents.get(i))
    }

    pub fn placement(&self, slot: usize) -> Option<usize> {
        self.placements.get(slot).copied().flatten()
    }

    /// Every required slot holds a document.
    pub fn required_slots_filled(&self) -> bool {
        self.slots
            .iter()
            .zip(&self.placements)
            .all(|(slot, placement)| !slot.required || placement.is_some())
    }

    fn pick_up_at(&mut self, position: Vec2) {
        let hit = self
            .documents
            .iter()
            .position(|d| d.rect.contains(position));
        if let Some(doc) = hit {
            // Lift it out of any slot it was dropped into earlier.
            for placement in &mut self.placements {
                if *placement == Some(doc) {
                    *placement = None;
                }
            }
            self.held = Some(doc);
        }
    }

    fn drop_at(&mut self, position: Vec2) {
        let Some(doc) = self.held.take() else {
            return;
        };
        let hit = self.slots.iter().position(|s| s.rect.contains(position));
        if let Some(slot) = hit {
            if self.placements[slot].is_none() {
                self.placements[slot] = Some(doc);
                return;
            }
        }
        // Missed or occupied slot: the document snaps back to its card.
    }
}

impl Activity for DragDropForm {
    fn start(&mut self) {
        self.active = true;
    }

    fn update(&mut self, _dt: f32) {}

    fn handle_key(&mut self, key: KeyCode) {
        if !self.active {
            return;
        }
        if key == KeyCode::Enter && self.required_slots_filled() {
            self.completed = true;
            self.active = false;
        }
    }

    fn handle_mouse_motion(&mut self, position: Vec2) {
        if let Some(doc) = self.held {
            if let Some(document) = self.documents.get_mut(doc) {
                let half = document.rect.half_size();
                document.rect = Rect::from_center_half_size(position, half);
            }
        }
    }

    fn handle_mouse_click(&mut self, button: MouseButton, position: Vec2) {
        if !self.active || button != MouseButton::Left {
            return;
        }
        if self.held.is_some() {
            self.drop_at(position);
        } else {
            self.pick_up_at(position);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn is_completed(&self) -> bool {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, x: f32) -> Document {
        Document {
            name: name.to_string(),
            rect: Rect::new(x, 0.0, x + 10.0, 10.0),
        }
    }

    fn slot(name: &str, x: f32, required: bool) -> FormSlot {
        FormSlot {
            name: name.to_string(),
            rect: Rect::new(x, 50.0, x + 10.0, 60.0),
            required,
        }
    }

    fn form() -> DragDropForm {
        DragDropForm::new(
            vec![card("id", 0.0), card("resume", 20.0)],
            vec![slot("identity", 0.0, true), slot("experience", 20.0, true)],
        )
    }

    fn drag(form: &mut DragDropForm, from: Vec2, to: Vec2) {
        form.handle_mouse_click(MouseButton::Left, from);
        form.handle_mouse_motion(to);
        form.handle_mouse_click(MouseButton::Left, to);
    }

    #[test]
    fn test_complete_after_filling_required_slots() {
        let mut form = form();
        form.start();
        drag(&mut form, Vec2::new(5.0, 5.0), Vec2::new(5.0, 55.0));
        drag(&mut form, Vec2::new(25.0, 5.0), Vec2::new(25.0, 55.0));
        assert!(form.required_slots_filled());
        assert!(!form.is_completed());
        form.handle_key(KeyCode::Enter);
        assert!(form.is_completed());
        assert!(!form.is_active());
    }

    #[test]
    fn test_confirm_gated_on_required_slots() {
        let mut form = form();
        form.start();
        drag(&mut form, Vec2::new(5.0, 5.0), Vec2::new(5.0, 55.0));
        form.handle_key(KeyCode::Enter);
        assert!(!form.is_completed(), "confirmed with an empty required slot");
    }

    #[test]
    fn test_missed_drop_snaps_back() {
        let mut form = form();
        form.start();
        // Drop into empty space between the slots.
        drag(&mut form, Vec2::new(5.0, 5.0), Vec2::new(100.0, 100.0));
        assert!(form.held_document().is_none());
        assert_eq!(form.placement(0), None);
        assert_eq!(form.placement(1), None);
    }

    #[test]
    fn test_occupied_slot_rejects_second_document() {
        let mut form = form();
        form.start();
        drag(&mut form, Vec2::new(5.0, 5.0), Vec2::new(5.0, 55.0));
        assert_eq!(form.placement(0), Some(0));
        drag(&mut form, Vec2::new(25.0, 5.0), Vec2::new(5.0, 55.0));
        assert_eq!(form.placement(0), Some(0), "occupied slot was overwritten");
    }

    #[test]
    fn test_picking_up_placed_document_vacates_slot() {
        let mut form = form();
        form.start();
        drag(&mut form, Vec2::new(5.0, 5.0), Vec2::new(5.0, 55.0));
        // The card now sits on the slot; pick it back up from there.
        form.handle_mouse_click(MouseButton::Left, Vec2::new(5.0, 55.0));
        assert!(form.held_document().is_some());
        assert_eq!(form.placement(0), None);
    }
}
