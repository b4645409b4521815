//! Scripted cutscene: a sequence of text pages advanced by any key or
//! click. Completes after the last page.

use bevy::prelude::{KeyCode, MouseButton, Vec2};

use super::Activity;

#[derive(Debug)]
pub struct ScriptedCutscene {
    pages: Vec<String>,
    current: usize,
    active: bool,
    completed: bool,
}

impl ScriptedCutscene {
    pub fn new(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            current: 0,
            active: false,
            completed: false,
        }
    }

    pub fn current_page(&self) -> Option<&str> {
        self.pages.get(self.current).map(String::as_str)
    }

    fn advance(&mut self) {
        self.current += 1;
        if self.current >= self.pages.len() {
            self.completed = true;
            self.active = false;
        }
    }
}

impl Activity for ScriptedCutscene {
    fn start(&mut self) {
        if self.pages.is_empty() {
            self.completed = true;
            return;
        }
        self.active = true;
    }

    fn update(&mut self, _dt: f32) {}

    fn handle_key(&mut self, _key: KeyCode) {
        if self.active {
            self.advance();
        }
    }

    fn handle_mouse_motion(&mut self, _position: Vec2) {}

    fn handle_mouse_click(&mut self, _button: MouseButton, _position: Vec2) {
        if self.active {
            self.advance();
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn is_completed(&self) -> bool {
        self.completed
    }
}
