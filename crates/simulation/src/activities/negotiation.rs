//! Negotiation dialogue activity. Each topic has a hidden preferred
//! answer; picking it raises the other party's mood, anything else
//! lowers it. The conversation always runs to the end and the final
//! mood against the threshold decides the outcome flavor.

use bevy::prelude::{KeyCode, MouseButton, Vec2};

use super::Activity;

const PREFERRED_DELTA: i32 = 2;
const OTHER_DELTA: i32 = -1;

#[derive(Debug, Clone)]
pub struct NegotiationTopic {
    pub prompt: String,
    pub choices: Vec<String>,
    /// Hidden: never shown to the player.
    pub preferred: usize,
}

impl NegotiationTopic {
    pub fn new(prompt: &str, choices: &[&str], preferred: usize) -> Self {
        Self {
            prompt: prompt.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            preferred,
        }
    }
}

#[derive(Debug)]
pub struct NegotiationDialogue {
    topics: Vec<NegotiationTopic>,
    threshold: i32,
    current: usize,
    selected: usize,
    mood: i32,
    active: bool,
    completed: bool,
}

impl NegotiationDialogue {
    pub fn new(topics: Vec<NegotiationTopic>, threshold: i32) -> Self {
        Self {
            topics,
            threshold,
            current: 0,
            selected: 0,
            mood: 0,
            active: false,
            completed: false,
        }
    }

    pub fn mood(&self) -> i32 {
        self.mood
    }

    pub fn current_topic(&self) -> Option<&NegotiationTopic> {
        self.topics.get(self.current)
    }

    /// Whether the other party ended up agreeable. Meaningful only once
    /// the dialogue has completed.
    pub fn succeeded(&self) -> bool {
        self.mood >= self.threshold
    }

    fn choose(&mut self) {
        let Some(topic) = self.topics.get(self.current) else {
            return;
        };
        self.mood += if self.selected == topic.preferred {
            PREFERRED_DELTA
        } else {
            OTHER_DELTA
        };
        self.current += 1;
        self.selected = 0;
        if self.current >= self.topics.len() {
            self.completed = true;
            self.active = false;
        }
    }
}

impl Activity for NegotiationDialogue {
    fn start(&mut self) {
        if self.topics.is_empty() {
            self.completed = true;
            return;
        }
        self.active = true;
    }

    fn update(&mut self, _dt: f32) {}

    fn handle_key(&mut self, key: KeyCode) {
        if !self.active {
            return;
        }
        let Some(topic) = self.topics.get(self.current) else {
            return;
        };
        match key {
            KeyCode::ArrowUp | KeyCode::KeyW => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::ArrowDown | KeyCode::KeyS => {
                self.selected = (self.selected + 1).min(topic.choices.len() - 1);
            }
            KeyCode::Enter | KeyCode::Space => self.choose(),
            _ => {}
        }
    }

    fn handle_mouse_motion(&mut self, _position: Vec2) {}

    fn handle_mouse_click(&mut self, _button: MouseButton, _position: Vec2) {}

    fn is_active(&self) -> bool {
        self.active
    }

    fn is_completed(&self) -> bool {
        self.completed
    }
}
