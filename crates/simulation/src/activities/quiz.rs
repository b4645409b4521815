//! Single-choice quiz activity. One question at a time; answering shows
//! a short feedback beat before moving on.

use bevy::prelude::{KeyCode, MouseButton, Vec2};

use super::Activity;

/// Seconds the correct/incorrect feedback stays up between questions.
const FEEDBACK_SECS: f32 = 1.5;

#[derive(Debug, Clone)]
pub struct QuizQuestion {
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct: usize,
}

impl QuizQuestion {
    pub fn new(prompt: &str, choices: &[&str], correct: usize) -> Self {
        Self {
            prompt: prompt.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            correct,
        }
    }
}

#[derive(Debug)]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
    current: usize,
    selected: usize,
    score: usize,
    /// Remaining feedback pause; input is ignored while positive.
    feedback_timer: f32,
    last_answer_correct: bool,
    active: bool,
    completed: bool,
}

impl Quiz {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self {
            questions,
            current: 0,
            selected: 0,
            score: 0,
            feedback_timer: 0.0,
            last_answer_correct: false,
            active: false,
            completed: false,
        }
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    pub fn selected_choice(&self) -> usize {
        self.selected
    }

    pub fn showing_feedback(&self) -> bool {
        self.feedback_timer > 0.0
    }

    pub fn last_answer_correct(&self) -> bool {
        self.last_answer_correct
    }

    fn submit(&mut self) {
        let Some(question) = self.questions.get(self.current) else {
            return;
        };
        self.last_answer_correct = self.selected == question.correct;
        if self.last_answer_correct {
            self.score += 1;
        }
        self.feedback_timer = FEEDBACK_SECS;
    }

    fn advance(&mut self) {
        self.current += 1;
        self.selected = 0;
        if self.current >= self.questions.len() {
            self.completed = true;
            self.active = false;
        }
    }
}

impl Activity for Quiz {
    fn start(&mut self) {
        if self.questions.is_empty() {
            // An empty quiz has nothing to ask.
            self.completed = true;
            return;
        }
        self.active = true;
    }

    fn update(&mut self, dt: f32) {
        if self.feedback_timer > 0.0 {
            self.feedback_timer -= dt;
            if self.feedback_timer <= 0.0 {
                self.feedback_timer = 0.0;
                self.advance();
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        if !self.active || self.showing_feedback() {
            return;
        }
        let Some(question) = self.questions.get(self.current) else {
            return;
        };
        match key {
            KeyCode::ArrowUp | KeyCode::KeyW => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::ArrowDown | KeyCode::KeyS => {
                self.selected = (self.selected + 1).min(question.choices.len() - 1);
            }
            KeyCode::Enter | KeyCode::Space => self.submit(),
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
