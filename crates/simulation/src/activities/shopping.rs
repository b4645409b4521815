//! Budgeted shopping activity. Toggle items into the cart, then check
//! out. Checkout is gated on the budget and on the required staples;
//! items flagged as shared cost half because the household splits them.

use bevy::prelude::{KeyCode, MouseButton, Vec2};

use super::Activity;

#[derive(Debug, Clone)]
pub struct ShopItem {
    pub name: String,
    pub price: f32,
    /// Checkout is refused while a required staple is missing.
    pub required: bool,
    /// Split with the household: charged at half price.
    pub shared: bool,
}

impl ShopItem {
    pub fn new(name: &str, price: f32) -> Self {
        Self {
            name: name.to_string(),
            price,
            required: false,
            shared: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn shared(mut self) -> Self {
        self.shared = true;
        self
    }

    /// Price actually charged at checkout.
    pub fn effective_price(&self) -> f32 {
        if self.shared {
            self.price * 0.5
        } else {
            self.price
        }
    }
}

#[derive(Debug)]
pub struct ShoppingCart {
    items: Vec<ShopItem>,
    in_cart: Vec<bool>,
    pub budget: f32,
    cursor: usize,
    /// Set when a checkout attempt is refused; cleared on the next toggle.
    rejection: Option<String>,
    active: bool,
    completed: bool,
}

impl ShoppingCart {
    pub fn new(items: Vec<ShopItem>, budget: f32) -> Self {
        let in_cart = vec![false; items.len()];
        Self {
            items,
            in_cart,
            budget,
            cursor: 0,
            rejection: None,
            active: false,
            completed: false,
        }
    }

    pub fn total(&self) -> f32 {
        self.items
            .iter()
            .zip(&self.in_cart)
            .filter(|(_, &in_cart)| in_cart)
            .map(|(item, _)| item.effective_price())
            .sum()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items
            .iter()
            .zip(&self.in_cart)
            .any(|(item, &in_cart)| in_cart && item.name == name)
    }

    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    fn missing_staple(&self) -> Option<&ShopItem> {
        self.items
            .iter()
            .zip(&self.in_cart)
            .find(|(item, &in_cart)| item.required && !in_cart)
            .map(|(item, _)| item)
    }

    fn toggle_cursor(&mut self) {
        if let Some(flag) = self.in_cart.get_mut(self.cursor) {
            *flag = !*flag;
            self.rejection = None;
        }
    }

    fn try_checkout(&mut self) {
        if let Some(staple) = self.missing_staple() {
            self.rejection = Some(format!("You still need {}.", staple.name));
            return;
        }
        if self.total() > self.budget {
            self.rejection = Some(format!(
                "That's {:.2} over budget. Put something back.",
                self.total() - self.budget
            ));
            return;
        }
        self.completed = true;
        self.active = false;
    }
}

impl Activity for ShoppingCart {
    fn start(&mut self) {
        self.active = true;
    }

    fn update(&mut self, _dt: f32) {}

    fn handle_key(&mut self, key: KeyCode) {
        if !self.active {
            return;
        }
        match key {
            KeyCode::ArrowUp | KeyCode::KeyW => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::ArrowDown | KeyCode::KeyS => {
                if !self.items.is_empty() {
                    self.cursor = (self.cursor + 1).min(self.items.len() - 1);
                }
            }
            KeyCode::Space => self.toggle_cursor(),
            KeyCode::Enter => self.try_checkout(),
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
