//! Keyboard input state
//!
//! Buttons are registered by name and keys are bound to them (many keys may
//! drive one button). A key-event source feeds `on_key_down`/`on_key_up`;
//! the simulation reads the button states once per step and then calls
//! [`Controller::reset_frame`] to clear the edge-triggered `tapped` flags.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const UP: &str = "up";
pub const DOWN: &str = "down";
pub const LEFT: &str = "left";
pub const RIGHT: &str = "right";
pub const SHOOT: &str = "shoot";

/// A named input button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub name: String,
    /// Held down
    pub pressed: bool,
    /// Went from up to down since the last frame reset
    pub tapped: bool,
}

impl Button {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pressed: false,
            tapped: false,
        }
    }
}

/// Button registry plus key bindings
#[derive(Debug, Clone, Default)]
pub struct Controller {
    buttons: HashMap<String, Button>,
    /// key -> button name
    bindings: HashMap<String, String>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller with the standard buttons and the arrow/WASD/HJKL layout
    pub fn with_default_bindings() -> Self {
        let mut controller = Self::new();
        for name in [UP, DOWN, LEFT, RIGHT, SHOOT] {
            controller.add_button(name);
        }

        let layout = [
            ("ArrowUp", UP),
            ("ArrowDown", DOWN),
            ("ArrowLeft", LEFT),
            ("ArrowRight", RIGHT),
            ("w", UP),
            ("a", LEFT),
            ("s", DOWN),
            ("d", RIGHT),
            ("h", LEFT),
            ("j", DOWN),
            ("k", UP),
            ("l", RIGHT),
            ("f", SHOOT),
            (" ", SHOOT),
        ];
        for (key, name) in layout {
            controller.bind(key, name);
        }
        controller
    }

    /// Register a button; re-adding an existing name resets it
    pub fn add_button(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.buttons.insert(name.clone(), Button::new(name));
    }

    /// Bind `key` to the button called `name`
    pub fn bind(&mut self, key: impl Into<String>, name: impl Into<String>) {
        let (key, name) = (key.into(), name.into());
        if !self.buttons.contains_key(&name) {
            log::warn!("Binding key {key:?} to unknown button {name:?}");
        }
        self.bindings.insert(key, name);
    }

    fn bound_button(&mut self, key: &str) -> Option<&mut Button> {
        let name = self.bindings.get(key)?;
        self.buttons.get_mut(name)
    }

    pub fn on_key_down(&mut self, key: &str) {
        if let Some(button) = self.bound_button(key) {
            // OS key-repeat sends more key-downs while held; only the first taps
            button.tapped = !button.pressed;
            button.pressed = true;
        }
    }

    pub fn on_key_up(&mut self, key: &str) {
        if let Some(button) = self.bound_button(key) {
            button.pressed = false;
        }
    }

    /// Clear every `tapped` flag. Called once at the end of each step.
    pub fn reset_frame(&mut self) {
        for button in self.buttons.values_mut() {
            button.tapped = false;
        }
    }

    pub fn button(&self, name: &str) -> Option<&Button> {
        self.buttons.get(name)
    }

    /// Held state; unknown buttons read as released
    pub fn is_pressed(&self, name: &str) -> bool {
        self.button(name).is_some_and(|b| b.pressed)
    }

    /// Edge state; unknown buttons read as not tapped
    pub fn is_tapped(&self, name: &str) -> bool {
        self.button(name).is_some_and(|b| b.tapped)
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.buttons.values()
    }
}
