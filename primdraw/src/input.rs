//! Keyboard names and mouse state.
//!
//! The keyboard side is a lookup table only; tracking which keys are down is
//! left to the application. The mouse side is a process-wide record kept up
//! to date from window events.

use std::{
    collections::BTreeMap,
    sync::{LazyLock, Mutex, MutexGuard, PoisonError},
};

use winit::{
    event::{ElementState, MouseButton, WindowEvent},
    keyboard::KeyCode,
};

/// Lookup from symbolic key names to platform key-code strings.
///
/// Contains `Left`, `Up`, `Right`, `Down` (mapped to `ArrowLeft`...) and the
/// letters `A` to `Z` (mapped to `KeyA`...).
#[derive(Debug)]
pub struct Keys {
    codes: BTreeMap<String, String>,
}

static KEYS: LazyLock<Keys> = LazyLock::new(Keys::build);

/// The shared key-name table.
pub fn keys() -> &'static Keys {
    &KEYS
}

impl Keys {
    fn build() -> Self {
        let arrows = [
            ("Left", "ArrowLeft"),
            ("Up", "ArrowUp"),
            ("Right", "ArrowRight"),
            ("Down", "ArrowDown"),
        ]
        .into_iter()
        .map(|(name, code)| (name.to_string(), code.to_string()));
        let letters = ('A'..='Z').map(|c| (c.to_string(), format!("Key{c}")));

        Self {
            codes: arrows.chain(letters).collect(),
        }
    }

    /// Key-code string for a symbolic name, e.g. `"Up"` → `"ArrowUp"`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.codes.get(name).map(String::as_str)
    }

    /// The winit key code for a symbolic name.
    pub fn key_code(&self, name: &str) -> Option<KeyCode> {
        self.get(name).and_then(key_code_from_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.codes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

fn key_code_from_str(code: &str) -> Option<KeyCode> {
    let key = match code {
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowRight" => KeyCode::ArrowRight,
        "ArrowDown" => KeyCode::ArrowDown,
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        _ => return None,
    };
    Some(key)
}

/// Mouse position and primary-button state.
///
/// `click` is set on a press that was not already held and is never cleared
/// here: the consumer resets it (directly or with [`take_click`](Self::take_click))
/// once it has handled the click. Until then it stays `true`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Mouse {
    pub x: f32,
    pub y: f32,
    pub click: bool,
    pub held: bool,
}

impl Mouse {
    pub const fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            click: false,
            held: false,
        }
    }

    pub fn on_move(&mut self, x: f64, y: f64) {
        self.x = x as f32;
        self.y = y as f32;
    }

    pub fn on_button_down(&mut self, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        if !self.held {
            self.click = true;
        }
        self.held = true;
    }

    pub fn on_button_up(&mut self, button: MouseButton) {
        if button == MouseButton::Left {
            self.held = false;
        }
    }

    /// Return `click` and clear it.
    pub fn take_click(&mut self) -> bool {
        std::mem::take(&mut self.click)
    }

    /// Update from a winit window event. Other events are ignored.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => self.on_move(position.x, position.y),
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.on_button_down(*button),
                ElementState::Released => self.on_button_up(*button),
            },
            _ => {}
        }
    }
}

static MOUSE: Mutex<Mouse> = Mutex::new(Mouse::new());

/// Lock the process-wide mouse record.
///
/// The guard must be dropped before calling [`handle_window_event`], which
/// takes the same lock and would otherwise deadlock.
pub fn mouse() -> MutexGuard<'static, Mouse> {
    MOUSE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Feed a window event into the process-wide mouse record.
pub fn handle_window_event(event: &WindowEvent) {
    mouse().handle_window_event(event);
}
