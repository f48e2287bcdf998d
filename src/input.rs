//! Keyboard and pointer state for the viewer.
//!
//! Raw winit events are folded into per-frame state: keys pressed this
//! frame, held mouse buttons, accumulated drag and scroll, and the cursor
//! position normalized to `[-0.5, 0.5]` with Y pointing up.

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn from_winit(btn: WinitMouseButton) -> Option<Self> {
        match btn {
            WinitMouseButton::Left => Some(MouseButton::Left),
            WinitMouseButton::Right => Some(MouseButton::Right),
            WinitMouseButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Keys the viewer reacts to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    H,
    C,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::KeyH => KeyCode::H,
            WinitKeyCode::KeyC => KeyCode::C,
            _ => KeyCode::Other(key as u32),
        }
    }
}

/// Named keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Show or hide the debug panel.
    TogglePanel,
    /// Collapse or expand the debug panel.
    ToggleCollapsed,
}

impl Shortcut {
    pub const ALL: [Shortcut; 2] = [Shortcut::TogglePanel, Shortcut::ToggleCollapsed];

    pub fn key(self) -> KeyCode {
        match self {
            Shortcut::TogglePanel => KeyCode::H,
            Shortcut::ToggleCollapsed => KeyCode::C,
        }
    }
}

#[derive(Debug)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    mouse_held: HashSet<MouseButton>,
    cursor_position: Option<Vec2>,
    cursor: Vec2,
    drag_delta: Vec2,
    scroll_delta: f32,
    window_size: (u32, u32),
}

impl Input {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            keys_held: HashSet::new(),
            keys_pressed: HashSet::new(),
            mouse_held: HashSet::new(),
            cursor_position: None,
            cursor: Vec2::ZERO,
            drag_delta: Vec2::ZERO,
            scroll_delta: 0.0,
            window_size: (width.max(1), height.max(1)),
        }
    }

    /// Key went down this frame (repeats excluded).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    pub fn any_mouse_held(&self) -> bool {
        !self.mouse_held.is_empty()
    }

    /// Shortcuts triggered this frame.
    pub fn shortcuts(&self) -> impl Iterator<Item = Shortcut> + '_ {
        Shortcut::ALL
            .into_iter()
            .filter(move |s| self.key_pressed(s.key()))
    }

    /// Cursor position, `(0, 0)` at the window center, `+y` up.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Pixels dragged with the left button since the last frame.
    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    /// Wheel lines scrolled since the last frame, positive away from the user.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Clear per-frame state. Call after the frame consumed it.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.drag_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.window_size = (width, height);
        }
    }

    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    pub fn press_button(&mut self, button: MouseButton) {
        self.mouse_held.insert(button);
    }

    pub fn release_button(&mut self, button: MouseButton) {
        self.mouse_held.remove(&button);
    }

    /// Cursor moved to `(x, y)` window pixels.
    pub fn move_cursor(&mut self, x: f32, y: f32) {
        let position = Vec2::new(x, y);
        if let Some(last) = self.cursor_position {
            if self.mouse_held(MouseButton::Left) {
                self.drag_delta += position - last;
            }
        }
        self.cursor_position = Some(position);

        let (w, h) = self.window_size;
        self.cursor = Vec2::new(x / w as f32 - 0.5, -(y / h as f32 - 0.5));
    }

    pub fn scroll(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }

    /// Fold a winit window event into the state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    let key = KeyCode::from(code);
                    match event.state {
                        ElementState::Pressed => self.press_key(key),
                        ElementState::Released => self.release_key(key),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = MouseButton::from_winit(*button) {
                    match state {
                        ElementState::Pressed => self.press_button(btn),
                        ElementState::Released => self.release_button(btn),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor_position = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.scroll(lines);
            }
            WindowEvent::Resized(size) => self.set_window_size(size.width, size.height),
            WindowEvent::Focused(false) => {
                self.keys_held.clear();
                self.mouse_held.clear();
            }
            _ => {}
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_pressed_once_per_hold() {
        let mut input = Input::default();
        input.press_key(KeyCode::H);
        assert!(input.key_pressed(KeyCode::H));
        assert_eq!(input.shortcuts().collect::<Vec<_>>(), vec![Shortcut::TogglePanel]);

        input.end_frame();
        // OS key repeat
        input.press_key(KeyCode::H);
        assert!(!input.key_pressed(KeyCode::H));
        assert!(input.key_held(KeyCode::H));

        input.release_key(KeyCode::H);
        input.press_key(KeyCode::H);
        assert!(input.key_pressed(KeyCode::H));
    }

    #[test]
    fn test_cursor_normalized() {
        let mut input = Input::new(800, 600);
        input.move_cursor(400.0, 300.0);
        assert_eq!(input.cursor(), Vec2::ZERO);

        input.move_cursor(0.0, 0.0);
        assert_eq!(input.cursor(), Vec2::new(-0.5, 0.5));

        input.move_cursor(800.0, 600.0);
        assert_eq!(input.cursor(), Vec2::new(0.5, -0.5));
    }

    #[test]
    fn test_drag_only_with_left_button() {
        let mut input = Input::new(800, 600);
        input.move_cursor(10.0, 10.0);
        input.move_cursor(20.0, 15.0);
        assert_eq!(input.drag_delta(), Vec2::ZERO);

        input.press_button(MouseButton::Left);
        input.move_cursor(30.0, 20.0);
        input.move_cursor(35.0, 30.0);
        assert_eq!(input.drag_delta(), Vec2::new(15.0, 15.0));

        input.end_frame();
        assert_eq!(input.drag_delta(), Vec2::ZERO);
        assert!(input.any_mouse_held());
    }

    #[test]
    fn test_scroll_accumulates() {
        let mut input = Input::default();
        input.scroll(1.0);
        input.scroll(0.5);
        assert_eq!(input.scroll_delta(), 1.5);
        input.end_frame();
        assert_eq!(input.scroll_delta(), 0.0);
    }
}
