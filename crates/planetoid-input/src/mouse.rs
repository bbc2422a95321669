//! Frame-coherent mouse state tracker.
//!
//! [`MouseState`] accumulates winit mouse events between redraws and exposes
//! the drag motion and wheel travel the orbit controls consume each frame.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels of precise scrolling that count as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

fn button_index(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        _ => None,
    }
}

/// Mouse state for one frame.
///
/// Forward winit events with the `on_*` methods, read the accumulated motion,
/// then call [`clear_transients`](Self::clear_transients) after the frame.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Option<Vec2>,
    delta: Vec2,
    pressed: [bool; 3],
    scroll: f32,
    cursor_in_window: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        // The first sample after entering has nothing to diff against.
        if let Some(old) = self.position {
            self.delta += new_pos - old;
        }
        self.position = Some(new_pos);
    }

    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if let Some(idx) = button_index(button) {
            self.pressed[idx] = state == ElementState::Pressed;
        }
    }

    /// Positive values scroll up (away from the user).
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_x, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
    }

    pub fn on_cursor_entered(&mut self) {
        self.cursor_in_window = true;
    }

    /// Leaving the window ends any drag in progress.
    pub fn on_cursor_left(&mut self) {
        self.cursor_in_window = false;
        self.position = None;
        self.pressed = [false; 3];
    }

    /// Drop everything gathered since the last clear, e.g. when the control
    /// panel consumed the events.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
    }

    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    /// Cursor movement since the last clear, in physical pixels.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Movement while the given button is held; zero otherwise.
    #[must_use]
    pub fn drag_delta(&self, button: MouseButton) -> Vec2 {
        if self.is_button_pressed(button) {
            self.delta
        } else {
            Vec2::ZERO
        }
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        button_index(button).is_some_and(|idx| self.pressed[idx])
    }

    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    #[must_use]
    pub fn is_cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_move_has_no_delta() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(100.0, 200.0);
        assert_eq!(ms.position(), Some(Vec2::new(100.0, 200.0)));
        assert_eq!(ms.delta(), Vec2::ZERO);
    }

    #[test]
    fn test_delta_accumulates_within_frame() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(100.0, 200.0);
        ms.on_cursor_moved(105.0, 198.0);
        ms.on_cursor_moved(110.0, 195.0);
        assert_eq!(ms.delta(), Vec2::new(10.0, -5.0));
        ms.clear_transients();
        assert_eq!(ms.delta(), Vec2::ZERO);
    }

    #[test]
    fn test_drag_delta_requires_button() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(0.0, 0.0);
        ms.on_cursor_moved(4.0, 3.0);
        assert_eq!(ms.drag_delta(MouseButton::Left), Vec2::ZERO);

        ms.on_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(ms.drag_delta(MouseButton::Left), Vec2::new(4.0, 3.0));

        ms.on_button(MouseButton::Left, ElementState::Released);
        assert!(!ms.is_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_scroll_lines_and_pixels() {
        let mut ms = MouseState::new();
        ms.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        ms.on_scroll(MouseScrollDelta::PixelDelta(
            winit::dpi::PhysicalPosition::new(0.0, 20.0),
        ));
        assert!((ms.scroll() - 1.5).abs() < f32::EPSILON);
        ms.clear_transients();
        assert_eq!(ms.scroll(), 0.0);
    }

    #[test]
    fn test_leaving_window_ends_drag() {
        let mut ms = MouseState::new();
        ms.on_cursor_entered();
        ms.on_button(MouseButton::Left, ElementState::Pressed);
        ms.on_cursor_moved(1.0, 1.0);
        ms.on_cursor_left();
        assert!(!ms.is_cursor_in_window());
        assert!(!ms.is_button_pressed(MouseButton::Left));
        assert_eq!(ms.position(), None);
    }

    #[test]
    fn test_unknown_buttons_ignored() {
        let mut ms = MouseState::new();
        ms.on_button(MouseButton::Other(9), ElementState::Pressed);
        assert!(!ms.is_button_pressed(MouseButton::Other(9)));
    }
}
