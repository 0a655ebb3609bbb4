//! Event types for input handling
//!
//! Platform-independent pointer and window events, collected between frames.

/// Mouse button type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Convert from a winit button; other buttons are not tracked.
    pub fn from_winit(button: winit::event::MouseButton) -> Option<Self> {
        match button {
            winit::event::MouseButton::Left => Some(MouseButton::Left),
            winit::event::MouseButton::Right => Some(MouseButton::Right),
            winit::event::MouseButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Input event. Positions are physical pixels from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Mouse button pressed.
    MousePress {
        button: MouseButton,
        position: (f32, f32),
        handled: bool,
    },

    /// Mouse button released.
    MouseRelease {
        button: MouseButton,
        position: (f32, f32),
        handled: bool,
    },

    /// Mouse moved.
    MouseMotion {
        delta: (f32, f32),
        position: (f32, f32),
        handled: bool,
    },

    /// Mouse wheel scrolled; positive y scrolls up.
    MouseWheel {
        delta: (f32, f32),
        position: (f32, f32),
        handled: bool,
    },

    /// Window resized, in physical pixels.
    Resize { width: u32, height: u32 },
}

impl Event {
    /// Check if the event has been handled.
    pub fn is_handled(&self) -> bool {
        match self {
            Event::MousePress { handled, .. }
            | Event::MouseRelease { handled, .. }
            | Event::MouseMotion { handled, .. }
            | Event::MouseWheel { handled, .. } => *handled,
            Event::Resize { .. } => false,
        }
    }

    /// Mark the event as handled.
    pub fn set_handled(&mut self) {
        match self {
            Event::MousePress { handled, .. }
            | Event::MouseRelease { handled, .. }
            | Event::MouseMotion { handled, .. }
            | Event::MouseWheel { handled, .. } => *handled = true,
            Event::Resize { .. } => {}
        }
    }
}

/// Scroll amount in pixels; line deltas count 20 pixels per line.
pub(crate) fn wheel_delta(delta: winit::event::MouseScrollDelta) -> (f32, f32) {
    match delta {
        winit::event::MouseScrollDelta::LineDelta(x, y) => (x * 20.0, y * 20.0),
        winit::event::MouseScrollDelta::PixelDelta(pos) => (pos.x as f32, pos.y as f32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handled_flag() {
        let mut event = Event::MouseWheel {
            delta: (0.0, 1.0),
            position: (0.0, 0.0),
            handled: false,
        };
        assert!(!event.is_handled());
        event.set_handled();
        assert!(event.is_handled());

        let mut resize = Event::Resize {
            width: 10,
            height: 10,
        };
        resize.set_handled();
        assert!(!resize.is_handled());
    }

    #[test]
    fn test_wheel_lines_scale_to_pixels() {
        let delta = wheel_delta(winit::event::MouseScrollDelta::LineDelta(0.0, -2.0));
        assert_eq!(delta, (0.0, -40.0));
    }

    #[test]
    fn test_only_three_buttons_are_tracked() {
        assert_eq!(
            MouseButton::from_winit(winit::event::MouseButton::Middle),
            Some(MouseButton::Middle)
        );
        assert_eq!(MouseButton::from_winit(winit::event::MouseButton::Back), None);
    }
}
