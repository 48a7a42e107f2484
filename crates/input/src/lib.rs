//! Keyboard and mouse state, reduced once per frame to the drone's input sample.

use glam::Vec2;
use std::collections::HashSet;

/// One frame of drone control input.
///
/// Everything the flight controller reads from the outside world besides the
/// frame time: a pointer delta and five digital actions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DroneInput {
    /// Pointer movement since the previous frame, in pixels.
    pub pointer_delta: Vec2,
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub boost: bool,
}

impl DroneInput {
    /// Forward/back axis in `{-1, 0, 1}`.
    pub fn throttle(&self) -> f32 {
        axis(self.forward, self.back)
    }

    /// Strafe axis in `{-1, 0, 1}`, positive to the right.
    pub fn strafe(&self) -> f32 {
        axis(self.strafe_right, self.strafe_left)
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    (positive as i8 - negative as i8) as f32
}

/// Key assignment for the drone actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DroneBindings {
    pub forward: KeyCode,
    pub back: KeyCode,
    pub strafe_left: KeyCode,
    pub strafe_right: KeyCode,
    pub boost: KeyCode,
}

impl Default for DroneBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            back: KeyCode::KeyS,
            strafe_left: KeyCode::KeyA,
            strafe_right: KeyCode::KeyD,
            boost: KeyCode::Space,
        }
    }
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,

    /// Mouse movement delta this frame.
    mouse_delta: Vec2,
    /// Accumulated mouse delta since the last `begin_frame`.
    accumulated_delta: Vec2,

    /// Whether the cursor is captured/locked.
    cursor_locked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch the pointer motion gathered since the last call. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process raw mouse movement.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        self.accumulated_delta.x += delta.0 as f32;
        self.accumulated_delta.y += delta.1 as f32;
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Get the mouse movement delta for this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn set_cursor_locked(&mut self, locked: bool) {
        if self.cursor_locked != locked {
            log::debug!("Cursor {}", if locked { "locked" } else { "released" });
        }
        self.cursor_locked = locked;
    }

    /// Sample the drone controls. The pointer only steers while the cursor is locked.
    pub fn drone_input(&self, bindings: &DroneBindings) -> DroneInput {
        DroneInput {
            pointer_delta: if self.cursor_locked {
                self.mouse_delta
            } else {
                Vec2::ZERO
            },
            forward: self.is_key_held(bindings.forward),
            back: self.is_key_held(bindings.back),
            strafe_left: self.is_key_held(bindings.strafe_left),
            strafe_right: self.is_key_held(bindings.strafe_right),
            boost: self.is_key_held(bindings.boost),
        }
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
