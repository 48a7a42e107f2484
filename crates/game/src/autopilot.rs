//! Scripted pilot for headless runs: presses and releases keys and nudges the mouse.

use input::{DroneBindings, ElementState, InputState, KeyCode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seconds between manoeuvre changes, lower and upper bound.
const MANOEUVRE_SECONDS: (f32, f32) = (0.5, 2.5);
/// Largest pointer delta per frame, in pixels.
const MAX_TURN_PIXELS: f64 = 12.0;

/// Deterministic pilot feeding [`InputState`] the way a window's event loop would.
pub struct Autopilot {
    rng: StdRng,
    bindings: DroneBindings,
    held: Vec<KeyCode>,
    turn: f64,
    remaining: f32,
}

impl Autopilot {
    pub fn new(seed: u64, bindings: DroneBindings) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            bindings,
            held: Vec::new(),
            turn: 0.0,
            remaining: 0.0,
        }
    }

    /// Emit this frame's events into `input`.
    pub fn drive(&mut self, input: &mut InputState, dt: f32) {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.next_manoeuvre(input);
        }
        if self.turn != 0.0 {
            input.process_mouse_motion((self.turn, 0.0));
        }
    }

    fn next_manoeuvre(&mut self, input: &mut InputState) {
        for key in self.held.drain(..) {
            input.process_keyboard(key, ElementState::Released);
        }

        let b = self.bindings;
        match self.rng.gen_range(0..3) {
            0 => self.held.push(b.forward),
            1 => self.held.push(b.back),
            _ => {}
        }
        match self.rng.gen_range(0..3) {
            0 => self.held.push(b.strafe_left),
            1 => self.held.push(b.strafe_right),
            _ => {}
        }
        if self.rng.gen_bool(0.2) {
            self.held.push(b.boost);
        }
        for &key in &self.held {
            input.process_keyboard(key, ElementState::Pressed);
        }

        self.turn = if self.rng.gen_bool(0.5) {
            self.rng.gen_range(-MAX_TURN_PIXELS..=MAX_TURN_PIXELS)
        } else {
            0.0
        };
        self.remaining = self.rng.gen_range(MANOEUVRE_SECONDS.0..MANOEUVRE_SECONDS.1);
        log::debug!("Autopilot holding {:?}, turning {:.1}px/frame", self.held, self.turn);
    }
}
