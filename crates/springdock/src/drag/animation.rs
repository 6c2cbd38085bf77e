//! Ghost positioning and the spring-driven return flight.

use std::time::{Duration, Instant};

use springdock_core::math::Vec2;

use crate::config::DragConfig;

/// Maximum integration step. Longer frames are subdivided.
const MAX_STEP_SECS: f32 = 0.004;

/// Velocity (px/s) under which a flight within rest distance counts as settled.
const REST_VELOCITY: f32 = 5.0;

/// Imperative handle to the dragged item's on-screen ghost.
///
/// Implemented by the rendering layer; the engine moves the ghost directly
/// on every pointer move and animation frame instead of re-rendering.
pub trait PositionHandle {
    fn set_position(&mut self, position: Vec2);
}

/// Handle that discards positions, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedHandle;

impl PositionHandle for DetachedHandle {
    fn set_position(&mut self, _position: Vec2) {}
}

/// Damped spring carrying the ghost from its release position to its
/// landing spot.
#[derive(Debug, Clone)]
pub struct ReturnFlight {
    position: Vec2,
    velocity: Vec2,
    target: Vec2,
    stiffness: f32,
    damping: f32,
    rest_distance: f32,
    started_at: Instant,
    timeout: Duration,
    settled: bool,
}

impl ReturnFlight {
    pub fn new(from: Vec2, to: Vec2, config: &DragConfig, now: Instant) -> Self {
        let mut flight = Self {
            position: from,
            velocity: Vec2::ZERO,
            target: to,
            stiffness: config.stiffness.max(0.1),
            damping: config.damping.max(0.0),
            rest_distance: config.rest_distance,
            started_at: now,
            timeout: config.return_timeout(),
            settled: false,
        };
        flight.check_rest();
        flight
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Whether the fallback deadline has passed.
    pub fn timed_out(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.timeout
    }

    /// Advance the spring by `dt` and return the new position.
    pub fn step(&mut self, dt: Duration) -> Vec2 {
        if self.settled {
            return self.position;
        }
        let mut remaining = dt.as_secs_f32();
        while remaining > 0.0 && !self.settled {
            let h = remaining.min(MAX_STEP_SECS);
            let displacement = self.position - self.target;
            let accel = -self.stiffness * displacement - self.damping * self.velocity;
            // Semi-implicit Euler.
            self.velocity += accel * h;
            self.position += self.velocity * h;
            remaining -= h;
            self.check_rest();
        }
        self.position
    }

    /// Jump to the target.
    pub fn finish(&mut self) -> Vec2 {
        self.position = self.target;
        self.velocity = Vec2::ZERO;
        self.settled = true;
        self.position
    }

    fn check_rest(&mut self) {
        if self.position.distance(self.target) <= self.rest_distance
            && self.velocity.length() <= REST_VELOCITY
        {
            self.finish();
        }
    }
}
