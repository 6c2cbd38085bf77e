//! Pointer input for springdock.
//!
//! The rendering layer translates its native events into [`PointerEvent`]s
//! and feeds them, together with a timestamp, into the engine. [`PointerState`]
//! keeps the small amount of history the engine needs (pressed buttons and the
//! last known position).

use std::time::Instant;

use springdock_core::alloc::HashSet;
use springdock_core::math::Vec2;

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A pointer event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed.
    Down { position: Vec2, button: PointerButton },
    /// Pointer moved (pressed or not).
    Move { position: Vec2 },
    /// Button released.
    Up { position: Vec2, button: PointerButton },
    /// The platform took the pointer away (window blur, touch cancel).
    Cancel,
}

impl PointerEvent {
    /// Position carried by the event, if any.
    pub fn position(&self) -> Option<Vec2> {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. } => Some(*position),
            PointerEvent::Cancel => None,
        }
    }

    /// Whether this event concerns the primary button.
    pub fn is_primary(&self) -> bool {
        matches!(
            self,
            PointerEvent::Down {
                button: PointerButton::Primary,
                ..
            } | PointerEvent::Up {
                button: PointerButton::Primary,
                ..
            }
        )
    }
}

/// A pointer event stamped with the time it was observed.
#[derive(Debug, Clone, Copy)]
pub struct TimedPointerEvent {
    pub event: PointerEvent,
    pub at: Instant,
}

impl TimedPointerEvent {
    pub fn new(event: PointerEvent, at: Instant) -> Self {
        Self { event, at }
    }
}

/// Tracks pointer position and pressed buttons across events.
#[derive(Debug, Default)]
pub struct PointerState {
    position: Option<Vec2>,
    pressed: HashSet<PointerButton>,
    last_event_at: Option<Instant>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an event into the state.
    pub fn handle(&mut self, event: &TimedPointerEvent) {
        self.last_event_at = Some(event.at);
        match event.event {
            PointerEvent::Down { position, button } => {
                self.position = Some(position);
                self.pressed.insert(button);
            }
            PointerEvent::Move { position } => {
                self.position = Some(position);
            }
            PointerEvent::Up { position, button } => {
                self.position = Some(position);
                self.pressed.remove(&button);
            }
            PointerEvent::Cancel => {
                self.pressed.clear();
            }
        }
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn is_pressed(&self, button: PointerButton) -> bool {
        self.pressed.contains(&button)
    }

    pub fn any_pressed(&self) -> bool {
        !self.pressed.is_empty()
    }

    pub fn last_event_at(&self) -> Option<Instant> {
        self.last_event_at
    }
}
