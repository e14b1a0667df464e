//! Tap versus drag/hold disambiguation for the book surface.
//!
//! The flip widget treats any release as a potential page turn. A press only
//! counts as a tap when it is both short and stationary; anything else is a
//! pan or a long press and must not turn the page.

use std::time::Instant;

use crate::config::GestureConfig;

/// Pointer position in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PointerSession {
    started_at: Instant,
    origin: Position,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Pressed(PointerSession),
    Dragging(PointerSession),
}

/// How a completed press was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Tap,
    Drag,
    Hold,
    /// Release without a matching press.
    Unpaired,
}

impl Classification {
    pub fn should_suppress_flip(self) -> bool {
        matches!(self, Self::Drag | Self::Hold)
    }
}

/// Single-pointer state machine: `Idle -> Pressed -> (Dragging | Held) -> Idle`.
///
/// Timestamps are passed in; only [`Self::pointer_up_now`] reads the clock.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    config: GestureConfig,
    state: State,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: State::Idle,
        }
    }

    /// Starts a new session, discarding any drag state from the previous one.
    pub fn pointer_down(&mut self, position: Position, at: Instant) {
        self.state = State::Pressed(PointerSession {
            started_at: at,
            origin: position,
        });
    }

    /// Moves the origin of a stationary press without restarting its hold
    /// timer. Used when the press position arrives after the press itself.
    pub fn relocate(&mut self, position: Position) {
        if let State::Pressed(session) = &mut self.state {
            session.origin = position;
        }
    }

    /// Returns whether the active session is a drag. Moves outside a session
    /// are ignored.
    pub fn pointer_move(&mut self, position: Position) -> bool {
        if let State::Pressed(session) = self.state {
            if session.origin.distance(position) > self.config.drag_threshold {
                tracing::debug!(
                    distance = session.origin.distance(position),
                    "pointer session became a drag"
                );
                self.state = State::Dragging(session);
            }
        }

        self.is_dragging()
    }

    /// Ends the session and classifies it.
    pub fn pointer_up(&mut self, at: Instant) -> Classification {
        let classification = match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => Classification::Unpaired,
            State::Dragging(_) => Classification::Drag,
            State::Pressed(session) => {
                if self.was_held(session, at) {
                    Classification::Hold
                } else {
                    Classification::Tap
                }
            }
        };

        tracing::debug!(?classification, "pointer session ended");
        classification
    }

    /// [`Self::pointer_up`] stamped with the current time.
    pub fn pointer_up_now(&mut self) -> Classification {
        self.pointer_up(Instant::now())
    }

    /// Whether a press is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging(_))
    }

    fn was_held(&self, session: PointerSession, at: Instant) -> bool {
        at.saturating_duration_since(session.started_at) > self.config.hold_threshold
    }
}
