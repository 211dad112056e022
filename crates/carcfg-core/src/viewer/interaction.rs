//! Drag-to-rotate interaction.
//!
//! # State machine
//!
//! ```text
//!            pointer down (x)
//!   Idle ───────────────────────► Dragging { last_x }
//!    ▲                               │   │
//!    │      pointer up / leave       │   │ pointer move (x):
//!    └───────────────────────────────┘   │   yield (x - last_x) * sensitivity
//!                                        └── last_x = x
//! ```
//!
//! Moves while `Idle` are ignored.  Only horizontal displacement matters; the
//! resulting delta is applied to the car body's yaw, never to the camera.

/// Radians of body rotation per pixel of horizontal drag.
pub const DEFAULT_SENSITIVITY: f32 = 0.01;

/// A pointer event delivered by the render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32 },
    Move { x: f32 },
    Up,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Horizontal position of the previous pointer event.
        last_x: f32,
    },
}

/// Turns pointer events into body rotation increments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRotate {
    state: DragState,
    sensitivity: f32,
}

impl Default for DragRotate {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVITY)
    }
}

impl DragRotate {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            state: DragState::Idle,
            sensitivity,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Advances the state machine.
    ///
    /// Returns the rotation delta in radians to apply to the body, if any.
    pub fn handle(&mut self, event: PointerEvent) -> Option<f32> {
        match (self.state, event) {
            (_, PointerEvent::Down { x }) => {
                self.state = DragState::Dragging { last_x: x };
                None
            }
            (DragState::Dragging { last_x }, PointerEvent::Move { x }) => {
                self.state = DragState::Dragging { last_x: x };
                Some((x - last_x) * self.sensitivity)
            }
            (DragState::Idle, PointerEvent::Move { .. }) => None,
            (_, PointerEvent::Up | PointerEvent::Leave) => {
                self.state = DragState::Idle;
                None
            }
        }
    }

    /// Forces the machine back to `Idle`, e.g. when listeners are detached.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        assert_eq!(DragRotate::default().state(), DragState::Idle);
    }

    #[test]
    fn test_move_while_idle_yields_nothing() {
        let mut drag = DragRotate::default();
        assert_eq!(drag.handle(PointerEvent::Move { x: 50.0 }), None);
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn test_down_enters_dragging_and_records_position() {
        let mut drag = DragRotate::default();

        let delta = drag.handle(PointerEvent::Down { x: 120.0 });

        assert_eq!(delta, None);
        assert_eq!(drag.state(), DragState::Dragging { last_x: 120.0 });
    }

    #[test]
    fn test_move_yields_delta_since_last_move() {
        // Arrange
        let mut drag = DragRotate::new(0.5);
        drag.handle(PointerEvent::Down { x: 10.0 });

        // Act
        let first = drag.handle(PointerEvent::Move { x: 14.0 });
        let second = drag.handle(PointerEvent::Move { x: 12.0 });

        // Assert – each delta is relative to the previous move, not to the press
        assert_eq!(first, Some(2.0));
        assert_eq!(second, Some(-1.0));
    }

    #[test]
    fn test_up_and_leave_return_to_idle() {
        for end in [PointerEvent::Up, PointerEvent::Leave] {
            let mut drag = DragRotate::default();
            drag.handle(PointerEvent::Down { x: 0.0 });

            drag.handle(end);

            assert!(!drag.is_dragging(), "{end:?} must end the drag");
            assert_eq!(drag.handle(PointerEvent::Move { x: 30.0 }), None);
        }
    }

    #[test]
    fn test_default_sensitivity_is_one_hundredth_radian_per_pixel() {
        let mut drag = DragRotate::default();
        drag.handle(PointerEvent::Down { x: 0.0 });
        let delta = drag.handle(PointerEvent::Move { x: 100.0 }).expect("dragging");
        assert!((delta - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_reset_abandons_drag() {
        let mut drag = DragRotate::default();
        drag.handle(PointerEvent::Down { x: 0.0 });
        drag.reset();
        assert_eq!(drag.state(), DragState::Idle);
    }
}
