//! Per-corner pointer tracking and handle hit testing.
//!
//! Each [`GestureController`] follows exactly one pointer at a time and drives
//! exactly one [`CornerState`]. Controllers share nothing, so several corners
//! can be dragged at once with their events interleaved.
//!
//! Gesture delivery belongs to the host input system and is assumed to be well
//! formed. Out-of-order events (a move before a down, a second up, an event
//! from some other pointer) are dropped and logged rather than reported.

use serde::{Deserialize, Serialize};

use crate::corner::{Corner, CornerState, Quad};
use crate::geometry::Point;

/// Side length of the square touch target centred on each corner, in view units.
pub const HANDLE_SIZE: f64 = 140.0;

/// Host-assigned identifier of a physical pointer or touch.
pub type PointerId = u32;

/// A single input event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PointerEvent {
    Down { pointer: PointerId, position: Point },
    Move { pointer: PointerId, position: Point },
    Up { pointer: PointerId },
    Cancel { pointer: PointerId },
}

impl PointerEvent {
    pub fn pointer(&self) -> PointerId {
        match *self {
            PointerEvent::Down { pointer, .. }
            | PointerEvent::Move { pointer, .. }
            | PointerEvent::Up { pointer }
            | PointerEvent::Cancel { pointer } => pointer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActivePointer {
    id: PointerId,
    start: Point,
}

/// Binds one pointer stream (down, moves, up) to one corner.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    active: Option<ActivePointer>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pointer currently driving this corner, if any.
    pub fn pointer(&self) -> Option<PointerId> {
        self.active.map(|a| a.id)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Touch-down: start following `pointer` and grant the corner.
    ///
    /// Returns true when the corner entered a drag.
    pub fn down(&mut self, corner: &mut CornerState, pointer: PointerId, position: Point) -> bool {
        if let Some(active) = self.active {
            tracing::debug!(
                pointer,
                held_by = active.id,
                "ignoring touch-down on a corner that is already being dragged"
            );
            return false;
        }
        if !position.is_finite() {
            tracing::debug!(pointer, "ignoring touch-down at a non-finite position");
            return false;
        }
        self.active = Some(ActivePointer {
            id: pointer,
            start: position,
        });
        corner.grant();
        true
    }

    /// Pointer moved: push the cumulative displacement since touch-down.
    pub fn track(&mut self, corner: &mut CornerState, pointer: PointerId, position: Point) -> bool {
        let Some(active) = self.owned_by(pointer, "move") else {
            return false;
        };
        if !position.is_finite() {
            tracing::debug!(pointer, "ignoring move to a non-finite position");
            return false;
        }
        let delta = position - active.start;
        tracing::trace!(pointer, dx = delta.x, dy = delta.y, "corner drag");
        corner.move_by(delta)
    }

    /// Touch-up: commit the drag.
    pub fn up(&mut self, corner: &mut CornerState, pointer: PointerId) -> bool {
        if self.owned_by(pointer, "release").is_none() {
            return false;
        }
        self.active = None;
        corner.release();
        true
    }

    /// Gesture interrupted: discard the drag.
    pub fn cancel(&mut self, corner: &mut CornerState, pointer: PointerId) -> bool {
        if self.owned_by(pointer, "cancel").is_none() {
            return false;
        }
        self.active = None;
        corner.cancel();
        true
    }

    /// Forget any followed pointer without touching the corner.
    pub fn reset(&mut self) {
        self.active = None;
    }

    fn owned_by(&self, pointer: PointerId, what: &str) -> Option<ActivePointer> {
        match self.active {
            Some(active) if active.id == pointer => Some(active),
            Some(active) => {
                tracing::debug!(pointer, held_by = active.id, "ignoring {what} from foreign pointer");
                None
            }
            None => {
                tracing::debug!(pointer, "ignoring {what} without a preceding touch-down");
                None
            }
        }
    }
}

/// Find the corner whose handle contains `position`.
///
/// Corners already being dragged are skipped. When handles overlap, the corner
/// whose displayed position is closest wins; ties go to the earlier corner in
/// [`Corner::WINDING`].
pub fn hit_test(corners: &Quad<CornerState>, position: Point) -> Option<Corner> {
    let half = HANDLE_SIZE / 2.0;
    Corner::WINDING
        .into_iter()
        .filter(|&corner| !corners[corner].is_dragging())
        .filter_map(|corner| {
            let d = position - corners[corner].position();
            (d.x.abs() <= half && d.y.abs() <= half).then_some((corner, d.x * d.x + d.y * d.y))
        })
        .fold(None, |best: Option<(Corner, f64)>, (corner, dist)| match best {
            Some((_, best_dist)) if best_dist <= dist => best,
            _ => Some((corner, dist)),
        })
        .map(|(corner, _)| corner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Quad<CornerState> {
        Quad {
            top_left: CornerState::at(Point::new(100.0, 100.0)),
            top_right: CornerState::at(Point::new(400.0, 100.0)),
            bottom_left: CornerState::at(Point::new(100.0, 900.0)),
            bottom_right: CornerState::at(Point::new(400.0, 900.0)),
        }
    }

    #[test]
    fn test_cumulative_delta() {
        let mut corner = CornerState::at(Point::new(400.0, 100.0));
        let mut ctl = GestureController::new();

        assert!(ctl.down(&mut corner, 7, Point::new(410.0, 110.0)));
        assert!(ctl.track(&mut corner, 7, Point::new(415.0, 108.0)));
        assert!(ctl.track(&mut corner, 7, Point::new(430.0, 105.0)));
        assert_eq!(corner.offset(), Point::new(20.0, -5.0));

        assert!(ctl.up(&mut corner, 7));
        assert_eq!(corner.base(), Point::new(420.0, 95.0));
        assert!(!ctl.is_active());
    }

    #[test]
    fn test_malformed_sequences_ignored() {
        let mut corner = CornerState::at(Point::new(0.0, 0.0));
        let mut ctl = GestureController::new();

        // Move and release before any touch-down
        assert!(!ctl.track(&mut corner, 1, Point::new(5.0, 5.0)));
        assert!(!ctl.up(&mut corner, 1));
        assert!(!ctl.cancel(&mut corner, 1));
        assert_eq!(corner, CornerState::at(Point::ZERO));

        ctl.down(&mut corner, 1, Point::ZERO);
        // Second pointer cannot steal the corner
        assert!(!ctl.down(&mut corner, 2, Point::new(1.0, 1.0)));
        assert!(!ctl.track(&mut corner, 2, Point::new(50.0, 50.0)));
        assert_eq!(ctl.pointer(), Some(1));

        ctl.track(&mut corner, 1, Point::new(3.0, 0.0));
        assert!(ctl.up(&mut corner, 1));
        // Duplicate release
        assert!(!ctl.up(&mut corner, 1));
        assert_eq!(corner.base(), Point::new(3.0, 0.0));
    }

    #[test]
    fn test_non_finite_positions_ignored() {
        let mut corner = CornerState::at(Point::new(100.0, 100.0));
        let mut ctl = GestureController::new();

        assert!(!ctl.down(&mut corner, 1, Point::new(f64::NAN, 0.0)));
        assert!(!ctl.is_active());
        assert!(!corner.is_dragging());

        assert!(ctl.down(&mut corner, 1, Point::new(100.0, 100.0)));
        assert!(ctl.track(&mut corner, 1, Point::new(120.0, 110.0)));
        assert!(!ctl.track(&mut corner, 1, Point::new(f64::NAN, 110.0)));
        assert!(!ctl.track(&mut corner, 1, Point::new(0.0, f64::INFINITY)));
        assert_eq!(corner.offset(), Point::new(20.0, 10.0));

        assert!(ctl.up(&mut corner, 1));
        assert_eq!(corner.base(), Point::new(120.0, 110.0));
        assert!(corner.base().is_finite());
    }

    #[test]
    fn test_cancel_restores_base() {
        let mut corner = CornerState::at(Point::new(10.0, 10.0));
        let mut ctl = GestureController::new();
        ctl.down(&mut corner, 1, Point::ZERO);
        ctl.track(&mut corner, 1, Point::new(40.0, 40.0));
        assert!(ctl.cancel(&mut corner, 1));
        assert_eq!(corner.position(), Point::new(10.0, 10.0));
        assert!(!corner.is_dragging());
        assert!(!ctl.is_active());
    }

    #[test]
    fn test_hit_test_inside_handle() {
        let corners = square();
        assert_eq!(hit_test(&corners, Point::new(120.0, 80.0)), Some(Corner::TopLeft));
        assert_eq!(hit_test(&corners, Point::new(460.0, 960.0)), Some(Corner::BottomRight));
        assert_eq!(hit_test(&corners, Point::new(250.0, 500.0)), None);
        // Just outside the 70-unit half extent
        assert_eq!(hit_test(&corners, Point::new(171.0, 100.0)), None);
    }

    #[test]
    fn test_hit_test_prefers_nearest() {
        let mut corners = square();
        corners[Corner::TopRight].reset(Point::new(180.0, 100.0));
        assert_eq!(hit_test(&corners, Point::new(150.0, 100.0)), Some(Corner::TopRight));
        assert_eq!(hit_test(&corners, Point::new(130.0, 100.0)), Some(Corner::TopLeft));
    }

    #[test]
    fn test_hit_test_skips_dragging_corner() {
        let mut corners = square();
        corners[Corner::TopLeft].grant();
        assert_eq!(hit_test(&corners, Point::new(100.0, 100.0)), None);
    }

    #[test]
    fn test_pointer_event_serde_shape() {
        let event: PointerEvent =
            serde_json::from_str(r#"{"type":"move","pointer":3,"position":{"x":1.5,"y":2.0}}"#)
                .unwrap();
        assert_eq!(
            event,
            PointerEvent::Move {
                pointer: 3,
                position: Point::new(1.5, 2.0)
            }
        );
        assert_eq!(event.pointer(), 3);
    }
}
