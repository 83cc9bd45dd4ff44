//! Corner identities, the four-corner container and the drag-aware corner state.
//!
//! A corner keeps its resting position (`base`) apart from the in-flight drag
//! displacement (`offset`). The displayed position is always `base + offset`;
//! the resting value only changes when a drag is committed by [`CornerState::flatten`].

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// One of the four named vertices of the crop quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Rendering and crop-request order. Never permuted.
    pub const WINDING: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Corner::TopLeft => "topLeft",
            Corner::TopRight => "topRight",
            Corner::BottomLeft => "bottomLeft",
            Corner::BottomRight => "bottomRight",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per corner, addressable by [`Corner`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quad<T> {
    pub top_left: T,
    pub top_right: T,
    pub bottom_left: T,
    pub bottom_right: T,
}

impl<T> Quad<T> {
    /// Build a quad by evaluating `f` for each corner.
    pub fn from_fn(mut f: impl FnMut(Corner) -> T) -> Self {
        Self {
            top_left: f(Corner::TopLeft),
            top_right: f(Corner::TopRight),
            bottom_left: f(Corner::BottomLeft),
            bottom_right: f(Corner::BottomRight),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Corner, &T) -> U) -> Quad<U> {
        Quad::from_fn(|corner| f(corner, &self[corner]))
    }

    /// Values in [`Corner::WINDING`] order.
    pub fn winding(&self) -> [&T; 4] {
        Corner::WINDING.map(|corner| &self[corner])
    }
}

impl<T> Index<Corner> for Quad<T> {
    type Output = T;

    fn index(&self, corner: Corner) -> &T {
        match corner {
            Corner::TopLeft => &self.top_left,
            Corner::TopRight => &self.top_right,
            Corner::BottomLeft => &self.bottom_left,
            Corner::BottomRight => &self.bottom_right,
        }
    }
}

impl<T> IndexMut<Corner> for Quad<T> {
    fn index_mut(&mut self, corner: Corner) -> &mut T {
        match corner {
            Corner::TopLeft => &mut self.top_left,
            Corner::TopRight => &mut self.top_right,
            Corner::BottomLeft => &mut self.bottom_left,
            Corner::BottomRight => &mut self.bottom_right,
        }
    }
}

/// A corner position that can be dragged without touching its resting value.
///
/// Invariant: `offset` is non-zero only while `dragging` is true.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerState {
    base: Point,
    offset: Point,
    dragging: bool,
}

impl CornerState {
    /// A resting corner at `base`.
    pub fn at(base: Point) -> Self {
        Self {
            base,
            offset: Point::ZERO,
            dragging: false,
        }
    }

    pub fn base(&self) -> Point {
        self.base
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Displayed position: `base + offset`.
    pub fn position(&self) -> Point {
        self.base + self.offset
    }

    /// Start a drag. `base` is captured as is.
    pub fn grant(&mut self) {
        self.dragging = true;
    }

    /// Track the cumulative displacement since [`grant`](Self::grant).
    ///
    /// Returns false (and does nothing) when no drag is active.
    pub fn move_by(&mut self, delta: Point) -> bool {
        if !self.dragging {
            return false;
        }
        self.offset = delta;
        true
    }

    /// Commit the drag. Same as [`flatten`](Self::flatten).
    pub fn release(&mut self) {
        self.flatten();
    }

    /// Fold `offset` into `base` and end the drag. Idempotent.
    pub fn flatten(&mut self) {
        self.base = self.base + self.offset;
        self.offset = Point::ZERO;
        self.dragging = false;
    }

    /// Abandon the drag, returning to the pre-drag `base`.
    pub fn cancel(&mut self) {
        self.offset = Point::ZERO;
        self.dragging = false;
    }

    /// Replace the whole state with a resting corner at `base`.
    pub fn reset(&mut self, base: Point) {
        *self = Self::at(base);
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: release always lands on base + last delta and clears the drag.
        #[test]
        fn prop_release_commits_last_delta(
            (bx, by) in (-1000.0f64..1000.0, -1000.0f64..1000.0),
            deltas in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..20),
        ) {
            let mut corner = CornerState::at(Point::new(bx, by));
            corner.grant();
            for (dx, dy) in &deltas {
                corner.move_by(Point::new(*dx, *dy));
            }
            let (lx, ly) = *deltas.last().unwrap();
            corner.release();

            prop_assert_eq!(corner.base(), Point::new(bx + lx, by + ly));
            prop_assert!(corner.offset().is_zero());
            prop_assert!(!corner.is_dragging());
        }
    }
}
