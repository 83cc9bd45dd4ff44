//! The rendered crop polygon.
//!
//! The polygon is a projection of the four corner states and never a source of
//! truth. It is recomputed after every corner mutation, including each move of
//! an active drag, so the work here is kept to four points and one short string.

use std::fmt::Write as _;

use crate::corner::{Corner, CornerState, Quad};
use crate::geometry::Point;

/// Ordered polygon vertices plus their serialized form for an SVG `points` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPolygon {
    vertices: [Point; 4],
    points: String,
    revision: u64,
}

impl OverlayPolygon {
    /// Project `corners` into a fresh polygon at revision 0.
    pub fn from_corners(corners: &Quad<CornerState>) -> Self {
        let mut overlay = Self {
            vertices: [Point::ZERO; 4],
            points: String::new(),
            revision: 0,
        };
        overlay.project(corners);
        overlay
    }

    /// Recompute from the live corner positions and bump the revision.
    pub fn refresh(&mut self, corners: &Quad<CornerState>) {
        self.project(corners);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Vertices in [`Corner::WINDING`] order.
    pub fn vertices(&self) -> &[Point; 4] {
        &self.vertices
    }

    /// `"x,y x,y x,y x,y"`.
    pub fn points(&self) -> &str {
        &self.points
    }

    /// Increases on every refresh; renderers compare it to skip redundant redraws.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn project(&mut self, corners: &Quad<CornerState>) {
        self.vertices = Corner::WINDING.map(|corner| corners[corner].position());
        self.points.clear();
        for (i, p) in self.vertices.iter().enumerate() {
            if i > 0 {
                self.points.push(' ');
            }
            // Writing into a String cannot fail
            let _ = write!(self.points, "{},{}", p.x, p.y);
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Grant(usize),
        Move(usize, f64, f64),
        Release(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..4).prop_map(Op::Grant),
            (0usize..4, -300.0f64..300.0, -300.0f64..300.0).prop_map(|(c, x, y)| Op::Move(c, x, y)),
            (0usize..4).prop_map(Op::Release),
        ]
    }

    proptest! {
        /// Property: after any grant/move/release sequence the overlay mirrors
        /// base + offset in winding order.
        #[test]
        fn prop_overlay_consistent(ops in prop::collection::vec(op_strategy(), 0..60)) {
            let mut quad = Quad::from_fn(|corner| match corner {
                Corner::TopLeft => CornerState::at(Point::new(100.0, 100.0)),
                Corner::TopRight => CornerState::at(Point::new(400.0, 100.0)),
                Corner::BottomLeft => CornerState::at(Point::new(100.0, 900.0)),
                Corner::BottomRight => CornerState::at(Point::new(400.0, 900.0)),
            });
            let mut overlay = OverlayPolygon::from_corners(&quad);

            for op in ops {
                match op {
                    Op::Grant(i) => quad[Corner::WINDING[i]].grant(),
                    Op::Move(i, x, y) => {
                        quad[Corner::WINDING[i]].move_by(Point::new(x, y));
                    }
                    Op::Release(i) => quad[Corner::WINDING[i]].release(),
                }
                overlay.refresh(&quad);
            }

            let expected = Corner::WINDING.map(|c| quad[c].base() + quad[c].offset());
            prop_assert_eq!(overlay.vertices(), &expected);
        }
    }
}
