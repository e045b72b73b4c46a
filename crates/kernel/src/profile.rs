//! Closed 2D outlines used as extrusion boundaries and holes.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

use crate::geometry::point::Point2d;

/// Pill outline; see [`Profile::pill`].
pub fn pill_profile(
    radius: f64,
    straight_length: f64,
    origin_x: f64,
    origin_z: f64,
    arc_points: usize,
) -> Profile {
    Profile::pill(radius, straight_length, origin_x, origin_z, arc_points)
}

/// An ordered, closed loop of profile-plane points.
///
/// The last point connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub points: Vec<Point2d>,
}

impl Profile {
    pub fn from_points(points: Vec<Point2d>) -> Self {
        Self { points }
    }

    /// Axis-aligned rectangle between two corners, counter-clockwise.
    pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            points: vec![
                Point2d::new(x0, y0),
                Point2d::new(x1, y0),
                Point2d::new(x1, y1),
                Point2d::new(x0, y1),
            ],
        }
    }

    /// Rounded-rectangle "pill": two semicircles of `radius` joined by straight
    /// edges of `straight_length`.
    ///
    /// The left semicircle is centred at `(origin_x, origin_y)` and runs from
    /// the top through the far left to the bottom; the right one is centred
    /// `straight_length` further along X and runs from the bottom back to the
    /// top. Its first point is the end of the straight bottom edge. A zero
    /// straight length gives a circle whose shared bottom point is emitted once.
    ///
    /// Each semicircle has `arc_points / 2 + 1` points. The angular step is
    /// derived from the half count, so every half is an exact semicircle even
    /// when `arc_points` is odd (it then behaves like the next lower even
    /// count).
    pub fn pill(
        radius: f64,
        straight_length: f64,
        origin_x: f64,
        origin_y: f64,
        arc_points: usize,
    ) -> Self {
        let half = (arc_points / 2).max(1);
        let step = PI / half as f64;
        let is_circle = straight_length <= 0.0;
        let mut points = Vec::with_capacity(2 * (half + 1));

        for i in 0..=half {
            let angle = FRAC_PI_2 + i as f64 * step;
            points.push(Point2d::new(
                origin_x + radius * angle.cos(),
                origin_y + radius * angle.sin(),
            ));
        }

        let right_x = origin_x + straight_length.max(0.0);
        let first_right = if is_circle { 1 } else { 0 };
        for i in first_right..=half {
            let angle = -FRAC_PI_2 + i as f64 * step;
            points.push(Point2d::new(
                right_x + radius * angle.cos(),
                origin_y + radius * angle.sin(),
            ));
        }

        Self { points }
    }

    /// Circle of `radius` centred at `(cx, cy)`.
    pub fn circle(radius: f64, cx: f64, cy: f64, arc_points: usize) -> Self {
        Self::pill(radius, 0.0, cx, cy, arc_points)
    }

    /// The same loop shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| Point2d::new(p.x + dx, p.y + dy))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Componentwise (min, max) of the loop.
    pub fn bounds(&self) -> Option<(Point2d, Point2d)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (
                Point2d::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point2d::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }

    /// Signed area by the shoelace formula (positive when counter-clockwise).
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            * 0.5
    }
}
