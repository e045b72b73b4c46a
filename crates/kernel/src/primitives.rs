//! Primitive solid descriptions handed to the rendering host.
//!
//! The kernel never tessellates; each primitive is a recipe (panel, swept
//! tube, extruded polygon with holes) plus a placement in the part's local
//! frame. A [`SolidBody`] is the list of primitives the host merges into one
//! mesh.

use serde::{Deserialize, Serialize};

use crate::geometry::obb::OrientedBox;
use crate::geometry::point::Point3d;
use crate::geometry::transform::{BoundingBox, Transform};
use crate::profile::Profile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PrimitiveShape {
    /// Rectangular plate `[0, width] x [0, thickness] x [0, height]`.
    Panel {
        width: f64,
        height: f64,
        thickness: f64,
    },
    /// Circular tube of `radius` swept along a polyline, open at the first
    /// point and closed at the last.
    Tube {
        path: Vec<Point3d>,
        radius: f64,
        tessellation: usize,
    },
    /// Profile in the XZ plane extruded along +Y by `depth`, with hole loops.
    /// A zero depth describes a flat face.
    Extrusion {
        outline: Profile,
        holes: Vec<Profile>,
        depth: f64,
    },
}

/// A primitive with its placement in the part frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub shape: PrimitiveShape,
    pub placement: Transform,
}

impl Primitive {
    pub fn new(shape: PrimitiveShape) -> Self {
        Self {
            shape,
            placement: Transform::identity(),
        }
    }

    pub fn placed(shape: PrimitiveShape, placement: Transform) -> Self {
        Self { shape, placement }
    }

    /// Conservative bounds in the part frame.
    pub fn bounds(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for corner in self.shape_bounds().corners() {
            bb.expand_to_include(&self.placement.transform_point(&corner));
        }
        bb
    }

    fn shape_bounds(&self) -> BoundingBox {
        match &self.shape {
            PrimitiveShape::Panel {
                width,
                height,
                thickness,
            } => BoundingBox::from_points(&[
                Point3d::ORIGIN,
                Point3d::new(*width, *thickness, *height),
            ]),
            PrimitiveShape::Tube { path, radius, .. } => {
                let bb = BoundingBox::from_points(path);
                if bb.is_valid() {
                    bb.expanded(*radius)
                } else {
                    BoundingBox::from_points(&[Point3d::ORIGIN])
                }
            }
            PrimitiveShape::Extrusion { outline, depth, .. } => match outline.bounds() {
                Some((lo, hi)) => {
                    BoundingBox::from_points(&[lo.on_xz(0.0), hi.on_xz(*depth)])
                }
                None => BoundingBox::from_points(&[Point3d::ORIGIN]),
            },
        }
    }
}

/// One part's merged solid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolidBody {
    pub primitives: Vec<Primitive>,
}

impl SolidBody {
    pub fn new(primitives: Vec<Primitive>) -> Self {
        Self { primitives }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// Union of the primitive bounds, in the part frame.
    pub fn bounds(&self) -> BoundingBox {
        self.primitives
            .iter()
            .fold(BoundingBox::empty(), |acc, p| acc.union(&p.bounds()))
    }

    /// The full-solid volume used by the broad collision check.
    pub fn hull(&self) -> OrientedBox {
        let bounds = self.bounds();
        if bounds.is_valid() {
            OrientedBox::from_bounds(&bounds)
        } else {
            OrientedBox::from_corners(Point3d::ORIGIN, Point3d::ORIGIN)
        }
    }
}
