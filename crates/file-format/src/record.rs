//! One part per line: `kind,x,y,z,rotX,rotY,rotZ,<shape parameters>`.
//!
//! Parameters follow a fixed order per kind. New parameters are only ever
//! appended, so readers ignore extra trailing fields and let a missing
//! trailing `reflected` default to false.

use std::f64::consts::TAU;
use std::fmt::Write as _;

use arbor_kernel::{Point3d, Pose, Vec3};
use arbor_parts::{BranchParams, LeafParams, PartKind, PartShape, StemParams, TrunkParams};

use crate::errors::RecordError;

/// Most ribs a trunk line may ask for.
pub const MAX_RIB_COUNT: usize = 1_000;

/// Most holes or slots a single hole row may ask for.
pub const MAX_HOLES_PER_ROW: f64 = 10_000.0;

/// The saved form of one part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartRecord {
    pub shape: PartShape,
    pub pose: Pose,
}

impl PartRecord {
    pub fn new(shape: PartShape, pose: Pose) -> Self {
        Self { shape, pose }
    }

    pub fn to_line(&self) -> String {
        let mut out = String::from(self.shape.kind().tag());
        let p = self.pose.position;
        let r = self.pose.rotation;
        for v in [p.x, p.y, p.z, r.x, r.y, r.z] {
            push_number(&mut out, v);
        }
        match &self.shape {
            PartShape::Leaf(l) => {
                for v in [l.width, l.height, l.thickness] {
                    push_number(&mut out, v);
                }
            }
            PartShape::Stem(s) => {
                for v in [
                    s.length_pre,
                    s.length_post,
                    s.bend_angle,
                    s.fillet_radius,
                    s.stem_radius,
                    s.connector_radius,
                    s.connector_length,
                ] {
                    push_number(&mut out, v);
                }
                push_flag(&mut out, s.reflected);
            }
            PartShape::Branch(b) => {
                for v in [
                    b.length,
                    b.thickness,
                    b.outer_radius,
                    b.hole_radius,
                    b.hole_spacing,
                    b.slot_length,
                ] {
                    push_number(&mut out, v);
                }
                push_flag(&mut out, b.reflected);
            }
            PartShape::Trunk(t) => {
                for v in [t.length, t.width, t.thickness] {
                    push_number(&mut out, v);
                }
                let _ = write!(out, ",{}", t.rib_count);
                for v in [
                    t.rib_radius,
                    t.rib_thickness,
                    t.rib_spacing,
                    t.edge_distance,
                    t.hole_radius,
                    t.hole_spacing,
                ] {
                    push_number(&mut out, v);
                }
                push_flag(&mut out, t.reflected);
            }
        }
        out
    }

    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let mut fields = Fields::new(line);
        let tag = fields.next().ok_or(RecordError::Empty)?;
        let kind = PartKind::from_tag(tag).ok_or_else(|| RecordError::UnknownKind {
            tag: tag.to_string(),
        })?;

        let position = Point3d::new(fields.number("x")?, fields.number("y")?, fields.number("z")?);
        let rotation = Vec3::new(
            fields.number("rotX")?,
            fields.number("rotY")?,
            fields.number("rotZ")?,
        );

        let shape = match kind {
            PartKind::Leaf => PartShape::Leaf(LeafParams {
                width: fields.number("width")?,
                height: fields.number("height")?,
                thickness: fields.number("thickness")?,
            }),
            PartKind::Stem => PartShape::Stem(StemParams {
                length_pre: fields.number("length_pre")?,
                length_post: fields.number("length_post")?,
                bend_angle: fields.number_within("bend_angle", TAU)?,
                fillet_radius: fields.number("fillet_radius")?,
                stem_radius: fields.number("stem_radius")?,
                connector_radius: fields.number("connector_radius")?,
                connector_length: fields.number("connector_length")?,
                reflected: fields.trailing_flag("reflected")?,
            }),
            PartKind::Branch => PartShape::Branch(check_slot_row(BranchParams {
                length: fields.number("length")?,
                thickness: fields.number("thickness")?,
                outer_radius: fields.number("outer_radius")?,
                hole_radius: fields.number("hole_radius")?,
                hole_spacing: fields.number("hole_spacing")?,
                slot_length: fields.number("slot_length")?,
                reflected: fields.trailing_flag("reflected")?,
            })?),
            PartKind::Trunk => PartShape::Trunk(check_rib_holes(TrunkParams {
                length: fields.number("length")?,
                width: fields.number("width")?,
                thickness: fields.number("thickness")?,
                rib_count: fields.count_at_most("rib_count", MAX_RIB_COUNT)?,
                rib_radius: fields.number("rib_radius")?,
                rib_thickness: fields.number("rib_thickness")?,
                rib_spacing: fields.number("rib_spacing")?,
                edge_distance: fields.number("edge_distance")?,
                hole_radius: fields.number("hole_radius")?,
                hole_spacing: fields.number("hole_spacing")?,
                reflected: fields.trailing_flag("reflected")?,
            })?),
        };

        Ok(Self {
            shape,
            pose: Pose::new(position, rotation),
        })
    }
}

/// Rejects a bar whose slot pitch would lay out an unbounded slot row.
fn check_slot_row(b: BranchParams) -> Result<BranchParams, RecordError> {
    let pitch = b.slot_length + b.hole_spacing;
    if b.slot_length > 0.0 && (pitch <= 0.0 || b.length / pitch > MAX_HOLES_PER_ROW) {
        return Err(RecordError::InvalidNumber {
            field: "slot_length",
            value: b.slot_length.to_string(),
        });
    }
    Ok(b)
}

/// Rejects a trunk whose rib hole spacing would drill an unbounded row.
fn check_rib_holes(t: TrunkParams) -> Result<TrunkParams, RecordError> {
    if t.hole_spacing > 0.0 && t.length / t.hole_spacing > MAX_HOLES_PER_ROW {
        return Err(RecordError::InvalidNumber {
            field: "hole_spacing",
            value: t.hole_spacing.to_string(),
        });
    }
    Ok(t)
}

fn push_number(out: &mut String, v: f64) {
    // `Display` for f64 is the shortest text that parses back to the same value.
    let _ = write!(out, ",{v}");
}

fn push_flag(out: &mut String, flag: bool) {
    out.push_str(if flag { ",1" } else { ",0" });
}

/// Comma-separated fields of one line, trimmed.
struct Fields<'a> {
    inner: std::str::Split<'a, char>,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            inner: line.trim().split(','),
        }
    }

    fn next(&mut self) -> Option<&'a str> {
        self.inner.next().map(str::trim).filter(|s| !s.is_empty())
    }

    fn required(&mut self, field: &'static str) -> Result<&'a str, RecordError> {
        self.next().ok_or(RecordError::MissingField { field })
    }

    fn number(&mut self, field: &'static str) -> Result<f64, RecordError> {
        let raw = self.required(field)?;
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| RecordError::InvalidNumber {
                field,
                value: raw.to_string(),
            })
    }

    /// A finite number no larger than `limit` in magnitude.
    fn number_within(&mut self, field: &'static str, limit: f64) -> Result<f64, RecordError> {
        let value = self.number(field)?;
        if value.abs() > limit {
            return Err(RecordError::InvalidNumber {
                field,
                value: value.to_string(),
            });
        }
        Ok(value)
    }

    fn count_at_most(&mut self, field: &'static str, max: usize) -> Result<usize, RecordError> {
        let raw = self.required(field)?;
        raw.parse::<usize>()
            .ok()
            .filter(|n| *n <= max)
            .ok_or_else(|| RecordError::InvalidNumber {
                field,
                value: raw.to_string(),
            })
    }

    /// A flag that older files may lack entirely.
    fn trailing_flag(&mut self, field: &'static str) -> Result<bool, RecordError> {
        match self.next() {
            None => Ok(false),
            Some("1") | Some("true") => Ok(true),
            Some("0") | Some("false") => Ok(false),
            Some(other) => Err(RecordError::InvalidFlag {
                field,
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_line() {
        let record = PartRecord::new(
            PartShape::Leaf(LeafParams {
                width: 4.0,
                height: 2.5,
                thickness: 0.1,
            }),
            Pose::at(1.0, -2.0, 0.5),
        );
        assert_eq!(record.to_line(), "leaf,1,-2,0.5,0,0,0,4,2.5,0.1");
    }

    #[test]
    fn test_missing_reflected_defaults_false() {
        let r = PartRecord::parse("branch,0,0,0,0,0,0,22,1,1,0.3,2,6").unwrap();
        match r.shape {
            PartShape::Branch(b) => {
                assert!(!b.reflected);
                assert_eq!(b.slot_length, 6.0);
            }
            other => panic!("expected branch, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_fields_ignored_and_true_accepted() {
        let r = PartRecord::parse("stem,0,0,0,0,0,0,4,3,0.5,1,0.4,0.3,1,true,42,x").unwrap();
        assert!(r.shape.is_reflected());
    }

    #[test]
    fn test_errors() {
        assert_eq!(PartRecord::parse("   "), Err(RecordError::Empty));
        assert_eq!(
            PartRecord::parse("twig,0,0,0,0,0,0"),
            Err(RecordError::UnknownKind { tag: "twig".into() })
        );
        assert_eq!(
            PartRecord::parse("leaf,0,0,0,0,0,0,4,2"),
            Err(RecordError::MissingField { field: "thickness" })
        );
        assert_eq!(
            PartRecord::parse("leaf,0,0,zero,0,0,0,4,2,1"),
            Err(RecordError::InvalidNumber {
                field: "z",
                value: "zero".into()
            })
        );
        assert_eq!(
            PartRecord::parse("branch,0,0,0,0,0,0,22,1,1,0.3,2,6,yes"),
            Err(RecordError::InvalidFlag {
                field: "reflected",
                value: "yes".into()
            })
        );
        assert!(matches!(
            PartRecord::parse("trunk,0,0,0,0,0,0,10,8,1,2.5,1,0.5,2,1,0.3,2"),
            Err(RecordError::InvalidNumber { field: "rib_count", .. })
        ));
    }

    #[test]
    fn test_runaway_sizes_are_rejected() {
        assert_eq!(
            PartRecord::parse("trunk,0,0,0,0,0,0,10,8,1,1000000000000,1,0.5,2,1,0.3,2"),
            Err(RecordError::InvalidNumber {
                field: "rib_count",
                value: "1000000000000".into()
            })
        );
        assert!(matches!(
            PartRecord::parse("stem,0,0,0,0,0,0,4,3,1e12,1,0.4,0.3,1"),
            Err(RecordError::InvalidNumber { field: "bend_angle", .. })
        ));
        assert!(matches!(
            PartRecord::parse("trunk,0,0,0,0,0,0,10,8,1,2,1,0.5,2,1,0.3,1e-9"),
            Err(RecordError::InvalidNumber { field: "hole_spacing", .. })
        ));
        assert!(matches!(
            PartRecord::parse("branch,0,0,0,0,0,0,22,1,1,0.3,1e-9,1e-9"),
            Err(RecordError::InvalidNumber { field: "slot_length", .. })
        ));
        assert!(PartRecord::parse("stem,0,0,0,0,0,0,4,3,-3.14,1,0.4,0.3,1").is_ok());
    }
}
