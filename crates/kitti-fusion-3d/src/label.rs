use std::str::FromStr;

use crate::{
    bbox::{build_corners, BoxDimensions, OrientedBox},
    point::{Point3, RectCameraFrame},
};

/// Number of fields of a ground-truth label line.
pub const LABEL_FIELDS: usize = 15;

/// Number of fields of a detection result line, which appends a score.
pub const LABEL_FIELDS_WITH_SCORE: usize = 16;

/// Category of the image regions left unannotated, whose 3D fields hold `-1` sentinels.
pub const DONT_CARE: &str = "DontCare";

/// Error types for label parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LabelError {
    /// The line does not have 15 or 16 whitespace separated fields.
    #[error("Invalid number of fields: {0}, expected 15 or 16")]
    InvalidFieldCount(usize),

    /// A field could not be parsed.
    #[error("Failed to parse field `{field}` from `{value}`")]
    InvalidField {
        /// Name of the field.
        field: &'static str,
        /// The raw text of the field.
        value: String,
    },

    /// A numeric field is NaN or infinite.
    #[error("Field `{field}` is not a finite number")]
    NonFiniteField {
        /// Name of the field.
        field: &'static str,
    },

    /// A box dimension is negative on a record other than [`DONT_CARE`].
    #[error("Invalid box dimensions h={0} w={1} l={2}")]
    InvalidDimensions(f64, f64, f64),
}

/// An axis aligned box in image pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox2D {
    /// Top-left x.
    pub tlx: f64,
    /// Top-left y.
    pub tly: f64,
    /// Bottom-right x.
    pub brx: f64,
    /// Bottom-right y.
    pub bry: f64,
}

/// A single ground-truth object annotation of a KITTI frame.
///
/// Label lines carry, in order:
/// `type truncated occluded alpha bbox(4) h w l x y z rotation_y [score]`.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelRecord {
    /// Category name, e.g. `Car` or `Pedestrian`.
    pub object_type: String,
    /// Truncation ratio in `[0, 1]`.
    pub truncated: f64,
    /// Occlusion level.
    pub occluded: i32,
    /// Observation angle in radians.
    pub alpha: f64,
    /// 2D box in the left color image.
    pub bbox: BoundingBox2D,
    /// 3D box extents in meters.
    pub dimensions: BoxDimensions,
    /// Bottom-center of the 3D box in the rectified camera frame.
    pub location: Point3<RectCameraFrame>,
    /// Rotation about the camera vertical axis in radians.
    pub rotation_y: f64,
    /// Detection confidence, only present in result files.
    pub score: Option<f64>,
}

impl LabelRecord {
    /// Check whether the record belongs to `category`.
    pub fn is_category(&self, category: &str) -> bool {
        self.object_type == category
    }

    /// Check whether the record only marks an unannotated region.
    pub fn is_dont_care(&self) -> bool {
        self.is_category(DONT_CARE)
    }

    /// The 8 corners of the record's 3D box.
    pub fn oriented_box(&self) -> OrientedBox {
        build_corners(&self.dimensions, &self.location, self.rotation_y)
    }
}

fn parse_part<T: FromStr>(
    parts: &[&str],
    index: usize,
    field: &'static str,
) -> Result<T, LabelError> {
    // the field count is checked before any field is read
    let value = parts[index];
    value.parse::<T>().map_err(|_| LabelError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn parse_float(parts: &[&str], index: usize, field: &'static str) -> Result<f64, LabelError> {
    let value: f64 = parse_part(parts, index, field)?;
    if !value.is_finite() {
        return Err(LabelError::NonFiniteField { field });
    }
    Ok(value)
}

impl FromStr for LabelRecord {
    type Err = LabelError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts = line.split_whitespace().collect::<Vec<_>>();

        if parts.len() != LABEL_FIELDS && parts.len() != LABEL_FIELDS_WITH_SCORE {
            return Err(LabelError::InvalidFieldCount(parts.len()));
        }

        let object_type = parts[0];
        let dimensions = BoxDimensions {
            h: parse_float(&parts, 8, "height")?,
            w: parse_float(&parts, 9, "width")?,
            l: parse_float(&parts, 10, "length")?,
        };
        let negative = dimensions.h < 0.0 || dimensions.w < 0.0 || dimensions.l < 0.0;
        // DontCare rows carry -1 extents
        if negative && object_type != DONT_CARE {
            return Err(LabelError::InvalidDimensions(
                dimensions.h,
                dimensions.w,
                dimensions.l,
            ));
        }

        let score = if parts.len() == LABEL_FIELDS_WITH_SCORE {
            Some(parse_float(&parts, 15, "score")?)
        } else {
            None
        };

        Ok(Self {
            object_type: object_type.to_string(),
            truncated: parse_float(&parts, 1, "truncated")?,
            occluded: parse_part(&parts, 2, "occluded")?,
            alpha: parse_float(&parts, 3, "alpha")?,
            bbox: BoundingBox2D {
                tlx: parse_float(&parts, 4, "bbox_left")?,
                tly: parse_float(&parts, 5, "bbox_top")?,
                brx: parse_float(&parts, 6, "bbox_right")?,
                bry: parse_float(&parts, 7, "bbox_bottom")?,
            },
            dimensions,
            location: Point3::new(
                parse_float(&parts, 11, "location_x")?,
                parse_float(&parts, 12, "location_y")?,
                parse_float(&parts, 13, "location_z")?,
            ),
            rotation_y: parse_float(&parts, 14, "rotation_y")?,
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CAR_LINE: &str =
        "Car 0.00 0 -1.58 587.01 173.33 614.12 200.12 1.65 1.67 3.64 -0.65 1.71 46.70 -1.59";

    #[test]
    fn test_parse_ground_truth_line() -> Result<(), LabelError> {
        let record: LabelRecord = CAR_LINE.parse()?;
        assert_eq!(record.object_type, "Car");
        assert!(record.is_category("Car"));
        assert!(!record.is_category("Van"));
        assert_eq!(record.occluded, 0);
        assert_relative_eq!(record.alpha, -1.58);
        assert_relative_eq!(record.bbox.brx, 614.12);
        assert_relative_eq!(record.dimensions.h, 1.65);
        assert_relative_eq!(record.dimensions.w, 1.67);
        assert_relative_eq!(record.dimensions.l, 3.64);
        assert_relative_eq!(record.location.z, 46.70);
        assert_relative_eq!(record.rotation_y, -1.59);
        assert_eq!(record.score, None);
        Ok(())
    }

    #[test]
    fn test_parse_result_line_with_score() -> Result<(), LabelError> {
        let line = format!("{CAR_LINE} 0.93");
        let record: LabelRecord = line.parse()?;
        assert_eq!(record.score, Some(0.93));
        Ok(())
    }

    #[test]
    fn test_parse_rejects_short_line() {
        let line = "Car 0.00 0 -1.58 587.01 173.33";
        assert_eq!(
            line.parse::<LabelRecord>(),
            Err(LabelError::InvalidFieldCount(6))
        );
        assert_eq!("".parse::<LabelRecord>(), Err(LabelError::InvalidFieldCount(0)));
    }

    #[test]
    fn test_parse_rejects_garbled_field() {
        let line = CAR_LINE.replace("46.70", "far");
        assert_eq!(
            line.parse::<LabelRecord>(),
            Err(LabelError::InvalidField {
                field: "location_z",
                value: "far".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_rejects_negative_dimensions() {
        let line = CAR_LINE.replace("1.65 1.67", "-1.65 1.67");
        assert!(matches!(
            line.parse::<LabelRecord>(),
            Err(LabelError::InvalidDimensions(..))
        ));
    }

    #[test]
    fn test_parse_rejects_non_finite_fields() {
        let line = CAR_LINE.replace("46.70", "-inf");
        assert_eq!(
            line.parse::<LabelRecord>(),
            Err(LabelError::NonFiniteField {
                field: "location_z"
            })
        );

        let line = CAR_LINE.replace("1.65 1.67", "nan 1.67");
        assert_eq!(
            line.parse::<LabelRecord>(),
            Err(LabelError::NonFiniteField { field: "height" })
        );

        let line = format!("{CAR_LINE} inf");
        assert_eq!(
            line.parse::<LabelRecord>(),
            Err(LabelError::NonFiniteField { field: "score" })
        );
    }

    #[test]
    fn test_parse_dont_care_sentinels() -> Result<(), LabelError> {
        let record: LabelRecord =
            "DontCare -1 -1 -10 503.89 169.71 590.61 190.13 -1 -1 -1 -1000 -1000 -1000 -10"
                .parse()?;
        assert!(record.is_dont_care());
        assert!(!record.is_category("Car"));
        assert_eq!(record.occluded, -1);
        assert_relative_eq!(record.dimensions.h, -1.0);
        assert_relative_eq!(record.location.z, -1000.0);
        Ok(())
    }

    #[test]
    fn test_oriented_box_uses_location_and_yaw() -> Result<(), LabelError> {
        let record: LabelRecord =
            "Car 0 0 0 0 0 0 0 1.5 1.6 3.5 0.0 0.0 10.0 0.0".parse()?;
        let obb = record.oriented_box();
        assert_relative_eq!(obb.corners[0].x, 0.8);
        assert_relative_eq!(obb.corners[0].z, 11.75);
        assert_relative_eq!(obb.corners[4].y, -1.5);
        Ok(())
    }
}
