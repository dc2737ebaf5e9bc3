use std::time::Duration;

use kitti_fusion_3d::{
    bbox::OrientedBox,
    label::LabelRecord,
    point::{Point3, RectCameraFrame},
    transforms::{yaw_to_quaternion, Quaternion},
};

/// Presentation attributes shared by all the box markers of a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerStyle {
    /// Namespace the markers are published under.
    pub namespace: String,
    /// Width of the drawn lines in meters.
    pub line_width: f64,
    /// Line color as `[r, g, b, a]` in `[0, 1]`.
    pub color: [f32; 4],
    /// How long a viewer keeps showing a marker.
    pub lifetime: Duration,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            namespace: "GT_3DBox".to_string(),
            line_width: 0.1,
            color: [0.0, 0.0, 1.0, 1.0],
            lifetime: Duration::from_millis(20_200),
        }
    }
}

/// The visualization of one labeled object as a 3D wireframe.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxMarker {
    /// Index of the label within its frame, stable across publications of the frame.
    pub object_index: usize,
    /// The box corners.
    pub corners: OrientedBox,
    /// Orientation of the box about the camera vertical axis.
    pub orientation: Quaternion,
    /// Bottom-center of the box.
    pub center: Point3<RectCameraFrame>,
}

impl BoxMarker {
    /// Build the marker of the label at `object_index`.
    pub fn from_label(object_index: usize, label: &LabelRecord) -> Self {
        Self {
            object_index,
            corners: label.oriented_box(),
            orientation: yaw_to_quaternion(label.rotation_y),
            center: label.location,
        }
    }

    /// The closed bottom and top loops of the box.
    pub fn wireframe_loops(&self) -> [[Point3<RectCameraFrame>; 5]; 2] {
        self.corners.wireframe_loops()
    }

    /// The two loops chained into a single line strip of 10 points.
    ///
    /// A viewer drawing the strip also joins corner 0 to corner 4, the single vertical
    /// edge of the marker.
    pub fn line_strip(&self) -> Vec<Point3<RectCameraFrame>> {
        self.wireframe_loops().concat()
    }
}

/// Build one marker per label of `category`, keyed by the label index in the frame.
pub fn build_box_markers(labels: &[LabelRecord], category: &str) -> Vec<BoxMarker> {
    labels
        .iter()
        .enumerate()
        .filter(|(_, label)| label.is_category(category))
        .map(|(i, label)| BoxMarker::from_label(i, label))
        .collect()
}
