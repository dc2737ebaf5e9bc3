use kitti_fusion_3d::{
    label::LabelRecord,
    point::{Point3, RectCameraFrame},
    pointcloud::ColoredPointCloud,
};
use kitti_fusion_image::{Image, ImageSize};
use kitti_fusion_imgproc::draw::{draw_circle, draw_polygon};

/// How labels are drawn over a birdview canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelStyle {
    /// Only labels of this category are drawn.
    pub category: String,
    /// Outline color.
    pub color: [u8; 3],
    /// Radius of the circle marking the label center.
    pub center_radius: u32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            category: "Car".to_string(),
            color: [255, 0, 0],
            center_radius: 4,
        }
    }
}

/// Renders a top-down view of the `x` (lateral) and `z` (forward) camera axes.
///
/// The window `-x_half_range < x < x_half_range`, `z < z_max` is mapped onto a square
/// white canvas at `scale` pixels per meter, with the camera at the bottom center and
/// forward pointing up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BirdviewRasterizer {
    /// Side of the square canvas in pixels.
    pub canvas_size: usize,
    /// Pixels per meter.
    pub scale: f64,
    /// Forward range of the window in meters.
    pub z_max: f64,
    /// Half the lateral extent of the window in meters.
    pub x_half_range: f64,
}

impl Default for BirdviewRasterizer {
    fn default() -> Self {
        Self {
            canvas_size: 1200,
            scale: 20.0,
            z_max: 60.0,
            x_half_range: 30.0,
        }
    }
}

impl BirdviewRasterizer {
    /// Map a ground-plane coordinate to a canvas pixel `(px, py)`, truncating toward zero.
    ///
    /// Example:
    ///
    /// ```
    /// use kitti_fusion::birdview::BirdviewRasterizer;
    ///
    /// let rasterizer = BirdviewRasterizer::default();
    /// assert_eq!(rasterizer.to_canvas(0.0, 0.0), (600, 1200));
    /// assert_eq!(rasterizer.to_canvas(-29.99, 59.99), (0, 0));
    /// ```
    pub fn to_canvas(&self, x: f64, z: f64) -> (i64, i64) {
        let px = (x + self.x_half_range) * self.scale;
        let py = -(z - self.z_max) * self.scale;
        (px as i64, py as i64)
    }

    /// Check whether a pixel lies strictly inside the canvas.
    ///
    /// Row and column zero are treated as outside.
    pub fn is_inside(&self, (px, py): (i64, i64)) -> bool {
        let size = self.canvas_size as i64;
        px > 0 && px < size && py > 0 && py < size
    }

    /// A blank white canvas.
    pub fn blank_canvas(&self) -> Image<u8, 3> {
        Image::from_size_val(
            ImageSize {
                width: self.canvas_size,
                height: self.canvas_size,
            },
            255,
        )
    }

    /// Render a colored cloud into a new canvas.
    ///
    /// Points outside the window or off the canvas are skipped; when several points map
    /// to the same pixel the last one wins.
    pub fn rasterize(&self, cloud: &ColoredPointCloud<RectCameraFrame>) -> Image<u8, 3> {
        let mut canvas = self.blank_canvas();
        let mut drawn = 0usize;
        for p in cloud.iter() {
            let Point3 { x, z, .. } = p.point;
            if !(z < self.z_max && x > -self.x_half_range && x < self.x_half_range) {
                continue;
            }
            let (px, py) = self.to_canvas(x, z);
            if self.is_inside((px, py)) {
                let start = (py as usize * self.canvas_size + px as usize) * 3;
                canvas.as_slice_mut()[start..start + 3].copy_from_slice(&p.color);
                drawn += 1;
            }
        }

        log::debug!("birdview: drew {} of {} points", drawn, cloud.len());

        canvas
    }

    /// Draw the footprint of every label of `style.category` onto `canvas`.
    ///
    /// Each footprint is the closed bottom face of the label box plus a circle at the
    /// label location. The top face is not drawn.
    pub fn draw_labels(
        &self,
        canvas: &mut Image<u8, 3>,
        labels: &[LabelRecord],
        style: &LabelStyle,
    ) {
        for label in labels.iter().filter(|l| l.is_category(&style.category)) {
            let footprint = label
                .oriented_box()
                .bottom_face()
                .map(|c| self.to_canvas(c.x, c.z));
            draw_polygon(canvas, &footprint, style.color, 1);

            let center = self.to_canvas(label.location.x, label.location.z);
            draw_circle(canvas, center, style.center_radius, style.color);
        }
    }
}
