use kitti_fusion_3d::{
    filter::OutlierFilterPipeline,
    label::LabelRecord,
    point::{Point3, SensorFrame},
    pointcloud::ColoredPointCloud,
    projection::CoordinateProjector,
};
use kitti_fusion_image::{Image, ImageError};

use crate::{
    birdview::{BirdviewRasterizer, LabelStyle},
    config::FusionConfig,
    error::FusionError,
    fuser::PointCloudFuser,
    markers::{build_box_markers, BoxMarker, MarkerStyle},
};

/// Everything the pipeline consumes for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs<'a> {
    /// The sensor sweep.
    pub points: &'a [Point3<SensorFrame>],
    /// The left color image.
    pub image: &'a Image<u8, 3>,
    /// An optional segmentation of `image`, same size.
    pub mask: Option<&'a Image<u8, 3>>,
    /// The object annotations of the frame.
    pub labels: &'a [LabelRecord],
}

/// Everything the pipeline produces for one frame.
#[derive(Clone, Debug)]
pub struct FrameOutputs {
    /// The sensor points inside the camera frustum, colored by the image.
    pub colored: ColoredPointCloud<SensorFrame>,
    /// The image with the projected points burned in.
    pub projected_image: Image<u8, 3>,
    /// Top-down view of the colored cloud with the label footprints.
    pub birdview: Image<u8, 3>,
    /// The denoised cloud of the labeled mask pixels, when a mask was given.
    pub segmented: Option<ColoredPointCloud<SensorFrame>>,
    /// One wireframe per label of the configured category.
    pub markers: Vec<BoxMarker>,
}

/// A sink for the products of a frame.
///
/// Every method defaults to doing nothing so that a sink only implements the
/// products it cares about.
pub trait OutputPort {
    /// The sensor sweep as received.
    fn publish_raw_cloud(&mut self, _points: &[Point3<SensorFrame>]) -> Result<(), FusionError> {
        Ok(())
    }

    /// The camera image as received.
    fn publish_raw_image(&mut self, _image: &Image<u8, 3>) -> Result<(), FusionError> {
        Ok(())
    }

    /// The colored cloud.
    fn publish_colored_cloud(
        &mut self,
        _cloud: &ColoredPointCloud<SensorFrame>,
    ) -> Result<(), FusionError> {
        Ok(())
    }

    /// The image with the projected points.
    fn publish_projected_image(&mut self, _image: &Image<u8, 3>) -> Result<(), FusionError> {
        Ok(())
    }

    /// The birdview raster.
    fn publish_birdview(&mut self, _image: &Image<u8, 3>) -> Result<(), FusionError> {
        Ok(())
    }

    /// The denoised mask cloud.
    fn publish_segmented_cloud(
        &mut self,
        _cloud: &ColoredPointCloud<SensorFrame>,
    ) -> Result<(), FusionError> {
        Ok(())
    }

    /// The label wireframes.
    fn publish_box_markers(
        &mut self,
        _markers: &[BoxMarker],
        _style: &MarkerStyle,
    ) -> Result<(), FusionError> {
        Ok(())
    }
}

/// Runs the fusion stages of a frame in their fixed order.
///
/// projection, colorization, mask colorization and denoising, birdview, markers.
#[derive(Clone, Debug)]
pub struct FramePipeline {
    projector: CoordinateProjector,
    fuser: PointCloudFuser,
    filter: OutlierFilterPipeline,
    rasterizer: BirdviewRasterizer,
    label_style: LabelStyle,
    marker_style: MarkerStyle,
}

impl FramePipeline {
    /// Create a pipeline for a calibrated camera.
    pub fn new(projector: CoordinateProjector, config: &FusionConfig) -> Self {
        Self {
            projector,
            fuser: PointCloudFuser::new(config.mask_params()),
            filter: config.outlier_filter(),
            rasterizer: config.rasterizer(),
            label_style: config.label_style(),
            marker_style: config.marker_style(),
        }
    }

    /// The projector in use.
    pub fn projector(&self) -> &CoordinateProjector {
        &self.projector
    }

    /// Run every stage over a frame.
    pub fn process(&self, inputs: &FrameInputs) -> Result<FrameOutputs, FusionError> {
        let projected = self.projector.project(inputs.points);

        let colored = self.fuser.colorize(inputs.points, &projected, inputs.image)?;
        let projected_image =
            self.fuser
                .render_projected_overlay(inputs.image, inputs.points, &projected)?;

        let segmented = match inputs.mask {
            Some(mask) => {
                if mask.size() != inputs.image.size() {
                    return Err(ImageError::SizeMismatch(mask.size(), inputs.image.size()).into());
                }
                let masked = self
                    .fuser
                    .colorize_from_mask(inputs.points, &projected, mask)?;
                Some(self.filter.denoise(&masked))
            }
            None => None,
        };

        // the birdview is drawn in the rectified frame, shared with the labels
        let rect_cloud = colored.transform(self.projector.sensor_to_rect());
        let mut birdview = self.rasterizer.rasterize(&rect_cloud);
        self.rasterizer
            .draw_labels(&mut birdview, inputs.labels, &self.label_style);

        let markers = build_box_markers(inputs.labels, &self.label_style.category);

        log::debug!(
            "frame: {} points, {} colored, {} segmented, {} markers",
            inputs.points.len(),
            colored.len(),
            segmented.as_ref().map_or(0, |s| s.len()),
            markers.len()
        );

        Ok(FrameOutputs {
            colored,
            projected_image,
            birdview,
            segmented,
            markers,
        })
    }

    /// Process a frame and hand every product to `port`.
    pub fn run(
        &self,
        inputs: &FrameInputs,
        port: &mut impl OutputPort,
    ) -> Result<FrameOutputs, FusionError> {
        let outputs = self.process(inputs)?;

        port.publish_raw_cloud(inputs.points)?;
        port.publish_raw_image(inputs.image)?;
        port.publish_colored_cloud(&outputs.colored)?;
        port.publish_projected_image(&outputs.projected_image)?;
        port.publish_birdview(&outputs.birdview)?;
        if let Some(segmented) = &outputs.segmented {
            port.publish_segmented_cloud(segmented)?;
        }
        port.publish_box_markers(&outputs.markers, &self.marker_style)?;

        Ok(outputs)
    }
}
