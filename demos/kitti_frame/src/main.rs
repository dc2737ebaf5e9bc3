use argh::FromArgs;
use std::path::{Path, PathBuf};

use kitti_fusion::{
    config::FusionConfig,
    image::Image,
    io::{calib, label, png, velodyne},
    k3d::{point::SensorFrame, pointcloud::ColoredPointCloud, projection::CoordinateProjector},
    markers::{BoxMarker, MarkerStyle},
    pipeline::{FrameInputs, FramePipeline, OutputPort},
    FusionError,
};

#[derive(FromArgs)]
/// Fuse one frame of the KITTI object dataset
struct Args {
    /// path to the `training` or `testing` directory of the dataset
    #[argh(option)]
    dataset_dir: PathBuf,

    /// frame id, e.g. 000008
    #[argh(option, default = "String::from(\"000000\")")]
    frame: String,

    /// directory where the rendered images are written
    #[argh(option, default = "PathBuf::from(\"output\")")]
    output_dir: PathBuf,

    /// optional segmentation mask of the left color image
    #[argh(option)]
    mask: Option<PathBuf>,

    /// optional JSON configuration of the fusion stages
    #[argh(option)]
    config: Option<PathBuf>,
}

/// Writes the rendered images as PNG files and logs the rest.
struct FileOutputPort {
    output_dir: PathBuf,
    frame: String,
}

impl FileOutputPort {
    fn write_png(&self, product: &'static str, image: &Image<u8, 3>) -> Result<(), FusionError> {
        let path = self.output_dir.join(format!("{}_{}.png", self.frame, product));
        png::write_image_png_rgb8(&path, image).map_err(|e| FusionError::PublishError {
            product,
            reason: e.to_string(),
        })?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}

impl OutputPort for FileOutputPort {
    fn publish_colored_cloud(
        &mut self,
        cloud: &ColoredPointCloud<SensorFrame>,
    ) -> Result<(), FusionError> {
        log::info!(
            "colored cloud: {} points, bounds {:?} .. {:?}",
            cloud.len(),
            cloud.min_bound().to_array(),
            cloud.max_bound().to_array()
        );
        Ok(())
    }

    fn publish_projected_image(&mut self, image: &Image<u8, 3>) -> Result<(), FusionError> {
        self.write_png("projected", image)
    }

    fn publish_birdview(&mut self, image: &Image<u8, 3>) -> Result<(), FusionError> {
        self.write_png("birdview", image)
    }

    fn publish_segmented_cloud(
        &mut self,
        cloud: &ColoredPointCloud<SensorFrame>,
    ) -> Result<(), FusionError> {
        log::info!("segmented cloud: {} points", cloud.len());
        Ok(())
    }

    fn publish_box_markers(
        &mut self,
        markers: &[BoxMarker],
        style: &MarkerStyle,
    ) -> Result<(), FusionError> {
        for marker in markers {
            log::info!(
                "{}/{}: center {:?}, yaw quaternion {:?}",
                style.namespace,
                marker.object_index,
                marker.center.to_array(),
                marker.orientation
            );
        }
        Ok(())
    }
}

fn frame_file(dataset_dir: &Path, dir: &str, frame: &str, extension: &str) -> PathBuf {
    dataset_dir.join(dir).join(format!("{frame}.{extension}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = match &args.config {
        Some(path) => FusionConfig::from_json_file(path)?,
        None => FusionConfig::default(),
    };

    let frame_path = |dir, extension| frame_file(&args.dataset_dir, dir, &args.frame, extension);

    let calib = calib::read_calibration(frame_path("calib", "txt"))?;
    let scan = velodyne::read_velodyne_bin(frame_path("velodyne", "bin"))?;
    let image = png::read_image_png_rgb8(frame_path("image_2", "png"))?;
    let mask = args.mask.as_ref().map(png::read_image_png_rgb8).transpose()?;

    // testing frames have no labels
    let label_path = frame_path("label_2", "txt");
    let labels = if label_path.exists() {
        label::read_labels(&label_path)?
    } else {
        log::warn!("no labels at {}", label_path.display());
        label::LabelFile::default()
    };

    println!(
        "Frame {}: {} points, image {}, {} labels ({} rejected)",
        args.frame,
        scan.len(),
        image.size(),
        labels.records.len(),
        labels.rejected.len()
    );

    std::fs::create_dir_all(&args.output_dir)?;
    let mut port = FileOutputPort {
        output_dir: args.output_dir.clone(),
        frame: args.frame.clone(),
    };

    let pipeline = FramePipeline::new(CoordinateProjector::from_calibration(&calib), &config);
    let outputs = pipeline.run(
        &FrameInputs {
            points: &scan.points,
            image: &image,
            mask: mask.as_ref(),
            labels: &labels.records,
        },
        &mut port,
    )?;

    println!(
        "Colored {} points, {} box markers",
        outputs.colored.len(),
        outputs.markers.len()
    );
    if let Some(segmented) = &outputs.segmented {
        println!("Segmented cloud: {} points", segmented.len());
    }

    Ok(())
}
