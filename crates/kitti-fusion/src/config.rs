use std::path::Path;

use kitti_fusion_3d::filter::{
    OutlierFilterPipeline, RadiusOutlierRemoval, StatisticalOutlierRemoval,
};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    birdview::{BirdviewRasterizer, LabelStyle},
    fuser::MaskParams,
    markers::MarkerStyle,
};

/// An error type for loading a configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Error reading the file.
    #[error("Failed to read the configuration. {0}")]
    FileError(#[from] std::io::Error),

    /// Error decoding the JSON document.
    #[error("Failed to parse the configuration. {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Statistical outlier removal settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticalConfig {
    /// Number of neighbors used for the mean distance.
    pub mean_k: usize,
    /// Standard deviation multiplier.
    pub std_mul: f64,
}

impl Default for StatisticalConfig {
    fn default() -> Self {
        let defaults = StatisticalOutlierRemoval::default();
        Self {
            mean_k: defaults.mean_k,
            std_mul: defaults.std_mul,
        }
    }
}

/// Radius outlier removal settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiusConfig {
    /// Neighborhood radius in meters.
    pub radius: f64,
    /// Minimum number of other points in the neighborhood.
    pub min_neighbors: usize,
}

impl Default for RadiusConfig {
    fn default() -> Self {
        let defaults = RadiusOutlierRemoval::default();
        Self {
            radius: defaults.radius,
            min_neighbors: defaults.min_neighbors,
        }
    }
}

/// Segmentation mask settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Points must have a rectified height coordinate below this value.
    pub height_ceiling: f64,
    /// Mask color of unlabeled pixels.
    pub background: [u8; 3],
}

impl Default for MaskConfig {
    fn default() -> Self {
        let defaults = MaskParams::default();
        Self {
            height_ceiling: defaults.height_ceiling,
            background: defaults.background,
        }
    }
}

/// Birdview canvas settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdviewConfig {
    /// Side of the canvas in pixels.
    pub canvas_size: usize,
    /// Pixels per meter.
    pub scale: f64,
    /// Forward range in meters.
    pub z_max: f64,
    /// Half lateral range in meters.
    pub x_half_range: f64,
}

impl Default for BirdviewConfig {
    fn default() -> Self {
        let defaults = BirdviewRasterizer::default();
        Self {
            canvas_size: defaults.canvas_size,
            scale: defaults.scale,
            z_max: defaults.z_max,
            x_half_range: defaults.x_half_range,
        }
    }
}

/// Label overlay and marker settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    /// Category of the labels to draw and publish.
    pub category: String,
    /// Birdview outline color.
    pub color: [u8; 3],
    /// Radius of the birdview center circle.
    pub center_radius: u32,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        let defaults = LabelStyle::default();
        Self {
            category: defaults.category,
            color: defaults.color,
            center_radius: defaults.center_radius,
        }
    }
}

/// Box marker presentation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkersConfig {
    /// Namespace the markers are published under.
    pub namespace: String,
    /// Line width in meters.
    pub line_width: f64,
    /// Line color as `[r, g, b, a]` in `[0, 1]`.
    pub color: [f32; 4],
    /// Marker lifetime in milliseconds.
    pub lifetime_ms: u64,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        let defaults = MarkerStyle::default();
        Self {
            namespace: defaults.namespace,
            line_width: defaults.line_width,
            color: defaults.color,
            lifetime_ms: defaults.lifetime.as_millis() as u64,
        }
    }
}

/// Settings of every fusion stage. Missing fields take their default value.
///
/// Example:
///
/// ```
/// use kitti_fusion::config::FusionConfig;
///
/// let config = FusionConfig::from_json_str(r#"{ "radius": { "radius": 0.5 } }"#).unwrap();
/// assert_eq!(config.radius.radius, 0.5);
/// assert_eq!(config.radius.min_neighbors, 4);
/// assert_eq!(config.birdview.canvas_size, 1200);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// First denoising stage.
    pub statistical: StatisticalConfig,
    /// Second denoising stage.
    pub radius: RadiusConfig,
    /// Mask colorization.
    pub mask: MaskConfig,
    /// Birdview rendering.
    pub birdview: BirdviewConfig,
    /// Label rendering.
    pub labels: LabelsConfig,
    /// Box markers.
    pub markers: MarkersConfig,
}

impl FusionConfig {
    /// Parse a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// The two-stage outlier filter.
    pub fn outlier_filter(&self) -> OutlierFilterPipeline {
        OutlierFilterPipeline::new(
            StatisticalOutlierRemoval {
                mean_k: self.statistical.mean_k,
                std_mul: self.statistical.std_mul,
            },
            RadiusOutlierRemoval {
                radius: self.radius.radius,
                min_neighbors: self.radius.min_neighbors,
            },
        )
    }

    /// The mask colorization rules.
    pub fn mask_params(&self) -> MaskParams {
        MaskParams {
            height_ceiling: self.mask.height_ceiling,
            background: self.mask.background,
        }
    }

    /// The birdview rasterizer.
    pub fn rasterizer(&self) -> BirdviewRasterizer {
        BirdviewRasterizer {
            canvas_size: self.birdview.canvas_size,
            scale: self.birdview.scale,
            z_max: self.birdview.z_max,
            x_half_range: self.birdview.x_half_range,
        }
    }

    /// The birdview label style.
    pub fn label_style(&self) -> LabelStyle {
        LabelStyle {
            category: self.labels.category.clone(),
            color: self.labels.color,
            center_radius: self.labels.center_radius,
        }
    }

    /// The box marker style.
    pub fn marker_style(&self) -> MarkerStyle {
        MarkerStyle {
            namespace: self.markers.namespace.clone(),
            line_width: self.markers.line_width,
            color: self.markers.color,
            lifetime: Duration::from_millis(self.markers.lifetime_ms),
        }
    }
}
