use std::{collections::HashMap, path::Path};

use kitti_fusion_3d::{
    calibration::KittiCalibration,
    linalg::{ProjectionMatrix, RigidTransform},
};

use crate::error::IoError;

/// Split the file into `key: values` entries, ignoring blank lines.
fn parse_entries(text: &str) -> Result<HashMap<String, Vec<f64>>, IoError> {
    let mut entries = HashMap::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let Some((key, values)) = line.split_once(':') else {
            return Err(IoError::MalformedCalibration {
                key: line.trim().to_string(),
                reason: "missing `:` separator".to_string(),
            });
        };
        let key = key.trim().to_string();
        let values = values
            .split_whitespace()
            .map(|v| v.parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| IoError::MalformedCalibration {
                key: key.clone(),
                reason: e.to_string(),
            })?;
        entries.insert(key, values);
    }
    Ok(entries)
}

fn take<const N: usize>(
    entries: &HashMap<String, Vec<f64>>,
    key: &'static str,
) -> Result<[f64; N], IoError> {
    let values = entries.get(key).ok_or(IoError::MissingCalibrationKey(key))?;
    values
        .as_slice()
        .try_into()
        .map_err(|_| IoError::MalformedCalibration {
            key: key.to_string(),
            reason: format!("expected {} values, got {}", N, values.len()),
        })
}

fn rows_3x4(v: [f64; 12]) -> [[f64; 4]; 3] {
    [
        [v[0], v[1], v[2], v[3]],
        [v[4], v[5], v[6], v[7]],
        [v[8], v[9], v[10], v[11]],
    ]
}

/// Parse the content of a KITTI object calibration file.
///
/// # Arguments
///
/// * `text` - Lines of `key: v0 v1 ...` with the keys `P0`..`P3`, `R0_rect`,
///   `Tr_velo_to_cam` and `Tr_imu_to_velo`. Matrices are row-major.
///
/// # Returns
///
/// The calibration, or an error naming the first missing or malformed entry.
pub fn parse_calibration(text: &str) -> Result<KittiCalibration, IoError> {
    let entries = parse_entries(text)?;

    let projections = [
        ProjectionMatrix::from_rows(rows_3x4(take(&entries, "P0")?)),
        ProjectionMatrix::from_rows(rows_3x4(take(&entries, "P1")?)),
        ProjectionMatrix::from_rows(rows_3x4(take(&entries, "P2")?)),
        ProjectionMatrix::from_rows(rows_3x4(take(&entries, "P3")?)),
    ];

    let r = take::<9>(&entries, "R0_rect")?;
    let r0_rect = RigidTransform::from_rotation([
        [r[0], r[1], r[2]],
        [r[3], r[4], r[5]],
        [r[6], r[7], r[8]],
    ]);

    let tr_velo_to_cam = take(&entries, "Tr_velo_to_cam")?;
    let tr_imu_to_velo = take(&entries, "Tr_imu_to_velo")?;

    Ok(KittiCalibration {
        projections,
        r0_rect,
        tr_velo_to_cam: RigidTransform::from_rows_3x4(rows_3x4(tr_velo_to_cam)),
        tr_imu_to_velo: RigidTransform::from_rows_3x4(rows_3x4(tr_imu_to_velo)),
    })
}

/// Read a KITTI object calibration file.
///
/// # Arguments
///
/// * `path` - The path to the `calib/XXXXXX.txt` file.
pub fn read_calibration(path: impl AsRef<Path>) -> Result<KittiCalibration, IoError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::FileDoesNotExist(path.to_path_buf()));
    }
    parse_calibration(&std::fs::read_to_string(path)?)
}
