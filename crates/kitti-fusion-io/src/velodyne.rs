use std::path::Path;

use kitti_fusion_3d::point::{Point3, SensorFrame};

use crate::error::IoError;

/// Size in bytes of a single `x y z reflectance` record.
pub const VELODYNE_RECORD_SIZE: usize = 16;

/// A single velodyne sweep.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VelodyneScan {
    /// The points in the sensor frame.
    pub points: Vec<Point3<SensorFrame>>,
    /// The reflectance of each point.
    pub reflectance: Vec<f32>,
}

impl VelodyneScan {
    /// Get the number of points in the scan.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the scan is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Read a little-endian f32 from a record
#[inline]
fn read_f32(record: &[u8], offset: usize) -> f32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&record[offset..offset + 4]);
    f32::from_le_bytes(bytes)
}

/// Decode a velodyne sweep from raw bytes.
///
/// # Arguments
///
/// * `bytes` - Packed little-endian `f32` records of `x y z reflectance`.
///
/// # Returns
///
/// The decoded scan, or an error if the buffer is not made of whole records.
pub fn decode_velodyne(bytes: &[u8]) -> Result<VelodyneScan, IoError> {
    if bytes.len() % VELODYNE_RECORD_SIZE != 0 {
        return Err(IoError::InvalidVelodyneLength(bytes.len()));
    }

    let num_points = bytes.len() / VELODYNE_RECORD_SIZE;
    let mut scan = VelodyneScan {
        points: Vec::with_capacity(num_points),
        reflectance: Vec::with_capacity(num_points),
    };

    for record in bytes.chunks_exact(VELODYNE_RECORD_SIZE) {
        scan.points.push(Point3::new(
            read_f32(record, 0) as f64,
            read_f32(record, 4) as f64,
            read_f32(record, 8) as f64,
        ));
        scan.reflectance.push(read_f32(record, 12));
    }

    Ok(scan)
}

/// Read a velodyne sweep from a `.bin` file.
///
/// # Arguments
///
/// * `path` - The path to the `.bin` file.
pub fn read_velodyne_bin(path: impl AsRef<Path>) -> Result<VelodyneScan, IoError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::FileDoesNotExist(path.to_path_buf()));
    }

    match path.extension() {
        Some(extension) if extension == "bin" => {}
        _ => return Err(IoError::InvalidFileExtension(path.to_path_buf())),
    }

    let bytes = std::fs::read(path)?;
    let scan = decode_velodyne(&bytes)?;
    log::debug!("read {} velodyne points from {}", scan.len(), path.display());

    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn encode(records: &[[f32; 4]]) -> Vec<u8> {
        records
            .iter()
            .flat_map(|r| r.iter().flat_map(|v| v.to_le_bytes()))
            .collect()
    }

    #[test]
    fn test_decode_velodyne() -> Result<(), IoError> {
        let bytes = encode(&[[1.5, -2.0, 0.25, 0.9], [10.0, 0.0, -1.75, 0.1]]);
        let scan = decode_velodyne(&bytes)?;
        assert_eq!(scan.len(), 2);
        assert_eq!(scan.points[0].to_array(), [1.5, -2.0, 0.25]);
        assert_eq!(scan.points[1].to_array(), [10.0, 0.0, -1.75]);
        assert_eq!(scan.reflectance, vec![0.9, 0.1]);
        Ok(())
    }

    #[test]
    fn test_decode_rejects_partial_record() {
        let mut bytes = encode(&[[1.0, 2.0, 3.0, 4.0]]);
        bytes.pop();
        assert!(matches!(
            decode_velodyne(&bytes),
            Err(IoError::InvalidVelodyneLength(15))
        ));
        assert!(decode_velodyne(&[]).is_ok_and(|scan| scan.is_empty()));
    }

    #[test]
    fn test_read_velodyne_bin() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("000000.bin");
        let mut file = std::fs::File::create(&file_path)?;
        file.write_all(&encode(&[[3.0, 4.0, 0.0, 0.5]]))?;
        drop(file);

        let scan = read_velodyne_bin(&file_path)?;
        assert_eq!(scan.len(), 1);
        assert_eq!(scan.points[0].norm(), 5.0);

        assert!(matches!(
            read_velodyne_bin(tmp_dir.path().join("missing.bin")),
            Err(IoError::FileDoesNotExist(_))
        ));
        Ok(())
    }
}
