use std::path::Path;

use kitti_fusion_3d::label::{LabelError, LabelRecord};

use crate::error::IoError;

/// A label line that could not be parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedLine {
    /// One-based line number in the file.
    pub line_number: usize,
    /// Why the line was rejected.
    pub error: LabelError,
}

/// The parsed content of a label file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelFile {
    /// The records in file order.
    pub records: Vec<LabelRecord>,
    /// The lines that failed to parse.
    pub rejected: Vec<RejectedLine>,
}

impl LabelFile {
    /// Iterate over the records of a given category.
    pub fn of_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a LabelRecord> + 'a {
        self.records.iter().filter(move |r| r.is_category(category))
    }
}

/// Parse the content of a label file.
///
/// Blank lines are skipped. A malformed line does not fail the file: it is logged and
/// reported in [`LabelFile::rejected`] while the other lines are still parsed.
pub fn parse_labels(text: &str) -> LabelFile {
    let mut labels = LabelFile::default();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<LabelRecord>() {
            Ok(record) => labels.records.push(record),
            Err(error) => {
                log::warn!("skipping label line {}: {}", i + 1, error);
                labels.rejected.push(RejectedLine {
                    line_number: i + 1,
                    error,
                });
            }
        }
    }
    labels
}

/// Read a KITTI label file.
///
/// # Arguments
///
/// * `path` - The path to the `label_2/XXXXXX.txt` file.
///
/// # Returns
///
/// The parsed records and the rejected lines.
pub fn read_labels(path: impl AsRef<Path>) -> Result<LabelFile, IoError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::FileDoesNotExist(path.to_path_buf()));
    }

    let labels = parse_labels(&std::fs::read_to_string(path)?);
    log::debug!(
        "read {} labels ({} rejected) from {}",
        labels.records.len(),
        labels.rejected.len(),
        path.display()
    );

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: &str = "\
Car 0.00 0 -1.58 587.01 173.33 614.12 200.12 1.65 1.67 3.64 -0.65 1.71 46.70 -1.59
Pedestrian 0.00 0 0.21 423.17 173.67 433.17 224.03 1.60 0.38 0.30 -5.87 1.63 23.11 -0.03

Car 0.00 0 1.71
DontCare -1 -1 -10 537.37 160.63 552.36 170.20 -1 -1 -1 -1000 -1000 -1000 -10
Car 0.00 1 -1.88 415.07 178.53 483.92 210.73 1.54 1.68 4.03 -7.34 1.91 34.87 -2.08 0.71
";

    #[test]
    fn test_parse_labels_keeps_good_lines() {
        let labels = parse_labels(LABELS);
        assert_eq!(labels.records.len(), 4);
        assert_eq!(labels.records[0].object_type, "Car");
        assert_eq!(labels.records[1].object_type, "Pedestrian");
        assert!(labels.records[2].is_dont_care());
        assert_eq!(labels.records[3].score, Some(0.71));
        assert_eq!(labels.of_category("Car").count(), 2);

        // only the short line is rejected
        assert_eq!(labels.rejected.len(), 1);
        assert_eq!(labels.rejected[0].line_number, 4);
        assert_eq!(labels.rejected[0].error, LabelError::InvalidFieldCount(4));
    }

    #[test]
    fn test_parse_labels_rejects_non_finite_and_negative_extents() {
        let labels = parse_labels(
            "Car 0.00 0 0.0 0 0 0 0 1.5 1.6 3.5 0.0 0.0 inf 0.0
Van 0.00 0 0.0 0 0 0 0 -1.5 1.6 3.5 0.0 0.0 10.0 0.0
Car 0.00 0 0.0 0 0 0 0 1.5 1.6 3.5 0.0 0.0 10.0 0.0
",
        );
        assert_eq!(labels.records.len(), 1);
        assert_eq!(
            labels.rejected,
            vec![
                RejectedLine {
                    line_number: 1,
                    error: LabelError::NonFiniteField {
                        field: "location_z"
                    },
                },
                RejectedLine {
                    line_number: 2,
                    error: LabelError::InvalidDimensions(-1.5, 1.6, 3.5),
                },
            ]
        );
    }

    #[test]
    fn test_parse_labels_empty() {
        assert_eq!(parse_labels(""), LabelFile::default());
    }

    #[test]
    fn test_read_labels() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("000000.txt");
        std::fs::write(&file_path, LABELS)?;

        let labels = read_labels(&file_path)?;
        assert_eq!(labels, parse_labels(LABELS));
        assert!(matches!(
            read_labels(tmp_dir.path().join("nope.txt")),
            Err(IoError::FileDoesNotExist(_))
        ));
        Ok(())
    }
}
