//! Input list parsing.
//!
//! A list file holds one `<identifier> <path>` record per line. Record order
//! is output order.

use std::path::{Path, PathBuf};

use crate::image_pipeline::common::error::{FeatureError, Result};

/// One line image to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub id: String,
    pub path: PathBuf,
}

/// Parses list text. Blank lines are skipped; any other line must be exactly
/// two space-separated fields.
pub fn parse_image_list(text: &str) -> Result<Vec<ImageEntry>> {
    let mut entries = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(' ').collect();
        match fields.as_slice() {
            [id, path] if !id.is_empty() && !path.is_empty() => entries.push(ImageEntry {
                id: id.to_string(),
                path: PathBuf::from(path),
            }),
            _ => {
                return Err(FeatureError::MalformedListLine {
                    line: index + 1,
                    content: line.to_string(),
                });
            }
        }
    }
    Ok(entries)
}

pub fn read_image_list<P: AsRef<Path>>(path: P) -> Result<Vec<ImageEntry>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| FeatureError::InputReadError(format!("{}: {}", path.display(), e)))?;
    parse_image_list(&text)
}

/// `<dir>/images.scp`, or `<dir>/images.<job>.scp` for a split list.
pub fn list_path(dir: &Path, job: Option<&str>) -> PathBuf {
    match job {
        Some(job) if !job.is_empty() => dir.join(format!("images.{}.scp", job)),
        _ => dir.join("images.scp"),
    }
}

/// Whether `dir` holds training data, which is the only data augmented.
pub fn is_training_dir(dir: &Path) -> bool {
    dir.to_string_lossy().contains("train")
}
