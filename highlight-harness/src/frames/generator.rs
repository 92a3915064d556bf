//! Exhaustive frame generation over the partition model

use super::RawFrame;
use crate::partition::{partitions, Category, Dimension, FileContent, FileExistence};

/// Generate every legal combination of the partition model.
///
/// Partitions are iterated in declaration order with the last one varying
/// fastest, so the sequence is identical across runs. Combinations where the
/// file is missing but the content is not empty are dropped.
pub fn generate_exhaustive() -> Vec<RawFrame> {
    let partitions = partitions();
    let mut frames = Vec::new();
    let mut cursor = vec![0usize; partitions.len()];

    if partitions.iter().any(|p| p.categories.is_empty()) {
        return frames;
    }

    loop {
        let frame: RawFrame = partitions
            .iter()
            .zip(&cursor)
            .map(|(p, &i)| (p.dimension.key().to_string(), p.categories[i].to_string()))
            .collect();

        if is_legal(&frame) {
            frames.push(frame);
        }

        // Advance the odometer, rightmost dimension first
        let mut pos = partitions.len();
        loop {
            if pos == 0 {
                tracing::debug!("Generated {} exhaustive frames", frames.len());
                return frames;
            }
            pos -= 1;
            cursor[pos] += 1;
            if cursor[pos] < partitions[pos].categories.len() {
                break;
            }
            cursor[pos] = 0;
        }
    }
}

/// The single cross-partition constraint: missing file implies empty content
fn is_legal(frame: &RawFrame) -> bool {
    let existence = frame.get(Dimension::FileExistence.key()).map(String::as_str);
    let content = frame.get(Dimension::FileContent.key()).map(String::as_str);
    existence != Some(FileExistence::Missing.as_str()) || content == Some(FileContent::Empty.as_str())
}
