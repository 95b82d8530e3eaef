//! Chunk window layout over the source timeline

use crate::domain::errors::DomainError;

/// Windows shorter than this are float residue, not content
const MIN_WINDOW_SEC: f64 = 1e-6;

/// One time range to extract
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkWindow {
    pub index: usize,
    pub start_sec: f64,
    pub duration_sec: f64,
}

impl ChunkWindow {
    pub fn end_sec(&self) -> f64 {
        self.start_sec + self.duration_sec
    }
}

/// Lay out `ceil(total / max)` contiguous windows starting at `i * max`,
/// the last one clipped to `total`.
pub fn chunk_windows(
    max_duration_sec: f64,
    total_duration_sec: f64,
) -> Result<Vec<ChunkWindow>, DomainError> {
    if !(max_duration_sec > 0.0) || !max_duration_sec.is_finite() {
        return Err(DomainError::Input(format!(
            "Chunk duration must be positive, got {}",
            max_duration_sec
        )));
    }
    if !(total_duration_sec > 0.0) || !total_duration_sec.is_finite() {
        return Err(DomainError::Input(format!(
            "Source duration must be positive, got {}",
            total_duration_sec
        )));
    }

    let count = (total_duration_sec / max_duration_sec).ceil() as usize;
    let windows = (0..count)
        .map(|index| {
            let start_sec = index as f64 * max_duration_sec;
            ChunkWindow {
                index,
                start_sec,
                duration_sec: max_duration_sec.min(total_duration_sec - start_sec),
            }
        })
        .filter(|window| window.duration_sec >= MIN_WINDOW_SEC)
        .collect();

    Ok(windows)
}
