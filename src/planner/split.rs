//! Split plan computation from probed metadata

use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::{MediaMetadata, SplitMode, SplitPlan};
use crate::domain::rules::{
    duration_for_size, size_for_duration, validate_target, UploadCapPolicy, MB_PER_GB,
    TELEGRAM_CAP_MB,
};

/// Decides whether and how finely a source must be cut.
///
/// Both modes assume the source's average bitrate holds for every
/// segment; variable-bitrate sources will land above or below the target.
pub struct SplitPlanner;

impl SplitPlanner {
    /// Create a new split planner
    pub fn new() -> Self {
        Self
    }

    /// Plan from a user-facing target: gigabytes for `BySize`, minutes for
    /// `ByDuration`.
    pub fn compute(
        &self,
        metadata: &MediaMetadata,
        mode: SplitMode,
        target_value: f64,
        telegram_capped: bool,
    ) -> Result<SplitPlan, DomainError> {
        let target_value = validate_target(target_value)?;
        info!(
            "Computing {} plan for {} (target {}, telegram {})",
            mode,
            metadata.path.display(),
            target_value,
            telegram_capped
        );

        let plan = match mode {
            SplitMode::BySize => {
                self.compute_by_size(metadata, target_value * MB_PER_GB, telegram_capped)?
            }
            SplitMode::ByDuration => {
                self.compute_by_duration(metadata, target_value, telegram_capped)?
            }
        };

        plan.check_invariants()?;
        info!(
            "Plan: max {:.3}s per part, {} part(s), will_split={}",
            plan.max_duration_sec, plan.estimated_parts, plan.will_split
        );
        Ok(plan)
    }

    /// Plan so that each part stays under `target_mb` megabytes
    pub fn compute_by_size(
        &self,
        metadata: &MediaMetadata,
        target_mb: f64,
        telegram_capped: bool,
    ) -> Result<SplitPlan, DomainError> {
        let requested_mb = validate_target(target_mb)?;
        let target_mb = UploadCapPolicy::clamp_target_mb(requested_mb, telegram_capped);
        if target_mb < requested_mb {
            debug!("Target clamped from {:.2} MB to {:.2} MB", requested_mb, target_mb);
        }

        let duration_sec = metadata.duration_sec;
        let size_mb = metadata.size_mb();

        let mut max_duration_sec = duration_sec;
        if size_mb > target_mb {
            max_duration_sec = duration_for_size(target_mb, metadata.bitrate_kbps());
        }

        // The container can be larger than bitrate * duration suggests; a
        // window covering the whole source means there is nothing to cut.
        if max_duration_sec >= duration_sec {
            max_duration_sec = duration_sec;
        }
        let estimated_parts = parts_for(duration_sec, max_duration_sec);

        Ok(SplitPlan {
            mode: SplitMode::BySize,
            target_value: requested_mb / MB_PER_GB,
            telegram_capped,
            max_duration_sec,
            duration_sec,
            target_size_mb: target_mb,
            will_split: estimated_parts > 1,
            estimated_parts,
            input_path: metadata.path.clone(),
        })
    }

    /// Plan so that each part lasts at most `target_minutes`
    pub fn compute_by_duration(
        &self,
        metadata: &MediaMetadata,
        target_minutes: f64,
        telegram_capped: bool,
    ) -> Result<SplitPlan, DomainError> {
        let target_minutes = validate_target(target_minutes)?;
        let duration_sec = metadata.duration_sec;
        let bitrate_kbps = metadata.bitrate_kbps();

        let mut max_duration_sec = (target_minutes * 60.0).min(duration_sec);
        let mut will_split = max_duration_sec < duration_sec;
        let mut estimated_size_mb = size_for_duration(max_duration_sec, bitrate_kbps);

        if UploadCapPolicy::exceeds_cap(estimated_size_mb, telegram_capped) {
            debug!(
                "Estimated {:.2} MB per part exceeds the upload cap, shortening parts",
                estimated_size_mb
            );
            estimated_size_mb = TELEGRAM_CAP_MB;
            max_duration_sec = duration_for_size(TELEGRAM_CAP_MB, bitrate_kbps);
            will_split = max_duration_sec < duration_sec;
            if !will_split {
                max_duration_sec = duration_sec;
            }
        }

        let estimated_parts = if will_split {
            parts_for(duration_sec, max_duration_sec)
        } else {
            1
        };

        Ok(SplitPlan {
            mode: SplitMode::ByDuration,
            target_value: target_minutes,
            telegram_capped,
            max_duration_sec,
            duration_sec,
            target_size_mb: estimated_size_mb,
            will_split: estimated_parts > 1,
            estimated_parts,
            input_path: metadata.path.clone(),
        })
    }
}

impl Default for SplitPlanner {
    fn default() -> Self {
        Self::new()
    }
}

fn parts_for(duration_sec: f64, max_duration_sec: f64) -> u32 {
    ((duration_sec / max_duration_sec).ceil() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::BYTES_PER_MB;

    fn metadata(duration_sec: f64, size_mb: f64, bitrate_kbps: f64) -> MediaMetadata {
        MediaMetadata::new(
            "/videos/lecture.mp4",
            duration_sec,
            size_mb * BYTES_PER_MB,
            bitrate_kbps * 1000.0,
        )
        .unwrap()
    }

    #[test]
    fn test_by_size_splits_oversized_source() {
        let planner = SplitPlanner::new();
        let plan = planner
            .compute_by_size(&metadata(650.0, 162.5, 2000.0), 100.0, false)
            .unwrap();

        assert!(plan.will_split);
        assert!((plan.max_duration_sec - 409.6).abs() < 1e-9);
        assert_eq!(plan.estimated_parts, 2);
        assert_eq!(plan.target_size_mb, 100.0);
    }

    #[test]
    fn test_by_size_small_source_is_not_split() {
        let plan = SplitPlanner::new()
            .compute_by_size(&metadata(650.0, 80.0, 1000.0), 100.0, false)
            .unwrap();

        assert!(!plan.will_split);
        assert_eq!(plan.estimated_parts, 1);
        assert_eq!(plan.max_duration_sec, 650.0);
    }

    #[test]
    fn test_by_size_collapses_when_window_covers_source() {
        // 120 MB on disk but only 100 MB worth of bitrate over the duration
        let meta = metadata(400.0, 120.0, 2048.0);
        let plan = SplitPlanner::new().compute_by_size(&meta, 110.0, false).unwrap();

        assert!(!plan.will_split);
        assert_eq!(plan.estimated_parts, 1);
        assert_eq!(plan.max_duration_sec, 400.0);
        assert!(plan.check_invariants().is_ok());
    }

    #[test]
    fn test_by_size_telegram_clamps_target() {
        let meta = metadata(7200.0, 4000.0, 4551.0);
        let plan = SplitPlanner::new().compute_by_size(&meta, 3000.0, true).unwrap();

        assert_eq!(plan.target_size_mb, TELEGRAM_CAP_MB);
        assert!(plan.telegram_capped);
        assert!(size_for_duration(plan.max_duration_sec, meta.bitrate_kbps()) <= TELEGRAM_CAP_MB + 1e-6);
    }

    #[test]
    fn test_by_duration_clamps_to_source_length() {
        let meta = metadata(200.0, 50.0, 2000.0);
        let plan = SplitPlanner::new().compute_by_duration(&meta, 5.0, false).unwrap();

        assert_eq!(plan.max_duration_sec, 200.0);
        assert!(!plan.will_split);
        assert_eq!(plan.estimated_parts, 1);
    }

    #[test]
    fn test_by_duration_splits_and_estimates_size() {
        let meta = metadata(1800.0, 440.0, 2048.0);
        let plan = SplitPlanner::new().compute_by_duration(&meta, 10.0, false).unwrap();

        assert!(plan.will_split);
        assert_eq!(plan.max_duration_sec, 600.0);
        assert_eq!(plan.estimated_parts, 3);
        assert!((plan.target_size_mb - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_by_duration_telegram_shortens_parts() {
        // 8192 kbps: one hour would be 3600 MB
        let meta = metadata(7200.0, 7200.0, 8192.0);
        let plan = SplitPlanner::new().compute_by_duration(&meta, 60.0, true).unwrap();

        assert_eq!(plan.target_size_mb, TELEGRAM_CAP_MB);
        assert!((plan.max_duration_sec - 1900.0).abs() < 1e-9);
        assert_eq!(plan.estimated_parts, 4);
        assert!(plan.will_split);
    }

    #[test]
    fn test_by_duration_telegram_without_split_keeps_full_duration() {
        // 3 GB source, single part requested; cap forces two parts
        let meta = metadata(3000.0, 3000.0, 8192.0);
        let plan = SplitPlanner::new().compute_by_duration(&meta, 100.0, true).unwrap();
        assert!(plan.will_split);
        assert_eq!(plan.estimated_parts, 2);

        // Under the cap nothing changes
        let small = metadata(600.0, 600.0, 8192.0);
        let plan = SplitPlanner::new().compute_by_duration(&small, 100.0, true).unwrap();
        assert!(!plan.will_split);
        assert_eq!(plan.max_duration_sec, 600.0);
    }

    #[test]
    fn test_compute_converts_gigabytes() {
        let meta = metadata(650.0, 162.5, 2000.0);
        let plan = SplitPlanner::new()
            .compute(&meta, SplitMode::BySize, 100.0 / 1024.0, false)
            .unwrap();
        assert!((plan.target_size_mb - 100.0).abs() < 1e-9);
        assert!((plan.target_value - 100.0 / 1024.0).abs() < 1e-12);
        assert_eq!(plan.estimated_parts, 2);
    }

    #[test]
    fn test_target_value_keeps_requested_gigabytes_when_capped() {
        let meta = metadata(7200.0, 4000.0, 4551.0);
        let plan = SplitPlanner::new()
            .compute(&meta, SplitMode::BySize, 2.5, true)
            .unwrap();
        assert_eq!(plan.target_value, 2.5);
        assert_eq!(plan.target_size_mb, TELEGRAM_CAP_MB);
    }

    #[test]
    fn test_non_positive_target_rejected() {
        let meta = metadata(650.0, 162.5, 2000.0);
        let planner = SplitPlanner::new();
        for target in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                planner.compute(&meta, SplitMode::BySize, target, false),
                Err(DomainError::Input(_))
            ));
            assert!(matches!(
                planner.compute(&meta, SplitMode::ByDuration, target, false),
                Err(DomainError::Input(_))
            ));
        }
    }

    #[test]
    fn test_telegram_cap_holds_for_any_target() {
        let planner = SplitPlanner::new();
        let meta = metadata(10_000.0, 20_000.0, 16_384.0);
        for target_gb in [0.5, 1.0, 1.9, 2.0, 4.0, 50.0] {
            let plan = planner.compute(&meta, SplitMode::BySize, target_gb, true).unwrap();
            assert!(plan.target_size_mb <= TELEGRAM_CAP_MB);
            assert!(plan.check_invariants().is_ok());
        }
        for minutes in [1.0, 10.0, 60.0, 500.0] {
            let plan = planner.compute(&meta, SplitMode::ByDuration, minutes, true).unwrap();
            assert!(plan.target_size_mb <= TELEGRAM_CAP_MB);
            assert!(plan.check_invariants().is_ok());
        }
    }
}
