//! Segment selection policy.
//!
//! Decides which sub-range of a background asset to extract, or how
//! many times to loop it, so the footage covers the narration exactly.
//! Long assets get a randomized offset; short assets are concatenated
//! wrap-around with no offset (the whole asset is used each pass) and
//! trimmed to length. Loop seams are hard cuts.

use shorts_models::{BackgroundAsset, SegmentPlan};

use crate::error::SegmentError;

/// Compute the segment plan for one asset and target duration.
///
/// `offset_fraction` is in [0, 1) and positions the segment within the
/// slack of a long-enough asset; it is ignored when looping.
pub fn select_segment(
    asset: &BackgroundAsset,
    needed_duration: f64,
    offset_fraction: f64,
) -> Result<SegmentPlan, SegmentError> {
    if !needed_duration.is_finite() || needed_duration <= 0.0 {
        return Err(SegmentError::InvalidDuration(needed_duration));
    }

    if asset.duration >= needed_duration {
        let max_start = asset.duration - needed_duration;
        let offset = offset_fraction.clamp(0.0, 1.0) * max_start;
        Ok(SegmentPlan {
            offset,
            duration: needed_duration,
            loop_count: 1,
        })
    } else {
        let loop_count = (needed_duration / asset.duration).ceil() as u32;
        Ok(SegmentPlan {
            offset: 0.0,
            duration: needed_duration,
            loop_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorts_models::AssetId;
    use std::path::PathBuf;

    fn asset(duration: f64) -> BackgroundAsset {
        BackgroundAsset {
            id: AssetId::new("test"),
            path: PathBuf::from("/assets/test.mp4"),
            duration,
            width: 1920,
            height: 1080,
            fps: 30.0,
        }
    }

    #[test]
    fn test_long_asset_midpoint_offset() {
        // 3600s asset, 45s needed, fraction 0.5 -> offset 1777.5
        let plan = select_segment(&asset(3600.0), 45.0, 0.5).unwrap();
        assert!((plan.offset - 1777.5).abs() < 1e-9);
        assert!((plan.duration - 45.0).abs() < 1e-9);
        assert_eq!(plan.loop_count, 1);
    }

    #[test]
    fn test_short_asset_loops() {
        // 20s asset, 45s needed -> three passes trimmed to 45s
        let plan = select_segment(&asset(20.0), 45.0, 0.7).unwrap();
        assert_eq!(plan.loop_count, 3);
        assert!((plan.offset).abs() < 1e-9);
        assert!((plan.duration - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_length_asset() {
        let plan = select_segment(&asset(45.0), 45.0, 0.9).unwrap();
        assert_eq!(plan.loop_count, 1);
        assert!((plan.offset).abs() < 1e-9);
        assert!((plan.duration - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_offset_within_bounds() {
        let asset = asset(120.0);
        for i in 0..=10 {
            let fraction = i as f64 / 10.0;
            let plan = select_segment(&asset, 45.0, fraction.min(0.999_999)).unwrap();
            assert!(plan.offset >= 0.0);
            assert!(plan.offset <= asset.duration - 45.0 + 1e-9);
            assert!((plan.duration - 45.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_loop_count_matches_ceil() {
        for (asset_dur, need, expected) in [
            (20.0, 45.0, 3),
            (44.9, 45.0, 2),
            (10.0, 100.0, 10),
            (10.0, 100.1, 11),
        ] {
            let plan = select_segment(&asset(asset_dur), need, 0.0).unwrap();
            assert_eq!(plan.loop_count, expected, "asset {asset_dur}s need {need}s");
        }
    }

    #[test]
    fn test_invalid_duration() {
        assert!(matches!(
            select_segment(&asset(60.0), 0.0, 0.5),
            Err(SegmentError::InvalidDuration(_))
        ));
        assert!(matches!(
            select_segment(&asset(60.0), -3.0, 0.5),
            Err(SegmentError::InvalidDuration(_))
        ));
        assert!(matches!(
            select_segment(&asset(60.0), f64::NAN, 0.5),
            Err(SegmentError::InvalidDuration(_))
        ));
    }
}
