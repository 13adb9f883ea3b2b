//! Aspect ratio normalization.
//!
//! Turns footage of arbitrary resolution into exact 1080x1920 frames by
//! center-cropping toward 9:16 and then scaling. Letterboxing is never
//! used; black bars are a non-goal.

use shorts_models::OutputSpec;

use crate::error::GeometryError;

/// Center crop to apply before scaling to the output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropPlan {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Compute the center crop that brings a source to the output aspect.
///
/// Sources wider than 9:16 are cropped horizontally, narrower sources
/// vertically. Fails with [`GeometryError::DegenerateFrame`] when the
/// source is smaller than the output frame in both dimensions.
pub fn normalize(
    source_width: u32,
    source_height: u32,
    spec: &OutputSpec,
) -> Result<CropPlan, GeometryError> {
    if source_width < spec.width && source_height < spec.height {
        return Err(GeometryError::DegenerateFrame {
            width: source_width,
            height: source_height,
        });
    }

    let target_aspect = spec.aspect();
    let source_aspect = source_width as f64 / source_height as f64;

    let (width, height) = if source_aspect > target_aspect {
        // Wider than target: crop horizontally
        let width = even(source_height as f64 * target_aspect).min(source_width);
        (width, source_height)
    } else {
        // Narrower/taller than target: crop vertically
        let height = even(source_width as f64 / target_aspect).min(source_height);
        (source_width, height)
    };

    Ok(CropPlan {
        width,
        height,
        x: (source_width - width) / 2,
        y: (source_height - height) / 2,
    })
}

/// FFmpeg filter steps for crop + scale + frame rate.
pub fn filter_steps(crop: &CropPlan, spec: &OutputSpec) -> String {
    format!(
        "crop={}:{}:{}:{},scale={}:{},fps={}",
        crop.width, crop.height, crop.x, crop.y, spec.width, spec.height, spec.fps
    )
}

/// Round down to an even pixel count (codec requirement).
fn even(value: f64) -> u32 {
    (value.round() as u32) & !1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> OutputSpec {
        OutputSpec::default()
    }

    #[test]
    fn test_landscape_source_crops_width() {
        // 16:9 source: keep full height, crop to a 9:16 window
        let crop = normalize(1920, 1080, &spec()).unwrap();
        assert_eq!(crop.height, 1080);
        assert_eq!(crop.width, 606); // 1080 * 9/16 = 607.5, rounded even
        assert_eq!(crop.x, (1920 - 606) / 2);
        assert_eq!(crop.y, 0);
    }

    #[test]
    fn test_portrait_source_passes_through() {
        // Already 9:16: crop is the full frame
        let crop = normalize(1080, 1920, &spec()).unwrap();
        assert_eq!(
            crop,
            CropPlan {
                width: 1080,
                height: 1920,
                x: 0,
                y: 0
            }
        );
    }

    #[test]
    fn test_square_source_crops_height() {
        // 1:1 source is wider than 9:16: crop horizontally
        let crop = normalize(1440, 1440, &spec()).unwrap();
        assert_eq!(crop.height, 1440);
        assert_eq!(crop.width, 810); // 1440 * 9/16
        assert_eq!(crop.x, (1440 - 810) / 2);
    }

    #[test]
    fn test_tall_source_crops_height() {
        // 9:21-ish source is narrower than 9:16: crop vertically
        let crop = normalize(1080, 2520, &spec()).unwrap();
        assert_eq!(crop.width, 1080);
        assert_eq!(crop.height, 1920); // 1080 * 16/9
        assert_eq!(crop.y, (2520 - 1920) / 2);
    }

    #[test]
    fn test_degenerate_source_rejected() {
        assert!(matches!(
            normalize(640, 360, &spec()),
            Err(GeometryError::DegenerateFrame { .. })
        ));
        // One sufficient dimension is enough to proceed (upscaled after crop)
        assert!(normalize(1280, 720, &spec()).is_ok());
    }

    #[test]
    fn test_crop_aspect_close_to_target() {
        for (w, h) in [(1920, 1080), (1440, 1440), (1080, 2520), (3840, 2160)] {
            let crop = normalize(w, h, &spec()).unwrap();
            let aspect = crop.width as f64 / crop.height as f64;
            assert!(
                (aspect - spec().aspect()).abs() < 0.01,
                "{w}x{h} -> {crop:?}"
            );
        }
    }

    #[test]
    fn test_filter_steps() {
        let crop = normalize(1920, 1080, &spec()).unwrap();
        let filter = filter_steps(&crop, &spec());
        assert_eq!(filter, "crop=606:1080:657:0,scale=1080:1920,fps=30");
    }
}
