//! ASS subtitle serialization.
//!
//! Renders a caption timeline into an Advanced SubStation Alpha file
//! that FFmpeg burns in via the `ass` filter. Styling comes from the
//! render plan's style variant; chunk timing is written as-is, so a
//! caption is visible exactly during its `[start, end)` interval.

use std::path::Path;

use shorts_models::{CaptionColor, CaptionPosition, StyleVariant, OUTPUT_HEIGHT, OUTPUT_WIDTH};

use crate::captions::CaptionTimeline;

/// Caption font size at scale 1.0, in play-resolution pixels.
pub const BASE_FONT_SIZE: f64 = 60.0;

/// Outline thickness in play-resolution pixels.
const OUTLINE_WIDTH: u32 = 2;

/// Bottom margin used for the lower-third position.
const LOWER_THIRD_MARGIN_V: u32 = 420;

/// Horizontal margins keeping text off the frame edges.
const MARGIN_H: u32 = 40;

/// Serialize a timeline to ASS subtitle text.
pub fn render_ass(timeline: &CaptionTimeline) -> String {
    let style = timeline.style();
    let mut out = String::new();

    out.push_str("[Script Info]\n");
    out.push_str("ScriptType: v4.00+\n");
    out.push_str(&format!("PlayResX: {OUTPUT_WIDTH}\n"));
    out.push_str(&format!("PlayResY: {OUTPUT_HEIGHT}\n"));
    out.push_str("WrapStyle: 0\n");
    out.push_str("ScaledBorderAndShadow: yes\n\n");

    out.push_str("[V4+ Styles]\n");
    out.push_str(
        "Format: Name, Fontname, Fontsize, PrimaryColour, OutlineColour, BackColour, \
         Bold, Outline, Shadow, Alignment, MarginL, MarginR, MarginV\n",
    );
    out.push_str(&format!("Style: {}\n\n", style_line(style)));

    out.push_str("[Events]\n");
    out.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
    for chunk in timeline.iter() {
        out.push_str(&format!(
            "Dialogue: 0,{},{},Caption,,0,0,0,,{}\n",
            format_timestamp(chunk.start),
            format_timestamp(chunk.end),
            escape_text(&chunk.text),
        ));
    }

    out
}

/// Write the timeline to an .ass file.
pub async fn write_ass(timeline: &CaptionTimeline, path: &Path) -> std::io::Result<()> {
    tokio::fs::write(path, render_ass(timeline)).await
}

fn style_line(style: &StyleVariant) -> String {
    let font_size = (BASE_FONT_SIZE * style.size_scale).round() as u32;
    let (alignment, margin_v) = match style.position {
        // Numpad alignment: 5 = middle-center, 2 = bottom-center
        CaptionPosition::Center => (5, 0),
        CaptionPosition::LowerThird => (2, LOWER_THIRD_MARGIN_V),
    };

    format!(
        "Caption,{},{},{},{},{},1,{},0,{},{},{},{}",
        style.font.family_name(),
        font_size,
        ass_color(style.primary_color),
        ass_color(style.outline_color),
        ass_color(CaptionColor::Black),
        OUTLINE_WIDTH,
        alignment,
        MARGIN_H,
        MARGIN_H,
        margin_v,
    )
}

/// ASS colors are &HAABBGGRR (alpha, blue, green, red).
fn ass_color(color: CaptionColor) -> String {
    let (r, g, b) = color.rgb();
    format!("&H00{b:02X}{g:02X}{r:02X}")
}

/// ASS timestamp: H:MM:SS.CC (centisecond precision).
fn format_timestamp(seconds: f64) -> String {
    let total_cs = (seconds.max(0.0) * 100.0).round() as u64;
    let cs = total_cs % 100;
    let total_secs = total_cs / 100;
    let s = total_secs % 60;
    let m = (total_secs / 60) % 60;
    let h = total_secs / 3600;
    format!("{h}:{m:02}:{s:02}.{cs:02}")
}

/// Keep chunk text from being parsed as ASS override tags or breaking
/// the dialogue line.
fn escape_text(text: &str) -> String {
    text.replace('{', "(")
        .replace('}', ")")
        .replace('\n', " ")
        .replace('\r', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorts_models::{CaptionFont, CaptionWord};

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "0:00:00.00");
        assert_eq!(format_timestamp(1777.5), "0:29:37.50");
        assert_eq!(format_timestamp(3661.25), "1:01:01.25");
        assert_eq!(format_timestamp(-1.0), "0:00:00.00");
    }

    #[test]
    fn test_ass_color_bgr_order() {
        assert_eq!(ass_color(CaptionColor::Yellow), "&H0000FFFF");
        assert_eq!(ass_color(CaptionColor::Cyan), "&H00FFFF00");
        assert_eq!(ass_color(CaptionColor::White), "&H00FFFFFF");
        assert_eq!(ass_color(CaptionColor::Black), "&H00000000");
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("{\\b1}bold"), "(\\b1)bold");
        assert_eq!(escape_text("two\nlines"), "two lines");
    }

    #[test]
    fn test_render_ass_document() {
        let words = vec![
            CaptionWord::new("hello", 0.0, 0.5),
            CaptionWord::new("world.", 0.5, 1.0),
        ];
        let style = StyleVariant {
            font: CaptionFont::Impact,
            ..StyleVariant::default()
        };
        let timeline = CaptionTimeline::build(&words, 2.0, style);
        let ass = render_ass(&timeline);

        assert!(ass.contains("PlayResX: 1080"));
        assert!(ass.contains("PlayResY: 1920"));
        assert!(ass.contains("Style: Caption,Impact,60,&H0000FFFF"));
        assert!(ass.contains("Dialogue: 0,0:00:00.00,0:00:02.00,Caption,,0,0,0,,hello world."));
    }

    #[test]
    fn test_lower_third_margins() {
        let style = StyleVariant {
            position: CaptionPosition::LowerThird,
            ..StyleVariant::default()
        };
        let line = style_line(&style);
        assert!(line.ends_with(",2,40,40,420"), "{line}");
    }

    #[test]
    fn test_size_scale_applied() {
        let style = StyleVariant {
            size_scale: 70.0 / 60.0,
            ..StyleVariant::default()
        };
        let line = style_line(&style);
        assert!(line.contains(",70,"), "{line}");
    }
}
