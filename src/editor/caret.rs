//! Caret projection
//!
//! Turns a caret offset into the page position where the suggestion
//! dropdown is drawn: just below the caret, clamped to the viewport.

use super::layout::{locate, TextLayout};
use crate::config::OverlaySettings;

/// Rendering geometry of the live text surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceGeometry {
    /// Page-absolute left edge of the text box
    pub left: f32,
    /// Page-absolute top edge of the text box
    pub top: f32,
    /// Outer width of the text box (padding included)
    pub width: f32,
    /// Inner padding on every side
    pub padding: f32,
    /// Horizontal scroll offset of the text box
    pub scroll_left: f32,
    /// Vertical scroll offset of the text box
    pub scroll_top: f32,
    /// Width of the visible viewport
    pub viewport_width: f32,
}

impl SurfaceGeometry {
    /// Width available to text before it wraps
    pub fn content_width(&self) -> f32 {
        (self.width - 2.0 * self.padding).max(0.0)
    }
}

/// Pixel anchor for the suggestion overlay
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub top: f32,
    pub left: f32,
}

/// Converts caret offsets into overlay anchors
pub struct CaretProjector {
    layout: Box<dyn TextLayout + Send>,
    /// Whether text wraps at the box width
    wrap: bool,
    /// Keeps the overlay this far from the viewport's right edge
    right_margin: f32,
    /// Drops the overlay this far below the caret's top
    vertical_offset: f32,
}

impl CaretProjector {
    pub fn new(layout: Box<dyn TextLayout + Send>) -> Self {
        let overlay = OverlaySettings::default();
        Self {
            layout,
            wrap: true,
            right_margin: overlay.right_margin,
            vertical_offset: overlay.vertical_offset,
        }
    }

    /// Apply overlay margins from settings
    pub fn with_overlay(mut self, overlay: &OverlaySettings) -> Self {
        self.right_margin = overlay.right_margin;
        self.vertical_offset = overlay.vertical_offset;
        self
    }

    /// Enable or disable soft wrapping
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Project the caret at `offset` into `content` onto the page
    pub fn project(&self, content: &str, offset: usize, geometry: &SurfaceGeometry) -> Anchor {
        let wrap_width = self.wrap.then(|| geometry.content_width());
        let point = locate(self.layout.as_ref(), content, offset, wrap_width);

        let top = geometry.top + geometry.padding + point.y - geometry.scroll_top + self.vertical_offset;
        let left = geometry.left + geometry.padding + point.x - geometry.scroll_left;
        Anchor {
            top,
            left: left.min(geometry.viewport_width - self.right_margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::layout::{FontMetrics, MonospaceLayout};

    fn projector() -> CaretProjector {
        CaretProjector::new(Box::new(MonospaceLayout::new(FontMetrics {
            advance_width: 8.0,
            line_height: 24.0,
        })))
    }

    fn geometry() -> SurfaceGeometry {
        SurfaceGeometry {
            left: 40.0,
            top: 100.0,
            width: 330.0,
            padding: 15.0,
            scroll_left: 0.0,
            scroll_top: 0.0,
            viewport_width: 1280.0,
        }
    }

    #[test]
    fn test_anchor_below_caret() {
        let anchor = projector().project("print(", 6, &geometry());
        assert_eq!(anchor.left, 40.0 + 15.0 + 48.0);
        assert_eq!(anchor.top, 100.0 + 15.0 + 25.0);
    }

    #[test]
    fn test_anchor_on_second_line() {
        let anchor = projector().project("a\nbc", 3, &geometry());
        assert_eq!(anchor.left, 40.0 + 15.0 + 8.0);
        assert_eq!(anchor.top, 100.0 + 15.0 + 24.0 + 25.0);
    }

    #[test]
    fn test_anchor_tracks_scroll() {
        let mut geo = geometry();
        geo.scroll_top = 24.0;
        geo.scroll_left = 8.0;
        let anchor = projector().project("a\nbc", 3, &geo);
        assert_eq!(anchor.left, 40.0 + 15.0);
        assert_eq!(anchor.top, 100.0 + 15.0 + 25.0);
    }

    #[test]
    fn test_anchor_clamped_to_viewport() {
        let mut geo = geometry();
        geo.viewport_width = 300.0;
        let anchor = projector().project("some fairly long line", 20, &geo);
        assert_eq!(anchor.left, 300.0 - 220.0);
    }

    #[test]
    fn test_wrapping_uses_content_width() {
        // 300px of text area is 37 cells; the second word wraps
        let text = format!("{} tail", "x".repeat(35));
        let wrapped = projector().project(&text, 36, &geometry());
        assert_eq!(wrapped.left, 40.0 + 15.0);
        assert_eq!(wrapped.top, 100.0 + 15.0 + 24.0 + 25.0);

        let unwrapped = projector().with_wrap(false).project(&text, 36, &geometry());
        assert_eq!(unwrapped.left, 40.0 + 15.0 + 36.0 * 8.0);
        assert_eq!(unwrapped.top, 100.0 + 15.0 + 25.0);
    }

    #[test]
    fn test_custom_overlay_margins() {
        let overlay = OverlaySettings {
            right_margin: 100.0,
            vertical_offset: 10.0,
        };
        let mut geo = geometry();
        geo.viewport_width = 150.0;
        let anchor = projector().with_overlay(&overlay).project("abcdefghij", 10, &geo);
        assert_eq!(anchor.left, 50.0);
        assert_eq!(anchor.top, 125.0);
    }
}
