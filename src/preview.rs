//! Placement of the floating preview shown while hovering a grid item.

use crate::geometry::{Metrics, Point, Size};

/// Where to draw a `preview`-sized box for a pointer at `pointer`.
///
/// The box sits `offset` below and right of the pointer. It flips to the
/// left of / above the pointer when it would overflow the right / bottom
/// edge, is pushed back to `offset` if that lands it off the top or left,
/// and finally pulled inside the viewport so it never hangs over an edge
/// when it fits at all.
pub fn compute_preview_position(
    pointer: Point,
    viewport: Size,
    preview: Size,
    offset: i32,
) -> Point {
    let mut x = pointer.x + offset;
    let mut y = pointer.y + offset;

    if x + preview.width > viewport.width {
        x = pointer.x - preview.width - offset;
    }
    if y + preview.height > viewport.height {
        y = pointer.y - preview.height - offset;
    }

    if x < 0 {
        x = offset;
    }
    if y < 0 {
        y = offset;
    }

    if x + preview.width > viewport.width {
        x = (viewport.width - preview.width).max(0);
    }
    if y + preview.height > viewport.height {
        y = (viewport.height - preview.height).max(0);
    }

    Point::new(x, y)
}

/// Which grid item the pointer is over, and where the pointer is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverState {
    project: Option<u32>,
    pointer: Point,
}

impl HoverState {
    /// Pointer moved over `project` (or over empty space, for `None`).
    pub fn track(&mut self, project: Option<u32>, pointer: Point) {
        self.project = project;
        self.pointer = pointer;
    }

    pub fn clear(&mut self) {
        self.project = None;
    }

    pub fn project(&self) -> Option<u32> {
        self.project
    }

    /// Preview placement, or `None` while nothing is hovered.
    pub fn position(&self, viewport: Size, metrics: &Metrics) -> Option<Point> {
        self.project?;
        Some(compute_preview_position(
            self.pointer,
            viewport,
            fit_preview(metrics.preview_size, viewport),
            metrics.preview_offset,
        ))
    }
}

/// Shrink the preview to the viewport on tiny screens.
pub fn fit_preview(preview: Size, viewport: Size) -> Size {
    Size::new(
        preview.width.min(viewport.width.max(0)),
        preview.height.min(viewport.height.max(0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VIEWPORT: Size = Size::new(1024, 768);
    const PREVIEW: Size = Size::new(256, 230);

    #[test]
    fn test_default_placement_offsets_pointer() {
        let pos = compute_preview_position(Point::new(100, 100), VIEWPORT, PREVIEW, 15);
        assert_eq!(pos, Point::new(115, 115));
    }

    #[test]
    fn test_flips_left_near_right_edge() {
        let pos = compute_preview_position(Point::new(900, 100), VIEWPORT, PREVIEW, 15);
        assert_eq!(pos, Point::new(900 - 256 - 15, 115));
    }

    #[test]
    fn test_flips_up_near_bottom_edge() {
        let pos = compute_preview_position(Point::new(100, 700), VIEWPORT, PREVIEW, 15);
        assert_eq!(pos, Point::new(115, 700 - 230 - 15));
    }

    #[test]
    fn test_clamps_after_flip() {
        // Too close to the right edge to fit right, too close to the left to fit left.
        let viewport = Size::new(300, 300);
        let pos = compute_preview_position(Point::new(150, 150), viewport, PREVIEW, 15);
        assert!(pos.x >= 0 && pos.x + PREVIEW.width <= viewport.width);
        assert!(pos.y >= 0 && pos.y + PREVIEW.height <= viewport.height);
    }

    #[test]
    fn test_hover_state() {
        let mut hover = HoverState::default();
        assert!(hover.position(VIEWPORT, &Metrics::PIXELS).is_none());
        hover.track(Some(7), Point::new(10, 10));
        assert_eq!(hover.project(), Some(7));
        assert_eq!(
            hover.position(VIEWPORT, &Metrics::PIXELS),
            Some(Point::new(25, 25))
        );
        hover.clear();
        assert!(hover.position(VIEWPORT, &Metrics::PIXELS).is_none());
    }

    #[test]
    fn test_fit_preview_to_small_viewport() {
        assert_eq!(fit_preview(Size::new(34, 8), Size::new(20, 30)), Size::new(20, 8));
    }

    proptest! {
        #[test]
        fn prop_preview_stays_on_screen(
            vw in 1i32..2000,
            vh in 1i32..2000,
            pw_frac in 0.0f64..=1.0,
            ph_frac in 0.0f64..=1.0,
            px in -500i32..2500,
            py in -500i32..2500,
            offset in 0i32..40,
        ) {
            let preview = Size::new((vw as f64 * pw_frac) as i32, (vh as f64 * ph_frac) as i32);
            let pointer = Point::new(px, py);
            let pos = compute_preview_position(pointer, Size::new(vw, vh), preview, offset);
            prop_assert!(pos.x >= 0);
            prop_assert!(pos.y >= 0);
            prop_assert!(pos.x + preview.width <= vw);
            prop_assert!(pos.y + preview.height <= vh);
        }
    }
}
