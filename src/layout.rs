//! View mode, window chrome, pane sizes and responsive overlay state.

use std::ops::Range;

use crate::geometry::{Metrics, Point, Region, Size};

/// Width of the drag handle between the project list and the detail pane.
const HANDLE_WIDTH_PX: i32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(&self) -> ViewMode {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

/// Pointer affordance the surface should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorStyle {
    Default,
    ColumnResize,
}

/// Which sidebar chip list a "Show More" toggle belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChipList {
    Tags,
    Technologies,
}

/// Regions of the browser window for the current viewport.
///
/// Panes that are hidden in the current layout are `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaneGeometry {
    pub window: Region,
    pub title_bar: Option<Region>,
    pub sidebar: Option<Region>,
    pub main: Region,
    pub handle: Option<Region>,
    pub detail: Option<Region>,
}

// ---------------------------------------------------------------------------
// LayoutState
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct LayoutState {
    metrics: Metrics,
    viewport: Size,
    view_mode: ViewMode,
    maximized: bool,
    detail_width: i32,
    resizing: bool,
    filters_open: bool,
    detail_open: bool,
    tags_expanded: bool,
    techs_expanded: bool,
}

impl LayoutState {
    pub fn new(metrics: Metrics, viewport: Size) -> Self {
        Self {
            metrics,
            viewport,
            view_mode: ViewMode::Grid,
            maximized: false,
            detail_width: metrics.default_detail_width,
            resizing: false,
            filters_open: false,
            detail_open: false,
            tags_expanded: false,
            techs_expanded: false,
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub fn toggle_maximized(&mut self) {
        self.maximized = !self.maximized;
        tracing::debug!(maximized = self.maximized, "window maximize toggled");
    }

    // ------------------------------------------------------------------
    // Responsive layout
    // ------------------------------------------------------------------

    /// Below the breakpoint the sidebar and detail pane become overlays.
    pub fn is_compact(&self) -> bool {
        self.viewport.width < self.metrics.compact_breakpoint
    }

    /// Track a viewport resize. Wide layouts have no overlays, so both are
    /// closed whenever the viewport is at or above the breakpoint.
    pub fn set_viewport(&mut self, viewport: Size) {
        let was_compact = self.is_compact();
        self.viewport = viewport;
        if !self.is_compact() {
            if was_compact {
                tracing::debug!(width = viewport.width, "left compact layout");
            }
            self.filters_open = false;
            self.detail_open = false;
        }
    }

    pub fn filters_open(&self) -> bool {
        self.filters_open
    }

    pub fn detail_open(&self) -> bool {
        self.detail_open
    }

    pub fn open_filters(&mut self) {
        if self.is_compact() {
            self.filters_open = true;
        }
    }

    pub fn close_filters(&mut self) {
        self.filters_open = false;
    }

    pub fn open_detail(&mut self) {
        if self.is_compact() {
            self.detail_open = true;
        }
    }

    pub fn close_detail(&mut self) {
        self.detail_open = false;
    }

    // ------------------------------------------------------------------
    // Detail pane width
    // ------------------------------------------------------------------

    /// Allowed detail widths inside a container of `container_width`. The
    /// upper bound leaves room for the sidebar and a minimum list width, but
    /// never drops below the minimum detail width.
    pub fn detail_width_bounds(&self, container_width: i32) -> (i32, i32) {
        let min = self.metrics.min_detail_width;
        let max = container_width - self.metrics.sidebar_width - self.metrics.min_main_width;
        (min, max.max(min))
    }

    pub fn clamp_detail_width(&self, width: i32, container_width: i32) -> i32 {
        let (min, max) = self.detail_width_bounds(container_width);
        width.clamp(min, max)
    }

    /// Stored width, clamped to the current window.
    pub fn detail_width(&self) -> i32 {
        self.clamp_detail_width(self.detail_width, self.window_region().width)
    }

    pub fn is_resizing(&self) -> bool {
        self.resizing
    }

    /// Start a drag on the resize handle. Until `end_resize`, every pointer
    /// move goes to `resize_to`, wherever the pointer is.
    pub fn begin_resize(&mut self) {
        if !self.is_compact() {
            self.resizing = true;
        }
    }

    /// Recompute the width from the pointer's x position. Ignored when no
    /// gesture is active.
    pub fn resize_to(&mut self, pointer: Point) -> bool {
        if !self.resizing {
            return false;
        }
        let container = self.window_region();
        let width = container.right() - pointer.x;
        self.detail_width = self.clamp_detail_width(width, container.width);
        true
    }

    pub fn end_resize(&mut self) {
        if self.resizing {
            tracing::debug!(width = self.detail_width, "detail pane resized");
        }
        self.resizing = false;
    }

    /// Keyboard resize: grow (positive) or shrink (negative) by whole steps.
    pub fn nudge_detail_width(&mut self, steps: i32) {
        let container = self.window_region();
        let width = self.detail_width() + steps * self.metrics.resize_step;
        self.detail_width = self.clamp_detail_width(width, container.width);
    }

    pub fn cursor(&self) -> CursorStyle {
        if self.resizing {
            CursorStyle::ColumnResize
        } else {
            CursorStyle::Default
        }
    }

    /// Text selection is suppressed for the duration of a resize drag.
    pub fn text_selection_enabled(&self) -> bool {
        !self.resizing
    }

    // ------------------------------------------------------------------
    // Sidebar chip lists
    // ------------------------------------------------------------------

    pub fn is_expanded(&self, list: ChipList) -> bool {
        match list {
            ChipList::Tags => self.tags_expanded,
            ChipList::Technologies => self.techs_expanded,
        }
    }

    pub fn toggle_expanded(&mut self, list: ChipList) {
        match list {
            ChipList::Tags => self.tags_expanded = !self.tags_expanded,
            ChipList::Technologies => self.techs_expanded = !self.techs_expanded,
        }
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// The window frame: inset by the margin unless maximized or compact.
    pub fn window_region(&self) -> Region {
        let full = Region::from_size(self.viewport);
        if self.maximized || self.is_compact() {
            full
        } else {
            let m = self.metrics.window_margin;
            full.inset(m, m)
        }
    }

    pub fn geometry(&self) -> PaneGeometry {
        let window = self.window_region();

        if self.is_compact() {
            return PaneGeometry {
                window,
                title_bar: None,
                sidebar: None,
                main: window,
                handle: None,
                detail: None,
            };
        }

        let title_h = self.metrics.title_bar_height.min(window.height);
        let title_bar = Region::new(window.x, window.y, window.width, title_h);
        let body = Region::new(window.x, window.y + title_h, window.width, window.height - title_h);

        let sidebar_w = self.metrics.sidebar_width.min(body.width);
        let sidebar = Region::new(body.x, body.y, sidebar_w, body.height);

        let detail_w = self.detail_width().min(body.width - sidebar_w).max(0);
        let detail = Region::new(body.right() - detail_w, body.y, detail_w, body.height);

        let handle_w = self.handle_width().min(detail.x - sidebar.right()).max(0);
        let handle = Region::new(detail.x - handle_w, body.y, handle_w, body.height);

        let main_w = (handle.x - sidebar.right()).max(0);
        let main = Region::new(sidebar.right(), body.y, main_w, body.height);

        PaneGeometry {
            window,
            title_bar: Some(title_bar),
            sidebar: Some(sidebar),
            main,
            handle: Some(handle),
            detail: Some(detail),
        }
    }

    fn handle_width(&self) -> i32 {
        if self.metrics == Metrics::PIXELS {
            HANDLE_WIDTH_PX
        } else {
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Chip wrapping
// ---------------------------------------------------------------------------

/// Greedy line wrapping of chips with the given widths into rows no wider
/// than `available`, with `gap` between neighbours. A chip wider than the
/// row still gets a row of its own.
pub fn wrap_chips(widths: &[usize], available: usize, gap: usize) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut used = 0;

    for (i, &w) in widths.iter().enumerate() {
        if i > start && used + gap + w > available {
            rows.push(start..i);
            start = i;
            used = w;
        } else if i == start {
            used = w;
        } else {
            used += gap + w;
        }
    }
    if start < widths.len() {
        rows.push(start..widths.len());
    }
    rows
}

/// How many wrapped rows to show and whether a "Show More"/"Show Less"
/// toggle is needed.
pub fn visible_chip_rows(
    total_rows: usize,
    expanded: bool,
    collapsed_rows: usize,
) -> (usize, bool) {
    let overflows = total_rows > collapsed_rows;
    if overflows && !expanded {
        (collapsed_rows, true)
    } else {
        (total_rows, overflows)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn wide() -> LayoutState {
        LayoutState::new(Metrics::PIXELS, Size::new(1600, 900))
    }

    #[test]
    fn test_detail_width_bounds() {
        let layout = wide();
        assert_eq!(layout.detail_width_bounds(1536), (320, 1536 - 240 - 400));
        // Container too narrow for the maximum: bound collapses to the minimum.
        assert_eq!(layout.detail_width_bounds(700), (320, 320));
    }

    #[test]
    fn test_resize_gesture_clamps_and_restores() {
        let mut layout = wide();
        let window = layout.window_region();

        assert!(!layout.resize_to(Point::new(0, 0)));
        assert_eq!(layout.detail_width(), 450);

        layout.begin_resize();
        assert_eq!(layout.cursor(), CursorStyle::ColumnResize);
        assert!(!layout.text_selection_enabled());

        layout.resize_to(Point::new(window.right() - 500, 10));
        assert_eq!(layout.detail_width(), 500);

        // Pointer far left: clamped to the maximum.
        layout.resize_to(Point::new(-5000, 10));
        assert_eq!(layout.detail_width(), window.width - 240 - 400);

        // Pointer past the right edge: clamped to the minimum.
        layout.resize_to(Point::new(window.right() + 100, 10));
        assert_eq!(layout.detail_width(), 320);

        layout.end_resize();
        assert_eq!(layout.cursor(), CursorStyle::Default);
        assert!(layout.text_selection_enabled());
        assert!(!layout.resize_to(Point::new(window.right() - 600, 10)));
        assert_eq!(layout.detail_width(), 320);
    }

    #[test]
    fn test_nudge_detail_width() {
        let mut layout = wide();
        layout.nudge_detail_width(2);
        assert_eq!(layout.detail_width(), 490);
        layout.nudge_detail_width(-100);
        assert_eq!(layout.detail_width(), 320);
    }

    #[test]
    fn test_crossing_breakpoint_closes_overlays() {
        let mut layout = LayoutState::new(Metrics::PIXELS, Size::new(500, 800));
        assert!(layout.is_compact());
        layout.open_filters();
        layout.open_detail();
        assert!(layout.filters_open() && layout.detail_open());

        layout.set_viewport(Size::new(600, 800));
        assert!(layout.filters_open());

        layout.set_viewport(Size::new(1024, 800));
        assert!(!layout.filters_open());
        assert!(!layout.detail_open());
    }

    #[test]
    fn test_overlays_only_open_when_compact() {
        let mut layout = wide();
        layout.open_filters();
        layout.open_detail();
        assert!(!layout.filters_open());
        assert!(!layout.detail_open());
    }

    #[test]
    fn test_geometry_wide_layout() {
        let layout = LayoutState::new(Metrics::TERMINAL, Size::new(160, 40));
        let g = layout.geometry();
        assert_eq!(g.window, Region::new(1, 1, 158, 38));
        let sidebar = g.sidebar.unwrap();
        let detail = g.detail.unwrap();
        let handle = g.handle.unwrap();
        assert_eq!(sidebar.width, 26);
        assert_eq!(detail.width, 44);
        assert_eq!(detail.right(), g.window.right());
        assert_eq!(handle.right(), detail.x);
        assert_eq!(g.main.x, sidebar.right());
        assert_eq!(g.main.right(), handle.x);
        assert_eq!(g.title_bar.unwrap().height, 1);
    }

    #[test]
    fn test_geometry_maximized_and_compact() {
        let mut layout = LayoutState::new(Metrics::TERMINAL, Size::new(160, 40));
        layout.toggle_maximized();
        assert_eq!(layout.geometry().window, Region::new(0, 0, 160, 40));

        layout.set_viewport(Size::new(80, 30));
        let g = layout.geometry();
        assert!(g.sidebar.is_none());
        assert!(g.detail.is_none());
        assert!(g.title_bar.is_none());
        assert_eq!(g.main, Region::new(0, 0, 80, 30));
    }

    #[test]
    fn test_wrap_chips() {
        assert!(wrap_chips(&[], 10, 1).is_empty());
        assert_eq!(wrap_chips(&[3, 3, 3], 7, 1), vec![0..2, 2..3]);
        assert_eq!(wrap_chips(&[12, 2], 10, 1), vec![0..1, 1..2]);
        assert_eq!(wrap_chips(&[2, 2, 2], 100, 1), vec![0..3]);
    }

    #[test]
    fn test_visible_chip_rows() {
        assert_eq!(visible_chip_rows(1, false, 2), (1, false));
        assert_eq!(visible_chip_rows(4, false, 2), (2, true));
        assert_eq!(visible_chip_rows(4, true, 2), (4, true));
    }

    #[test]
    fn test_chip_list_expansion() {
        let mut layout = wide();
        assert!(!layout.is_expanded(ChipList::Tags));
        layout.toggle_expanded(ChipList::Tags);
        assert!(layout.is_expanded(ChipList::Tags));
        assert!(!layout.is_expanded(ChipList::Technologies));
    }
}
