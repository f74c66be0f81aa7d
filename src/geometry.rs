//! Unit-agnostic geometry shared by the layout, preview and tour modules.
//!
//! Coordinates are signed so intermediate placements may fall off-screen
//! before they are clamped. The unit is whatever the rendering surface uses;
//! `Metrics` carries the constants for a given unit system.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle; `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Grow by `pad` on every side.
    pub fn expand(&self, pad: i32) -> Region {
        Region::new(
            self.x - pad,
            self.y - pad,
            self.width + 2 * pad,
            self.height + 2 * pad,
        )
    }

    /// Shrink by `dx` horizontally and `dy` vertically on each side.
    pub fn inset(&self, dx: i32, dy: i32) -> Region {
        Region::new(
            self.x + dx,
            self.y + dy,
            (self.width - 2 * dx).max(0),
            (self.height - 2 * dy).max(0),
        )
    }

    pub fn intersection(&self, other: &Region) -> Option<Region> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > x && bottom > y {
            Some(Region::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Fixed sizes for one unit system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Metrics {
    pub sidebar_width: i32,
    pub min_detail_width: i32,
    pub min_main_width: i32,
    pub default_detail_width: i32,
    /// Viewports narrower than this use the compact (overlay) layout.
    pub compact_breakpoint: i32,
    /// Gap around the window when it is not maximized.
    pub window_margin: i32,
    pub title_bar_height: i32,
    /// Detail width change per keyboard resize step.
    pub resize_step: i32,
    pub preview_offset: i32,
    pub preview_size: Size,
    pub tour_padding: i32,
    pub tour_offset: i32,
    pub tour_tooltip: Size,
    /// Chip lists taller than this many rows collapse behind "Show More".
    pub collapsed_chip_rows: usize,
}

impl Metrics {
    /// CSS pixel constants of the web layout.
    pub const PIXELS: Metrics = Metrics {
        sidebar_width: 240,
        min_detail_width: 320,
        min_main_width: 400,
        default_detail_width: 450,
        compact_breakpoint: 768,
        window_margin: 32,
        title_bar_height: 44,
        resize_step: 20,
        preview_offset: 15,
        preview_size: Size::new(256, 230),
        tour_padding: 10,
        tour_offset: 15,
        tour_tooltip: Size::new(320, 180),
        collapsed_chip_rows: 2,
    };

    /// Terminal cell constants.
    pub const TERMINAL: Metrics = Metrics {
        sidebar_width: 26,
        min_detail_width: 30,
        min_main_width: 36,
        default_detail_width: 44,
        compact_breakpoint: 100,
        window_margin: 1,
        title_bar_height: 1,
        resize_step: 2,
        preview_offset: 2,
        preview_size: Size::new(34, 8),
        tour_padding: 1,
        tour_offset: 1,
        tour_tooltip: Size::new(44, 9),
        collapsed_chip_rows: 2,
    };
}
