//! Enter/exit notifications for an element scrolling through the viewport.

use crate::geometry::Region;

/// Fraction of the element that must be on screen to count as visible.
pub const DEFAULT_THRESHOLD: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportEvent {
    Entered,
    Exited,
}

/// Reports when a watched element crosses into or out of view. The
/// rendering layer feeds it the element's bounds after each layout pass.
pub trait ViewportObserver {
    fn observe(&mut self, element: Region, viewport: Region) -> Option<ViewportEvent>;
}

/// Threshold-based observer. In `once` mode it stops reporting after the
/// first `Entered`.
#[derive(Clone, Debug)]
pub struct IntersectionObserver {
    threshold: f64,
    once: bool,
    visible: bool,
    done: bool,
}

impl IntersectionObserver {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            once: false,
            visible: false,
            done: false,
        }
    }

    pub fn once(threshold: f64) -> Self {
        Self {
            once: true,
            ..Self::new(threshold)
        }
    }
}

/// Share of `element` that lies inside `viewport`, in `[0, 1]`.
pub fn intersection_ratio(element: Region, viewport: Region) -> f64 {
    let area = element.area();
    if area == 0 {
        return 0.0;
    }
    let shown = element
        .intersection(&viewport)
        .map(|r| r.area())
        .unwrap_or(0);
    shown as f64 / area as f64
}

impl ViewportObserver for IntersectionObserver {
    fn observe(&mut self, element: Region, viewport: Region) -> Option<ViewportEvent> {
        if self.done {
            return None;
        }
        let now_visible = intersection_ratio(element, viewport) >= self.threshold;
        if now_visible == self.visible {
            return None;
        }
        self.visible = now_visible;
        if now_visible {
            if self.once {
                self.done = true;
            }
            Some(ViewportEvent::Entered)
        } else {
            Some(ViewportEvent::Exited)
        }
    }
}
