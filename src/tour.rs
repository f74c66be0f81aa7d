//! Guided tour: a step-indexed overlay that points at parts of the browser.

use std::fmt;

use crate::geometry::{Metrics, Point, Region, Size};
use crate::store::FlagStore;

/// Key of the persisted "tour has been shown" flag.
pub const TOUR_SEEN_KEY: &str = "portfolio-tour-seen";

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// Logical UI element a tour step points at. The rendering layer decides
/// where each one is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TourTarget {
    SidebarNav,
    SidebarTags,
    SidebarTechs,
    HobbiesToggle,
    SearchBar,
    ViewSwitcher,
    ProjectGrid,
    ProjectDetail,
}

impl TourTarget {
    pub fn id(&self) -> &'static str {
        match self {
            TourTarget::SidebarNav => "sidebar-nav",
            TourTarget::SidebarTags => "sidebar-tags",
            TourTarget::SidebarTechs => "sidebar-techs",
            TourTarget::HobbiesToggle => "hobbies-toggle",
            TourTarget::SearchBar => "search-bar",
            TourTarget::ViewSwitcher => "view-switcher",
            TourTarget::ProjectGrid => "project-grid",
            TourTarget::ProjectDetail => "project-detail",
        }
    }
}

impl fmt::Display for TourTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TourStep {
    pub target: TourTarget,
    pub title: &'static str,
    pub body: &'static str,
}

pub const DEFAULT_STEPS: [TourStep; 8] = [
    TourStep {
        target: TourTarget::SidebarNav,
        title: "Project Categories",
        body: "Navigate between different project categories. You can view all projects, or focus on specific types like Web Apps or AI/ML.",
    },
    TourStep {
        target: TourTarget::SidebarTags,
        title: "Filter by Tags",
        body: "Refine your search by selecting specific tags. You can combine multiple tags to narrow down the results.",
    },
    TourStep {
        target: TourTarget::SidebarTechs,
        title: "Filter by Technology",
        body: "Filter projects by the technologies used. This is great for seeing examples of my work with a particular framework or language.",
    },
    TourStep {
        target: TourTarget::HobbiesToggle,
        title: "Hobbies Section",
        body: "Click here to switch to a special view for my hobby projects. It even has its own color theme!",
    },
    TourStep {
        target: TourTarget::SearchBar,
        title: "Search Projects",
        body: "Use the search bar to find projects by name or description.",
    },
    TourStep {
        target: TourTarget::ViewSwitcher,
        title: "Switch Views",
        body: "Toggle between a visual grid view and a compact list view to browse projects.",
    },
    TourStep {
        target: TourTarget::ProjectGrid,
        title: "Project Grid",
        body: "This is the main area where projects are displayed. Click on any project to see more details.",
    },
    TourStep {
        target: TourTarget::ProjectDetail,
        title: "Project Details",
        body: "Detailed information about the selected project will appear here, including descriptions, image galleries, and links.",
    },
];

/// Finds the on-screen bounds of a tour target. `None` means the target is
/// not currently displayed.
pub trait TargetResolver {
    fn resolve(&self, target: TourTarget) -> Option<Region>;
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TourPhase {
    Inactive,
    WelcomePending,
    Active(usize),
    Finished,
}

#[derive(Clone, Debug)]
pub struct TourEngine {
    steps: Vec<TourStep>,
    phase: TourPhase,
    seen: bool,
    welcome_shown: bool,
}

impl TourEngine {
    /// A first-ever visit (`seen == false`) starts out waiting to offer the
    /// welcome modal.
    pub fn new(steps: Vec<TourStep>, seen: bool) -> Self {
        let phase = if seen {
            TourPhase::Inactive
        } else {
            TourPhase::WelcomePending
        };
        Self {
            steps,
            phase,
            seen,
            welcome_shown: false,
        }
    }

    /// Engine with the default steps and the seen flag read from `store`.
    pub fn from_store(store: &dyn FlagStore) -> Self {
        Self::new(DEFAULT_STEPS.to_vec(), store.get(TOUR_SEEN_KEY))
    }

    pub fn phase(&self) -> TourPhase {
        self.phase
    }

    pub fn has_been_seen(&self) -> bool {
        self.seen
    }

    pub fn current_step(&self) -> Option<(usize, &TourStep)> {
        match self.phase {
            TourPhase::Active(i) => self.steps.get(i).map(|s| (i, s)),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, TourPhase::Active(_))
    }

    /// Reveal the welcome modal. Only meaningful while the welcome is
    /// pending; returns whether it is now showing.
    pub fn show_welcome(&mut self) -> bool {
        if self.phase == TourPhase::WelcomePending {
            self.welcome_shown = true;
        }
        self.welcome_visible()
    }

    pub fn welcome_visible(&self) -> bool {
        self.phase == TourPhase::WelcomePending && self.welcome_shown
    }

    /// Begin at step 0. Allowed from any phase so the tour can be replayed
    /// on request.
    pub fn start(&mut self, store: &mut dyn FlagStore) {
        self.mark_seen(store);
        self.welcome_shown = false;
        self.phase = if self.steps.is_empty() {
            TourPhase::Finished
        } else {
            TourPhase::Active(0)
        };
        tracing::info!(steps = self.steps.len(), "tour started");
    }

    /// Decline the welcome offer. The overlay is never shown afterwards.
    pub fn skip(&mut self, store: &mut dyn FlagStore) {
        if self.phase != TourPhase::WelcomePending {
            return;
        }
        self.mark_seen(store);
        self.welcome_shown = false;
        self.phase = TourPhase::Finished;
        tracing::info!("tour skipped");
    }

    /// Advance; "next" on the last step finishes the tour.
    pub fn next(&mut self) {
        if let TourPhase::Active(i) = self.phase {
            self.phase = if i + 1 < self.steps.len() {
                TourPhase::Active(i + 1)
            } else {
                tracing::info!("tour finished");
                TourPhase::Finished
            };
        }
    }

    pub fn previous(&mut self) {
        if let TourPhase::Active(i) = self.phase {
            if i > 0 {
                self.phase = TourPhase::Active(i - 1);
            }
        }
    }

    /// Close from any step.
    pub fn close(&mut self) {
        if self.is_active() {
            tracing::info!("tour closed");
            self.phase = TourPhase::Finished;
        }
    }

    fn mark_seen(&mut self, store: &mut dyn FlagStore) {
        self.seen = true;
        if let Err(err) = store.set(TOUR_SEEN_KEY, true) {
            tracing::warn!(error = %err, "failed to persist tour flag");
        }
    }

    /// Overlay geometry for the current step, or `None` when the tour is not
    /// running or the step's target is not on screen. A missing target does
    /// not advance the tour.
    pub fn overlay(
        &self,
        resolver: &dyn TargetResolver,
        viewport: Size,
        metrics: &Metrics,
    ) -> Option<TourOverlay> {
        let (index, step) = self.current_step()?;
        let Some(target) = resolver.resolve(step.target) else {
            tracing::trace!(target = %step.target, "tour target not displayed");
            return None;
        };

        let tooltip_size = Size::new(
            metrics
                .tour_tooltip
                .width
                .min(viewport.width - 2 * metrics.tour_padding)
                .max(0),
            metrics.tour_tooltip.height.min(viewport.height).max(0),
        );
        let origin = place_tooltip(
            target,
            tooltip_size,
            viewport,
            metrics.tour_padding,
            metrics.tour_offset,
        );

        Some(TourOverlay {
            step: *step,
            index,
            count: self.steps.len(),
            cutout: target.expand(metrics.tour_padding),
            tooltip: Region::new(origin.x, origin.y, tooltip_size.width, tooltip_size.height),
        })
    }
}

// ---------------------------------------------------------------------------
// Overlay geometry
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TourOverlay {
    pub step: TourStep,
    pub index: usize,
    pub count: usize,
    /// Undimmed hole around the target.
    pub cutout: Region,
    pub tooltip: Region,
}

impl TourOverlay {
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// "i / n", counting from 1.
    pub fn progress(&self) -> String {
        format!("{} / {}", self.index + 1, self.count)
    }
}

/// Top-left corner for a tooltip pointing at `target`.
///
/// Vertically: below the target if it fits, else above, else `padding` from
/// the top. Horizontally: centred on the target, unless that spills over an
/// edge, in which case it sits beside the target on the side away from the
/// overflow.
pub fn place_tooltip(
    target: Region,
    tooltip: Size,
    viewport: Size,
    padding: i32,
    offset: i32,
) -> Point {
    let y = if target.bottom() + tooltip.height + offset < viewport.height {
        target.bottom() + offset
    } else if target.y - tooltip.height - offset > 0 {
        target.y - tooltip.height - offset
    } else {
        padding
    };

    let center = target.x + target.width / 2;
    let half = tooltip.width / 2;
    let space_right = viewport.width - (center + half) - padding;
    let space_left = center - half - padding;
    let x = if space_right < 0 {
        target.x - offset - tooltip.width
    } else if space_left < 0 {
        target.right() + offset
    } else {
        center - half
    };

    Point::new(x, y)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
