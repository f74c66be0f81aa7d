//! The project browser: one state struct, updated by `Msg` transitions, that
//! produces a `ViewModel` for the renderer.

use std::time::Instant;

use crate::catalog::{Catalog, Project, ProjectTag};
use crate::detail::{detail_links, DetailLink, DetailState, LinkKind, ProjectStatus};
use crate::filter::{
    available_facets, compute_visible, Facets, FilterSelection, SidebarCategory, SortKey,
};
use crate::geometry::{Metrics, Point, Region, Size};
use crate::layout::{ChipList, CursorStyle, LayoutState, PaneGeometry, ViewMode};
use crate::preview::{fit_preview, HoverState};
use crate::selection::{HighlightOutcome, SelectionController};
use crate::store::FlagStore;
use crate::timers::{TimerEvent, Timers, HIGHLIGHT_DELAY, TOUR_WELCOME_DELAY};
use crate::tour::TourEngine;
use crate::viewport::{IntersectionObserver, ViewportEvent, ViewportObserver, DEFAULT_THRESHOLD};

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Default,
    Hobbies,
}

impl Theme {
    pub fn for_category(category: SidebarCategory) -> Self {
        if category.is_hobbies() {
            Theme::Hobbies
        } else {
            Theme::Default
        }
    }

    /// Accent colour name for the renderer.
    pub fn accent(&self) -> &'static str {
        match self {
            Theme::Default => "cyan",
            Theme::Hobbies => "yellow",
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum Msg {
    // Filters
    SelectCategory(SidebarCategory),
    ToggleHobbies,
    FocusSearch,
    BlurSearch,
    SetSearch(String),
    ToggleTag(ProjectTag),
    ToggleTechnology(String),
    ToggleSort(SortKey),
    ResetFilters,

    // Selection
    SelectProject(u32),
    SelectNext,
    SelectPrevious,
    SelectFirst,
    SelectLast,
    /// Highlight a project after a short delay.
    RequestHighlight(u32),

    // Layout
    SetViewMode(ViewMode),
    ToggleViewMode,
    ToggleMaximize,
    ViewportResized(Size),
    BeginResize,
    PointerMoved(Point),
    PointerReleased,
    NudgeDetailWidth(i32),
    OpenFilters,
    CloseFilters,
    CloseDetail,
    ToggleChips(ChipList),

    // Hover preview
    Hover(Option<u32>, Point),

    // Detail pane
    SelectImage(usize),
    CycleImage { forward: bool },
    OpenLightbox,
    CloseLightbox,
    OpenLink(LinkKind),

    // Tour
    StartTour,
    SkipTour,
    TourNext,
    TourPrevious,
    CloseTour,

    /// Lay out the browser window at `Region` within the visible screen.
    Layout(Region),
    /// Fire due timers.
    Tick,
}

/// Side effects the caller carries out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    OpenUrl(String),
}

// ---------------------------------------------------------------------------
// ProjectBrowser
// ---------------------------------------------------------------------------

pub struct ProjectBrowser {
    catalog: Catalog,
    filters: FilterSelection,
    /// Filters the memoized visible set was computed for.
    computed_for: Option<FilterSelection>,
    visible: Vec<u32>,
    facets: Facets,
    selection: SelectionController,
    layout: LayoutState,
    hover: HoverState,
    detail: DetailState,
    tour: TourEngine,
    store: Box<dyn FlagStore>,
    timers: Timers,
    visibility: IntersectionObserver,
    search_focused: bool,
    theme: Theme,
    last_highlight: Option<HighlightOutcome>,
}

impl ProjectBrowser {
    pub fn new(
        catalog: Catalog,
        metrics: Metrics,
        viewport: Size,
        store: Box<dyn FlagStore>,
    ) -> Self {
        let tour = TourEngine::from_store(store.as_ref());
        let selection = SelectionController::new(&catalog);
        let mut browser = Self {
            catalog,
            filters: FilterSelection::default(),
            computed_for: None,
            visible: Vec::new(),
            facets: Facets::default(),
            selection,
            layout: LayoutState::new(metrics, viewport),
            hover: HoverState::default(),
            detail: DetailState::default(),
            tour,
            store,
            timers: Timers::default(),
            visibility: IntersectionObserver::once(DEFAULT_THRESHOLD),
            search_focused: false,
            theme: Theme::Default,
            last_highlight: None,
        };
        browser.refresh();
        browser
    }

    /// Start from `filters` instead of the defaults.
    pub fn with_filters(mut self, filters: FilterSelection) -> Self {
        self.filters = filters;
        self.refresh();
        self
    }

    pub fn with_view_mode(mut self, mode: ViewMode) -> Self {
        self.layout.set_view_mode(mode);
        self
    }

    #[cfg(test)]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    #[cfg(test)]
    pub fn visible_ids(&self) -> &[u32] {
        &self.visible
    }

    pub fn selected(&self) -> Option<&Project> {
        self.selection.selected().and_then(|id| self.catalog.get(id))
    }

    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    pub fn tour(&self) -> &TourEngine {
        &self.tour
    }

    #[cfg(test)]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn lightbox_open(&self) -> bool {
        self.detail.lightbox().is_some()
    }

    /// Outcome of the most recent highlight request, once applied.
    pub fn last_highlight(&self) -> Option<HighlightOutcome> {
        self.last_highlight
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    pub fn update(&mut self, msg: Msg, now: Instant) -> Option<Command> {
        let mut command = None;
        match msg {
            Msg::SelectCategory(category) => self.select_category(category),
            Msg::ToggleHobbies => {
                let target = if self.filters.is_hobbies_mode() {
                    SidebarCategory::AllProjects
                } else {
                    SidebarCategory::Hobbies
                };
                self.select_category(target);
            }
            Msg::FocusSearch => self.search_focused = true,
            Msg::BlurSearch => self.search_focused = false,
            Msg::SetSearch(text) => self.filters.search = text,
            Msg::ToggleTag(tag) => self.filters.toggle_tag(tag),
            Msg::ToggleTechnology(tech) => self.filters.toggle_technology(&tech),
            Msg::ToggleSort(key) => self.filters.toggle_sort(key),
            Msg::ResetFilters => self.filters.reset(),

            Msg::SelectProject(id) => {
                if self.visible.contains(&id) {
                    self.selection.select(id);
                    self.layout.open_detail();
                }
            }
            Msg::SelectNext => self.selection.select_next(&self.visible),
            Msg::SelectPrevious => self.selection.select_previous(&self.visible),
            Msg::SelectFirst => self.selection.select_first(&self.visible),
            Msg::SelectLast => self.selection.select_last(&self.visible),
            Msg::RequestHighlight(id) => {
                self.timers
                    .schedule(TimerEvent::ApplyHighlight(id), HIGHLIGHT_DELAY, now);
            }

            Msg::SetViewMode(mode) => self.layout.set_view_mode(mode),
            Msg::ToggleViewMode => {
                let mode = self.layout.view_mode().toggled();
                self.layout.set_view_mode(mode);
            }
            Msg::ToggleMaximize => self.layout.toggle_maximized(),
            Msg::ViewportResized(size) => self.layout.set_viewport(size),
            Msg::BeginResize => self.layout.begin_resize(),
            Msg::PointerMoved(point) => {
                self.layout.resize_to(point);
            }
            Msg::PointerReleased => self.layout.end_resize(),
            Msg::NudgeDetailWidth(steps) => self.layout.nudge_detail_width(steps),
            Msg::OpenFilters => self.layout.open_filters(),
            Msg::CloseFilters => self.layout.close_filters(),
            Msg::CloseDetail => self.layout.close_detail(),
            Msg::ToggleChips(list) => self.layout.toggle_expanded(list),

            Msg::Hover(project, pointer) => {
                if self.layout.view_mode() == ViewMode::Grid && !self.layout.is_resizing() {
                    self.hover.track(project, pointer);
                } else {
                    self.hover.clear();
                }
            }

            Msg::SelectImage(index) => {
                let count = self.image_count();
                self.detail.select_image(index, count);
            }
            Msg::CycleImage { forward } => {
                let count = self.image_count();
                self.detail.cycle_image(forward, count);
            }
            Msg::OpenLightbox => {
                let count = self.image_count();
                self.detail.open_lightbox(count);
            }
            Msg::CloseLightbox => self.detail.close_lightbox(),
            Msg::OpenLink(kind) => {
                command = self
                    .links()
                    .into_iter()
                    .find(|link| link.kind == kind)
                    .and_then(|link| link.url)
                    .map(Command::OpenUrl);
            }

            Msg::StartTour => {
                self.timers.cancel(TimerEvent::ShowTourWelcome);
                self.tour.start(self.store.as_mut());
            }
            Msg::SkipTour => self.tour.skip(self.store.as_mut()),
            Msg::TourNext => self.tour.next(),
            Msg::TourPrevious => self.tour.previous(),
            Msg::CloseTour => self.tour.close(),

            Msg::Layout(window) => {
                let screen = Region::from_size(self.layout.viewport());
                if self.visibility.observe(window, screen) == Some(ViewportEvent::Entered) {
                    tracing::debug!("browser became visible");
                    if !self.tour.has_been_seen() {
                        self.timers
                            .schedule(TimerEvent::ShowTourWelcome, TOUR_WELCOME_DELAY, now);
                    }
                }
            }
            Msg::Tick => {
                for event in self.timers.due(now) {
                    self.fire(event);
                }
            }
        }
        self.refresh();
        command
    }

    fn select_category(&mut self, category: SidebarCategory) {
        if self.filters.select_category(category) {
            tracing::debug!(category = %category, "category selected");
        }
        self.layout.close_filters();
    }

    fn fire(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::ShowTourWelcome => {
                self.tour.show_welcome();
            }
            TimerEvent::ApplyHighlight(id) => {
                let mut outcome = None;
                self.selection
                    .highlight(id, &self.catalog, &mut self.filters, |o| outcome = Some(o));
                if let Some(HighlightOutcome::Selected(_)) = outcome {
                    // Compact layouts only show the selection through the overlay.
                    self.layout.open_detail();
                }
                self.last_highlight = outcome;
            }
        }
    }

    /// Recompute derived state. The visible set and facets are only rebuilt
    /// when the filters changed since the last pass.
    fn refresh(&mut self) {
        if self.computed_for.as_ref() != Some(&self.filters) {
            self.visible = compute_visible(self.catalog.projects(), &self.filters)
                .iter()
                .map(|p| p.id)
                .collect();
            self.facets = available_facets(self.catalog.projects(), self.filters.is_hobbies_mode());
            self.theme = Theme::for_category(self.filters.category);
            self.computed_for = Some(self.filters.clone());
            tracing::debug!(visible = self.visible.len(), "visible set recomputed");
        }
        self.selection.reconcile(&self.visible);
        self.detail.sync(self.selection.selected());
        if self
            .hover
            .project()
            .is_some_and(|id| !self.visible.contains(&id))
        {
            self.hover.clear();
        }
    }

    fn image_count(&self) -> usize {
        self.selected().map(|p| p.image_urls.len()).unwrap_or(0)
    }

    fn links(&self) -> Vec<DetailLink> {
        self.selected().map(detail_links).unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // View model
    // ------------------------------------------------------------------

    pub fn view(&self) -> ViewModel<'_> {
        let visible: Vec<&Project> = self
            .visible
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .collect();
        let selected = self.selected();
        let metrics = *self.layout.metrics();
        let viewport = self.layout.viewport();

        let preview = self.hover.project().and_then(|id| {
            let project = self.catalog.get(id)?;
            let origin = self.hover.position(viewport, &metrics)?;
            let size = fit_preview(metrics.preview_size, viewport);
            Some(PreviewModel {
                project,
                region: Region::new(origin.x, origin.y, size.width, size.height),
            })
        });

        let detail = selected.map(|project| DetailModel {
            project,
            status: ProjectStatus::of(project),
            active_image: self.detail.active_image(),
            links: detail_links(project),
        });

        let lightbox = selected.and_then(|project| {
            let index = self.detail.lightbox()?;
            project.image_urls.get(index).map(String::as_str)
        });

        ViewModel {
            theme: self.theme,
            filters: &self.filters,
            search_focused: self.search_focused,
            facets: &self.facets,
            visible,
            selected_id: selected.map(|p| p.id),
            detail,
            lightbox,
            view_mode: self.layout.view_mode(),
            geometry: self.layout.geometry(),
            compact: self.layout.is_compact(),
            maximized: self.layout.is_maximized(),
            filters_open: self.layout.filters_open(),
            detail_open: self.layout.detail_open(),
            cursor: self.layout.cursor(),
            tags_expanded: self.layout.is_expanded(ChipList::Tags),
            techs_expanded: self.layout.is_expanded(ChipList::Technologies),
            preview,
            welcome_visible: self.tour.welcome_visible(),
            tour: &self.tour,
            metrics,
            viewport,
        }
    }
}

impl Drop for ProjectBrowser {
    fn drop(&mut self) {
        self.timers.clear();
    }
}

// ---------------------------------------------------------------------------
// ViewModel
// ---------------------------------------------------------------------------

pub struct PreviewModel<'a> {
    pub project: &'a Project,
    pub region: Region,
}

pub struct DetailModel<'a> {
    pub project: &'a Project,
    pub status: ProjectStatus,
    pub active_image: usize,
    pub links: Vec<DetailLink>,
}

/// Everything the renderer needs for one frame.
pub struct ViewModel<'a> {
    pub theme: Theme,
    pub filters: &'a FilterSelection,
    pub search_focused: bool,
    pub facets: &'a Facets,
    pub visible: Vec<&'a Project>,
    pub selected_id: Option<u32>,
    pub detail: Option<DetailModel<'a>>,
    /// Image shown enlarged, if any.
    pub lightbox: Option<&'a str>,
    pub view_mode: ViewMode,
    pub geometry: PaneGeometry,
    pub compact: bool,
    pub maximized: bool,
    pub filters_open: bool,
    pub detail_open: bool,
    pub cursor: CursorStyle,
    pub tags_expanded: bool,
    pub techs_expanded: bool,
    pub preview: Option<PreviewModel<'a>>,
    pub welcome_visible: bool,
    pub tour: &'a TourEngine,
    pub metrics: Metrics,
    pub viewport: Size,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::tour::{TourPhase, TOUR_SEEN_KEY};
    use std::time::Duration;

    fn browser() -> ProjectBrowser {
        let mut store = MemoryStore::default();
        store.set(TOUR_SEEN_KEY, true).unwrap();
        ProjectBrowser::new(
            Catalog::builtin().unwrap(),
            Metrics::TERMINAL,
            Size::new(160, 40),
            Box::new(store),
        )
    }

    #[test]
    fn test_initial_state() {
        let b = browser();
        assert_eq!(b.visible_ids().len(), 7);
        assert!(!b.visible_ids().contains(&4));
        assert!(!b.visible_ids().contains(&9));
        assert!(b.selected().is_some());
        assert_eq!(b.theme(), Theme::Default);
        assert_eq!(b.tour().phase(), TourPhase::Inactive);
    }

    #[test]
    fn test_hobbies_toggle_switches_theme_and_facets() {
        let mut b = browser();
        let now = Instant::now();
        b.update(Msg::ToggleHobbies, now);
        assert_eq!(b.filters().category, SidebarCategory::Hobbies);
        assert_eq!(b.theme(), Theme::Hobbies);
        assert_eq!(b.visible_ids(), &[9, 4]);
        assert!(b.view().facets.tags.contains(&ProjectTag::Hobby));
        let selected = b.selected().unwrap().id;
        assert!(b.visible_ids().contains(&selected));

        b.update(Msg::ToggleHobbies, now);
        assert_eq!(b.filters().category, SidebarCategory::AllProjects);
        assert_eq!(b.theme(), Theme::Default);
    }

    #[test]
    fn test_selection_follows_filters() {
        let mut b = browser();
        let now = Instant::now();
        b.update(Msg::SetSearch("zzz-no-match".into()), now);
        assert!(b.visible_ids().is_empty());
        assert!(b.selected().is_none());
        assert!(b.view().detail.is_none());

        b.update(Msg::SetSearch(String::new()), now);
        assert_eq!(b.selected().map(|p| p.id), b.visible_ids().first().copied());
    }

    #[test]
    fn test_select_project_ignores_hidden_ids() {
        let mut b = browser();
        let now = Instant::now();
        let before = b.selected().map(|p| p.id);
        b.update(Msg::SelectProject(9), now);
        assert_eq!(b.selected().map(|p| p.id), before);
    }

    #[test]
    fn test_highlight_is_delayed() {
        let mut b = browser();
        let now = Instant::now();
        b.update(Msg::SetSearch("nothing".into()), now);
        b.update(Msg::RequestHighlight(9), now);

        b.update(Msg::Tick, now + Duration::from_millis(100));
        assert!(b.last_highlight().is_none());

        b.update(Msg::Tick, now + Duration::from_millis(300));
        assert_eq!(b.last_highlight(), Some(HighlightOutcome::Selected(9)));
        assert_eq!(b.selected().map(|p| p.id), Some(9));
        assert_eq!(b.theme(), Theme::Hobbies);
    }

    #[test]
    fn test_highlight_unknown_project() {
        let mut b = browser();
        let now = Instant::now();
        b.update(Msg::RequestHighlight(404), now);
        b.update(Msg::Tick, now + HIGHLIGHT_DELAY);
        assert_eq!(b.last_highlight(), Some(HighlightOutcome::NotFound(404)));
    }

    #[test]
    fn test_welcome_shown_after_becoming_visible() {
        let mut b = ProjectBrowser::new(
            Catalog::builtin().unwrap(),
            Metrics::TERMINAL,
            Size::new(160, 40),
            Box::new(MemoryStore::default()),
        );
        let now = Instant::now();
        assert_eq!(b.tour().phase(), TourPhase::WelcomePending);
        assert!(!b.view().welcome_visible);

        b.update(Msg::Layout(Region::new(1, 1, 158, 38)), now);
        b.update(Msg::Tick, now + Duration::from_millis(50));
        assert!(!b.view().welcome_visible);
        b.update(Msg::Tick, now + TOUR_WELCOME_DELAY);
        assert!(b.view().welcome_visible);

        b.update(Msg::StartTour, now);
        assert_eq!(b.tour().phase(), TourPhase::Active(0));
        assert!(b.tour().has_been_seen());
    }

    #[test]
    fn test_hover_only_in_grid_view() {
        let mut b = browser();
        let now = Instant::now();
        let id = b.visible_ids()[0];
        b.update(Msg::Hover(Some(id), Point::new(10, 10)), now);
        let preview = b.view().preview.map(|p| p.region);
        assert_eq!(preview, Some(Region::new(12, 12, 34, 8)));

        b.update(Msg::SetViewMode(ViewMode::List), now);
        b.update(Msg::Hover(Some(id), Point::new(10, 10)), now);
        assert!(b.view().preview.is_none());
    }

    #[test]
    fn test_hover_cleared_when_item_filtered_out() {
        let mut b = browser();
        let now = Instant::now();
        let id = b.visible_ids()[0];
        b.update(Msg::Hover(Some(id), Point::new(10, 10)), now);
        b.update(Msg::SetSearch("zzz".into()), now);
        assert!(b.view().preview.is_none());
    }

    #[test]
    fn test_compact_select_opens_detail() {
        let mut b = browser();
        let now = Instant::now();
        b.update(Msg::ViewportResized(Size::new(80, 30)), now);
        b.update(Msg::OpenFilters, now);
        assert!(b.view().filters_open);
        b.update(Msg::SelectCategory(SidebarCategory::WebApps), now);
        assert!(!b.view().filters_open);

        let id = b.visible_ids()[0];
        b.update(Msg::SelectProject(id), now);
        assert!(b.view().detail_open);

        b.update(Msg::ViewportResized(Size::new(160, 40)), now);
        assert!(!b.view().detail_open);
    }

    #[test]
    fn test_open_link_command() {
        let mut b = browser();
        let now = Instant::now();
        let with_live = b
            .catalog()
            .projects()
            .iter()
            .find(|p| p.live_url.is_some() && !p.is_hobby())
            .map(|p| (p.id, p.live_url.clone()))
            .unwrap();
        b.update(Msg::SelectProject(with_live.0), now);
        assert_eq!(
            b.update(Msg::OpenLink(LinkKind::LiveDemo), now),
            with_live.1.map(Command::OpenUrl)
        );
        assert_eq!(b.update(Msg::OpenLink(LinkKind::Private), now), None);
    }

    #[test]
    fn test_gallery_resets_when_selection_changes() {
        let mut b = browser();
        let now = Instant::now();
        b.update(Msg::CycleImage { forward: true }, now);
        assert_eq!(b.view().detail.unwrap().active_image, 1);
        b.update(Msg::SelectNext, now);
        assert_eq!(b.view().detail.unwrap().active_image, 0);
    }

    #[test]
    fn test_resize_gesture_through_messages() {
        let mut b = browser();
        let now = Instant::now();
        let window = b.layout().window_region();
        b.update(Msg::BeginResize, now);
        assert_eq!(b.view().cursor, CursorStyle::ColumnResize);
        b.update(Msg::PointerMoved(Point::new(window.right() - 50, 5)), now);
        assert_eq!(b.layout().detail_width(), 50);
        b.update(Msg::PointerReleased, now);
        assert_eq!(b.view().cursor, CursorStyle::Default);
    }

    #[test]
    fn test_compact_highlight_opens_detail() {
        let mut b = browser();
        let now = Instant::now();
        b.update(Msg::ViewportResized(Size::new(80, 30)), now);
        assert!(!b.view().detail_open);

        b.update(Msg::RequestHighlight(3), now);
        b.update(Msg::Tick, now + HIGHLIGHT_DELAY);
        assert_eq!(b.selected().map(|p| p.id), Some(3));
        assert!(b.view().detail_open);

        // Unknown ids leave the overlay alone.
        b.update(Msg::CloseDetail, now);
        b.update(Msg::RequestHighlight(404), now);
        b.update(Msg::Tick, now + HIGHLIGHT_DELAY * 2);
        assert!(!b.view().detail_open);
    }

    #[test]
    fn test_drop_clears_pending_timers() {
        let mut b = browser();
        let now = Instant::now();
        b.update(Msg::RequestHighlight(1), now);
        let timers = b.timers().clone();
        assert_eq!(timers.next_deadline(now), Some(HIGHLIGHT_DELAY));

        drop(b);
        assert_eq!(timers.next_deadline(now), None);
        assert!(timers.due(now + Duration::from_secs(5)).is_empty());
    }
}
