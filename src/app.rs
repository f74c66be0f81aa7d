use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;

use crate::browser::{Command, Msg, ProjectBrowser};
use crate::detail::LinkKind;
use crate::filter::SidebarCategory;
use crate::geometry::{Point, Size};
use crate::layout::ChipList;
use crate::renderer::{self, HitTarget, Hitboxes};

/// Upper bound on how long the loop sleeps waiting for input.
const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Rows moved by PageUp / PageDown and Ctrl+U / Ctrl+D.
const PAGE_STEP: usize = 5;

/// What a keystroke asks the loop to do.
#[derive(Debug, PartialEq)]
pub enum KeyAction {
    Quit,
    Dispatch(Vec<Msg>),
}

/// Terminal front end: owns the browser and the last frame's hit map.
pub struct App {
    pub browser: ProjectBrowser,
    hitboxes: Hitboxes,
}

impl App {
    pub fn new(browser: ProjectBrowser) -> Self {
        Self {
            browser,
            hitboxes: Hitboxes::default(),
        }
    }

    /// Feed one message to the browser and carry out its command.
    pub fn dispatch(&mut self, msg: Msg, now: Instant) {
        if let Some(Command::OpenUrl(url)) = self.browser.update(msg, now) {
            tracing::info!(%url, "opening link");
            if let Err(e) = open::that(&url) {
                tracing::warn!(%url, error = %e, "failed to open link");
            }
        }
    }

    /// Run the main TUI event loop.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(out);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Cleanup: restore the terminal even if the loop failed.
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let size = terminal.size()?;
        self.dispatch(
            Msg::ViewportResized(Size::new(size.width as i32, size.height as i32)),
            Instant::now(),
        );

        loop {
            // --- Draw ---
            let mut hits = Hitboxes::default();
            let browser = &self.browser;
            terminal.draw(|frame| {
                hits = renderer::render_browser(frame, &browser.view());
            })?;
            self.hitboxes = hits;

            // --- Post-layout bookkeeping and timers ---
            let now = Instant::now();
            let window = self.browser.layout().window_region();
            self.dispatch(Msg::Layout(window), now);
            self.dispatch(Msg::Tick, now);

            let timeout = self
                .browser
                .timers()
                .next_deadline(now)
                .map_or(POLL_INTERVAL, |d| d.min(POLL_INTERVAL));

            // --- Handle input ---
            if !event::poll(timeout)? {
                continue;
            }
            let messages = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match self.handle_key(key) {
                    KeyAction::Quit => break,
                    KeyAction::Dispatch(messages) => messages,
                },
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                Event::Resize(width, height) => {
                    vec![Msg::ViewportResized(Size::new(width as i32, height as i32))]
                }
                _ => Vec::new(),
            };
            let now = Instant::now();
            for msg in messages {
                self.dispatch(msg, now);
            }
        }

        tracing::info!("quit");
        Ok(())
    }

    /// Map a keystroke to browser messages. Modal layers get the keys first:
    /// search input, then the welcome modal, the tour, the lightbox and the
    /// compact overlays.
    pub fn handle_key(&self, key: KeyEvent) -> KeyAction {
        let b = &self.browser;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Ctrl+C always quits, regardless of mode.
        if ctrl && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        let msgs = if b.search_focused() {
            let query = &b.filters().search;
            match key.code {
                KeyCode::Esc => vec![Msg::SetSearch(String::new()), Msg::BlurSearch],
                KeyCode::Enter => vec![Msg::BlurSearch],
                KeyCode::Backspace => {
                    let mut query = query.clone();
                    query.pop();
                    vec![Msg::SetSearch(query)]
                }
                KeyCode::Char(c) => vec![Msg::SetSearch(format!("{}{}", query, c))],
                KeyCode::Down => vec![Msg::SelectNext],
                KeyCode::Up => vec![Msg::SelectPrevious],
                _ => Vec::new(),
            }
        } else if b.tour().welcome_visible() {
            match key.code {
                KeyCode::Enter | KeyCode::Char('y') => vec![Msg::StartTour],
                KeyCode::Esc | KeyCode::Char('n') => vec![Msg::SkipTour],
                KeyCode::Char('q') => return KeyAction::Quit,
                _ => Vec::new(),
            }
        } else if b.tour().is_active() {
            match key.code {
                KeyCode::Right | KeyCode::Enter | KeyCode::Char('l') => vec![Msg::TourNext],
                KeyCode::Left | KeyCode::Char('h') => vec![Msg::TourPrevious],
                KeyCode::Esc => vec![Msg::CloseTour],
                KeyCode::Char('q') => return KeyAction::Quit,
                _ => Vec::new(),
            }
        } else if b.lightbox_open() {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => vec![Msg::CloseLightbox],
                KeyCode::Right | KeyCode::Char('l') => vec![Msg::CycleImage { forward: true }],
                KeyCode::Left | KeyCode::Char('h') => vec![Msg::CycleImage { forward: false }],
                KeyCode::Char('q') => return KeyAction::Quit,
                _ => Vec::new(),
            }
        } else {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') => return KeyAction::Quit,
                KeyCode::Esc if b.layout().filters_open() => vec![Msg::CloseFilters],
                KeyCode::Esc if b.layout().detail_open() => vec![Msg::CloseDetail],
                KeyCode::Esc => vec![Msg::Hover(None, Point::default())],
                KeyCode::Char('/') => vec![Msg::FocusSearch],

                // --- Selection ---
                KeyCode::Char('j') | KeyCode::Down => vec![Msg::SelectNext],
                KeyCode::Char('k') | KeyCode::Up => vec![Msg::SelectPrevious],
                KeyCode::Char('d') if ctrl => vec![Msg::SelectNext; PAGE_STEP],
                KeyCode::Char('u') if ctrl => vec![Msg::SelectPrevious; PAGE_STEP],
                KeyCode::PageDown => vec![Msg::SelectNext; PAGE_STEP],
                KeyCode::PageUp => vec![Msg::SelectPrevious; PAGE_STEP],
                KeyCode::Char('g') | KeyCode::Home => vec![Msg::SelectFirst],
                KeyCode::Char('G') | KeyCode::End => vec![Msg::SelectLast],
                KeyCode::Enter if b.layout().is_compact() => b
                    .selected()
                    .map(|p| vec![Msg::SelectProject(p.id)])
                    .unwrap_or_default(),
                KeyCode::Enter => vec![Msg::OpenLightbox],

                // --- Filters ---
                KeyCode::Char(c @ '1'..='6') => {
                    let index = c as usize - '1' as usize;
                    vec![Msg::SelectCategory(SidebarCategory::FAVORITES[index])]
                }
                KeyCode::Char('h') => vec![Msg::ToggleHobbies],
                KeyCode::Char('s') => vec![Msg::ToggleSort(b.filters().sort_key.next())],
                KeyCode::Char('S') => vec![Msg::ToggleSort(b.filters().sort_key)],
                KeyCode::Char('x') => vec![Msg::ResetFilters],
                KeyCode::Char('f') => vec![Msg::OpenFilters],
                KeyCode::Char('t') => vec![Msg::ToggleChips(ChipList::Tags)],
                KeyCode::Char('T') => vec![Msg::ToggleChips(ChipList::Technologies)],

                // --- Layout ---
                KeyCode::Char('v') => vec![Msg::ToggleViewMode],
                KeyCode::Char('m') => vec![Msg::ToggleMaximize],
                KeyCode::Char('[') => vec![Msg::NudgeDetailWidth(1)],
                KeyCode::Char(']') => vec![Msg::NudgeDetailWidth(-1)],

                // --- Detail ---
                KeyCode::Right => vec![Msg::CycleImage { forward: true }],
                KeyCode::Left => vec![Msg::CycleImage { forward: false }],
                KeyCode::Char('o') => vec![Msg::OpenLink(LinkKind::LiveDemo)],
                KeyCode::Char('c') => vec![Msg::OpenLink(LinkKind::SourceCode)],

                KeyCode::Char('?') => vec![Msg::StartTour],
                _ => Vec::new(),
            }
        };
        KeyAction::Dispatch(msgs)
    }

    /// Map a mouse event to browser messages using the last frame's hitboxes.
    pub fn handle_mouse(&self, mouse: MouseEvent) -> Vec<Msg> {
        let point = Point::new(mouse.column as i32, mouse.row as i32);

        // A drag in progress captures the pointer until release.
        if !self.browser.layout().text_selection_enabled() {
            return match mouse.kind {
                MouseEventKind::Drag(_) | MouseEventKind::Moved => vec![Msg::PointerMoved(point)],
                MouseEventKind::Up(_) => vec![Msg::PointerReleased],
                _ => Vec::new(),
            };
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let target = self.hitboxes.hit(point);
                let mut msgs = Vec::new();
                if self.browser.search_focused() && target != Some(&HitTarget::SearchBar) {
                    msgs.push(Msg::BlurSearch);
                }
                if let Some(msg) = target.and_then(click_message) {
                    msgs.push(msg);
                }
                msgs
            }
            MouseEventKind::Moved => {
                let project = match self.hitboxes.hit(point) {
                    Some(HitTarget::Project(id)) => Some(*id),
                    _ => None,
                };
                vec![Msg::Hover(project, point)]
            }
            MouseEventKind::ScrollDown => vec![Msg::SelectNext],
            MouseEventKind::ScrollUp => vec![Msg::SelectPrevious],
            _ => Vec::new(),
        }
    }
}

fn click_message(target: &HitTarget) -> Option<Msg> {
    let msg = match target {
        HitTarget::Maximize => Msg::ToggleMaximize,
        HitTarget::HelpButton => Msg::StartTour,
        HitTarget::Category(category) => Msg::SelectCategory(*category),
        HitTarget::HobbiesToggle => Msg::ToggleHobbies,
        HitTarget::Tag(tag) => Msg::ToggleTag(*tag),
        HitTarget::Technology(tech) => Msg::ToggleTechnology(tech.clone()),
        HitTarget::ShowMore(list) => Msg::ToggleChips(*list),
        HitTarget::OpenFilters => Msg::OpenFilters,
        HitTarget::CloseFilters => Msg::CloseFilters,
        HitTarget::SearchBar => Msg::FocusSearch,
        HitTarget::ViewMode(mode) => Msg::SetViewMode(*mode),
        HitTarget::SortHeader(key) => Msg::ToggleSort(*key),
        HitTarget::Project(id) => Msg::SelectProject(*id),
        HitTarget::ResizeHandle => Msg::BeginResize,
        HitTarget::CloseDetail => Msg::CloseDetail,
        HitTarget::MainImage => Msg::OpenLightbox,
        HitTarget::Thumbnail(index) => Msg::SelectImage(*index),
        HitTarget::Link(kind) => Msg::OpenLink(*kind),
        HitTarget::LightboxBackdrop => Msg::CloseLightbox,
        HitTarget::WelcomeStart => Msg::StartTour,
        HitTarget::WelcomeSkip => Msg::SkipTour,
        HitTarget::TourPrevious => Msg::TourPrevious,
        HitTarget::TourNext => Msg::TourNext,
        HitTarget::TourClose | HitTarget::TourBackdrop => Msg::CloseTour,
        HitTarget::Backdrop => return None,
    };
    Some(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::geometry::Metrics;
    use crate::layout::ViewMode;
    use crate::store::{FlagStore, MemoryStore};
    use crate::tour::TOUR_SEEN_KEY;
    use ratatui::layout::Rect;

    fn app() -> App {
        let mut store = MemoryStore::default();
        store.set(TOUR_SEEN_KEY, true).unwrap();
        App::new(ProjectBrowser::new(
            Catalog::builtin().unwrap(),
            Metrics::TERMINAL,
            Size::new(160, 40),
            Box::new(store),
        ))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_quit_keys() {
        let app = app();
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_search_mode_captures_keys() {
        let mut app = app();
        let now = Instant::now();
        app.dispatch(Msg::FocusSearch, now);
        app.dispatch(Msg::SetSearch("we".into()), now);

        assert_eq!(
            app.handle_key(key(KeyCode::Char('q'))),
            KeyAction::Dispatch(vec![Msg::SetSearch("weq".into())])
        );
        assert_eq!(
            app.handle_key(key(KeyCode::Backspace)),
            KeyAction::Dispatch(vec![Msg::SetSearch("w".into())])
        );
        assert_eq!(
            app.handle_key(key(KeyCode::Esc)),
            KeyAction::Dispatch(vec![Msg::SetSearch(String::new()), Msg::BlurSearch])
        );
    }

    #[test]
    fn test_navigation_keys() {
        let app = app();
        assert_eq!(
            app.handle_key(key(KeyCode::Char('j'))),
            KeyAction::Dispatch(vec![Msg::SelectNext])
        );
        assert_eq!(
            app.handle_key(key(KeyCode::Char('3'))),
            KeyAction::Dispatch(vec![Msg::SelectCategory(SidebarCategory::WebApps)])
        );
        assert_eq!(
            app.handle_key(key(KeyCode::PageDown)),
            KeyAction::Dispatch(vec![Msg::SelectNext; PAGE_STEP])
        );
    }

    #[test]
    fn test_tour_keys_take_priority() {
        let mut app = app();
        app.dispatch(Msg::StartTour, Instant::now());
        assert_eq!(
            app.handle_key(key(KeyCode::Right)),
            KeyAction::Dispatch(vec![Msg::TourNext])
        );
        assert_eq!(
            app.handle_key(key(KeyCode::Esc)),
            KeyAction::Dispatch(vec![Msg::CloseTour])
        );
    }

    #[test]
    fn test_click_routes_through_hitboxes() {
        let mut app = app();
        app.hitboxes.push(Rect::new(10, 5, 20, 4), HitTarget::Project(4));
        app.hitboxes
            .push(Rect::new(40, 0, 6, 1), HitTarget::ViewMode(ViewMode::List));

        assert_eq!(
            app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 12, 6)),
            vec![Msg::SelectProject(4)]
        );
        assert_eq!(
            app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 41, 0)),
            vec![Msg::SetViewMode(ViewMode::List)]
        );
        assert!(app
            .handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 100, 30))
            .is_empty());
    }

    #[test]
    fn test_hover_reports_project_under_pointer() {
        let mut app = app();
        app.hitboxes.push(Rect::new(10, 5, 20, 4), HitTarget::Project(7));
        assert_eq!(
            app.handle_mouse(mouse(MouseEventKind::Moved, 15, 6)),
            vec![Msg::Hover(Some(7), Point::new(15, 6))]
        );
        assert_eq!(
            app.handle_mouse(mouse(MouseEventKind::Moved, 50, 6)),
            vec![Msg::Hover(None, Point::new(50, 6))]
        );
    }

    #[test]
    fn test_drag_captures_pointer_while_resizing() {
        let mut app = app();
        app.dispatch(Msg::BeginResize, Instant::now());
        assert!(app.browser.layout().is_resizing());
        assert_eq!(
            app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 90, 10)),
            vec![Msg::PointerMoved(Point::new(90, 10))]
        );
        assert_eq!(
            app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 90, 10)),
            vec![Msg::PointerReleased]
        );
    }

    #[test]
    fn test_modal_backdrops() {
        let mut app = app();
        app.hitboxes.push(Rect::new(0, 0, 160, 40), HitTarget::Backdrop);
        app.hitboxes.push(Rect::new(0, 0, 160, 5), HitTarget::TourBackdrop);
        assert_eq!(
            app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 3, 2)),
            vec![Msg::CloseTour]
        );
        assert!(app
            .handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 3, 20))
            .is_empty());
    }

    #[test]
    fn test_click_outside_search_blurs_it() {
        let mut app = app();
        app.dispatch(Msg::FocusSearch, Instant::now());
        app.hitboxes.push(Rect::new(0, 0, 5, 1), HitTarget::Maximize);
        assert_eq!(
            app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 1, 0)),
            vec![Msg::BlurSearch, Msg::ToggleMaximize]
        );
    }
}
