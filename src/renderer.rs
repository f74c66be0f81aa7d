//! Draws a `ViewModel` into a ratatui `Frame`.
//!
//! Nothing here holds state between frames. Each clickable element is
//! recorded in the returned `Hitboxes`; the event loop routes mouse input
//! through it and the tour resolves its targets against it.

use std::collections::HashMap;

use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::browser::{DetailModel, PreviewModel, ViewModel};
use crate::catalog::{Project, ProjectTag};
use crate::detail::{format_date, format_end_date, item_count_label, LinkKind};
use crate::filter::{SidebarCategory, SortKey};
use crate::geometry::{Point, Region};
use crate::layout::{visible_chip_rows, wrap_chips, ChipList, CursorStyle, ViewMode};
use crate::tour::{TargetResolver, TourOverlay, TourTarget};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const CARD_MIN_WIDTH: u16 = 26;
const CARD_HEIGHT: u16 = 5;
const CATEGORY_WIDTH: u16 = 12;
const STARTED_WIDTH: u16 = 14;
const WELCOME_WIDTH: u16 = 52;
const WELCOME_HEIGHT: u16 = 9;

// ---------------------------------------------------------------------------
// Hitboxes
// ---------------------------------------------------------------------------

/// Something the user can click.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Maximize,
    HelpButton,
    Category(SidebarCategory),
    HobbiesToggle,
    Tag(ProjectTag),
    Technology(String),
    ShowMore(ChipList),
    OpenFilters,
    CloseFilters,
    SearchBar,
    ViewMode(ViewMode),
    SortHeader(SortKey),
    Project(u32),
    ResizeHandle,
    CloseDetail,
    MainImage,
    Thumbnail(usize),
    Link(LinkKind),
    LightboxBackdrop,
    WelcomeStart,
    WelcomeSkip,
    TourPrevious,
    TourNext,
    TourClose,
    TourBackdrop,
    /// Swallows clicks under a modal.
    Backdrop,
}

/// Screen regions of the last frame's clickable elements, topmost last,
/// plus the bounds of every tour target that was drawn.
#[derive(Debug, Default)]
pub struct Hitboxes {
    entries: Vec<(Region, HitTarget)>,
    anchors: HashMap<TourTarget, Region>,
}

impl Hitboxes {
    pub fn push(&mut self, rect: Rect, target: HitTarget) {
        if rect.width > 0 && rect.height > 0 {
            self.entries.push((to_region(rect), target));
        }
    }

    pub fn anchor(&mut self, target: TourTarget, rect: Rect) {
        if rect.width > 0 && rect.height > 0 {
            self.anchors.insert(target, to_region(rect));
        }
    }

    /// The topmost target under `point`.
    pub fn hit(&self, point: Point) -> Option<&HitTarget> {
        self.entries
            .iter()
            .rev()
            .find(|(region, _)| region.contains(point))
            .map(|(_, target)| target)
    }
}

impl TargetResolver for Hitboxes {
    fn resolve(&self, target: TourTarget) -> Option<Region> {
        self.anchors.get(&target).copied()
    }
}

// ---------------------------------------------------------------------------
// Color mapping
// ---------------------------------------------------------------------------

/// Map a color name (as returned by helpers such as `TagDetails::color` /
/// `Theme::accent`) to a Ratatui `Color`.
pub fn color_from_name(name: &str) -> Color {
    match name {
        "dim" | "gray" => Color::DarkGray,
        "cyan" => Color::Cyan,
        "lightcyan" => Color::LightCyan,
        "yellow" => Color::Yellow,
        "red" => Color::Red,
        "green" => Color::Green,
        "lightgreen" => Color::LightGreen,
        "blue" => Color::Blue,
        "lightblue" => Color::LightBlue,
        "magenta" => Color::Magenta,
        "lightmagenta" => Color::LightMagenta,
        "white" => Color::White,
        _ => Color::Reset,
    }
}

// ---------------------------------------------------------------------------
// Geometry and text helpers
// ---------------------------------------------------------------------------

fn to_region(rect: Rect) -> Region {
    Region::new(
        rect.x as i32,
        rect.y as i32,
        rect.width as i32,
        rect.height as i32,
    )
}

/// Convert a layout region to a terminal rect, clipped to `bounds`.
fn to_rect(region: Region, bounds: Rect) -> Rect {
    let max = u16::MAX as i32;
    let x = region.x.clamp(0, max);
    let y = region.y.clamp(0, max);
    let right = region.right().clamp(x, max);
    let bottom = region.bottom().clamp(y, max);
    Rect::new(x as u16, y as u16, (right - x) as u16, (bottom - y) as u16).intersection(bounds)
}

/// One-row rect at `row` inside `area`, or `None` past its bottom.
fn row_rect(area: Rect, row: u16) -> Option<Rect> {
    if row >= area.height {
        return None;
    }
    Some(Rect::new(area.x, area.y + row, area.width, 1))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Cut `text` to `width` columns, ending in an ellipsis when shortened.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Greedy word wrap to `width` columns. Words longer than a line are
/// truncated.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = truncate(word, width);
        } else if current.width() + 1 + word.width() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = truncate(word, width);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn button(label: &str) -> String {
    format!("[ {} ]", label)
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn draw_line(frame: &mut Frame, area: Rect, row: u16, line: Line) {
    if let Some(rect) = row_rect(area, row) {
        frame.render_widget(Paragraph::new(line), rect);
    }
}

/// Dim every cell of `area` outside `hole`.
fn dim_outside(frame: &mut Frame, area: Rect, hole: Option<Rect>) {
    let buf = frame.buffer_mut();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if hole.is_some_and(|h| h.contains(Position::new(x, y))) {
                continue;
            }
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_fg(Color::DarkGray);
                cell.modifier.insert(Modifier::DIM);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Chips
// ---------------------------------------------------------------------------

struct Chip {
    label: String,
    color: Color,
    active: bool,
    target: Option<HitTarget>,
}

impl Chip {
    fn tag(tag: ProjectTag, active: bool, clickable: bool) -> Self {
        let details = tag.details();
        Self {
            label: details.name.to_string(),
            color: color_from_name(details.color),
            active,
            target: clickable.then_some(HitTarget::Tag(tag)),
        }
    }

    fn technology(tech: &str, accent: Color, active: bool, clickable: bool) -> Self {
        Self {
            label: tech.to_string(),
            color: accent,
            active,
            target: clickable.then(|| HitTarget::Technology(tech.to_string())),
        }
    }

    fn text(&self) -> String {
        format!(" {} ", self.label)
    }

    fn style(&self) -> Style {
        if self.active {
            Style::default()
                .fg(Color::Black)
                .bg(self.color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.color)
        }
    }
}

/// Collapse state of a chip list that offers "Show More".
struct ChipToggle {
    list: ChipList,
    expanded: bool,
    collapsed_rows: usize,
}

/// Draw wrapped chips starting at `row` of `area`, stopping before `limit`.
/// Returns the first free row.
fn render_chips(
    frame: &mut Frame,
    area: Rect,
    mut row: u16,
    limit: u16,
    chips: &[Chip],
    toggle: Option<ChipToggle>,
    hits: &mut Hitboxes,
) -> u16 {
    let widths: Vec<usize> = chips.iter().map(|c| c.text().width()).collect();
    let rows = wrap_chips(&widths, area.width as usize, 1);
    let (shown, needs_toggle) = match &toggle {
        Some(t) => visible_chip_rows(rows.len(), t.expanded, t.collapsed_rows),
        None => (rows.len(), false),
    };

    for range in rows.into_iter().take(shown) {
        if row >= limit {
            return row;
        }
        let mut spans = Vec::new();
        let mut x = area.x;
        for chip in &chips[range] {
            let text = chip.text();
            let w = text.width() as u16;
            if let Some(target) = &chip.target {
                hits.push(
                    Rect::new(x, area.y + row, w, 1).intersection(area),
                    target.clone(),
                );
            }
            spans.push(Span::styled(text, chip.style()));
            spans.push(Span::raw(" "));
            x = x.saturating_add(w + 1);
        }
        draw_line(frame, area, row, Line::from(spans));
        row += 1;
    }

    if let (Some(t), true) = (toggle, needs_toggle) {
        if row < limit {
            let label = if t.expanded { "Show Less" } else { "Show More" };
            if let Some(rect) = row_rect(area, row) {
                let rect = Rect::new(rect.x, rect.y, (label.width() as u16).min(rect.width), 1);
                hits.push(rect, HitTarget::ShowMore(t.list));
            }
            draw_line(
                frame,
                area,
                row,
                Line::from(Span::styled(
                    label,
                    Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED),
                )),
            );
            row += 1;
        }
    }
    row
}

// ---------------------------------------------------------------------------
// Title bar
// ---------------------------------------------------------------------------

fn render_title_bar(
    frame: &mut Frame,
    area: Rect,
    vm: &ViewModel,
    accent: Color,
    hits: &mut Hitboxes,
) {
    let title = if vm.filters.is_hobbies_mode() {
        "Hobbies"
    } else {
        "Projects"
    };
    let lights = Line::from(vec![
        Span::styled(" ● ", Style::default().fg(Color::Red)),
        Span::styled("● ", Style::default().fg(Color::Yellow)),
        Span::styled(
            if vm.maximized { "◉ " } else { "● " },
            Style::default().fg(Color::Green),
        ),
    ]);
    frame.render_widget(Paragraph::new(lights), area);
    hits.push(Rect::new(area.x + 5, area.y, 1, 1).intersection(area), HitTarget::Maximize);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            title,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        area,
    );

    let help = "[?] Tour ";
    let w = help.width() as u16;
    if area.width > w {
        let rect = Rect::new(area.right() - w, area.y, w, 1).intersection(area);
        if !rect.is_empty() {
            let help = Span::styled(help, Style::default().fg(accent));
            frame.render_widget(Paragraph::new(help), rect);
            hits.push(rect, HitTarget::HelpButton);
        }
    }
}

// ---------------------------------------------------------------------------
// Sidebar
// ---------------------------------------------------------------------------

fn render_sidebar(
    frame: &mut Frame,
    area: Rect,
    vm: &ViewModel,
    accent: Color,
    hits: &mut Hitboxes,
    overlay: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(dim())
        .title(Span::styled(
            if overlay { " Filters " } else { " Favorites " },
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let close = Rect::new(area.right().saturating_sub(4), area.y, 3, 1).intersection(area);
    if overlay && area.width > 4 && !close.is_empty() {
        let label = Span::styled("[✕]", Style::default().fg(Color::White));
        frame.render_widget(Paragraph::new(label), close);
        hits.push(close, HitTarget::CloseFilters);
    }

    // Hobbies toggle is pinned to the last row.
    let limit = inner.height.saturating_sub(1);

    // ----- Categories -----
    let mut row: u16 = 0;
    for category in SidebarCategory::FAVORITES {
        if row >= limit {
            break;
        }
        let selected = vm.filters.category == category;
        let style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let text = format!(" {} ", category.label());
        draw_line(frame, inner, row, Line::from(Span::styled(text, style)));
        if let Some(rect) = row_rect(inner, row) {
            hits.push(rect, HitTarget::Category(category));
        }
        row += 1;
    }
    hits.anchor(
        TourTarget::SidebarNav,
        Rect::new(inner.x, inner.y, inner.width, row),
    );

    // ----- Tags -----
    row += 1;
    let tags_top = row;
    if row < limit {
        draw_line(
            frame,
            inner,
            row,
            Line::from(Span::styled("Tags", dim().add_modifier(Modifier::BOLD))),
        );
        row += 1;
        let chips: Vec<Chip> = vm
            .facets
            .tags
            .iter()
            .map(|tag| Chip::tag(*tag, vm.filters.tags.contains(tag), true))
            .collect();
        row = render_chips(
            frame,
            inner,
            row,
            limit,
            &chips,
            Some(ChipToggle {
                list: ChipList::Tags,
                expanded: vm.tags_expanded,
                collapsed_rows: vm.metrics.collapsed_chip_rows,
            }),
            hits,
        );
        hits.anchor(
            TourTarget::SidebarTags,
            Rect::new(inner.x, inner.y + tags_top, inner.width, row - tags_top),
        );
    }

    // ----- Technologies -----
    row += 1;
    let techs_top = row;
    if row < limit {
        draw_line(
            frame,
            inner,
            row,
            Line::from(Span::styled("Technologies", dim().add_modifier(Modifier::BOLD))),
        );
        row += 1;
        let chips: Vec<Chip> = vm
            .facets
            .technologies
            .iter()
            .map(|tech| {
                let active = vm.filters.technologies.contains(tech);
                Chip::technology(tech, accent, active, true)
            })
            .collect();
        row = render_chips(
            frame,
            inner,
            row,
            limit,
            &chips,
            Some(ChipToggle {
                list: ChipList::Technologies,
                expanded: vm.techs_expanded,
                collapsed_rows: vm.metrics.collapsed_chip_rows,
            }),
            hits,
        );
        hits.anchor(
            TourTarget::SidebarTechs,
            Rect::new(inner.x, inner.y + techs_top, inner.width, row - techs_top),
        );
    }

    // ----- Hobbies toggle -----
    if let Some(rect) = row_rect(inner, limit) {
        let active = vm.filters.is_hobbies_mode();
        let style = if active {
            Style::default()
                .fg(Color::Black)
                .bg(accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(accent)
        };
        frame.render_widget(Paragraph::new(Span::styled(" ★ Hobbies ", style)), rect);
        hits.push(rect, HitTarget::HobbiesToggle);
        hits.anchor(TourTarget::HobbiesToggle, rect);
    }
}

// ---------------------------------------------------------------------------
// Main pane: toolbar, grid / list, footer
// ---------------------------------------------------------------------------

fn render_main(frame: &mut Frame, area: Rect, vm: &ViewModel, accent: Color, hits: &mut Hitboxes) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(dim())
        .title(Span::styled(
            format!(" {} ", vm.filters.category.label()),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 3 {
        return;
    }

    render_toolbar(frame, Rect::new(inner.x, inner.y, inner.width, 1), vm, accent, hits);

    let content = Rect::new(inner.x, inner.y + 2, inner.width, inner.height.saturating_sub(3));
    hits.anchor(TourTarget::ProjectGrid, content);

    if vm.visible.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("No projects found.", dim())))
                .alignment(Alignment::Center),
            centered(content, content.width, 1),
        );
    } else {
        match vm.view_mode {
            ViewMode::Grid => render_grid(frame, content, vm, accent, hits),
            ViewMode::List => render_list(frame, content, vm, accent, hits),
        }
    }

    let footer = Rect::new(inner.x, inner.bottom() - 1, inner.width, 1);
    render_footer(frame, footer, vm);
}

fn render_toolbar(
    frame: &mut Frame,
    area: Rect,
    vm: &ViewModel,
    accent: Color,
    hits: &mut Hitboxes,
) {
    let mut x = area.x;

    if vm.compact {
        let label = "≡ Filters ";
        let w = (label.width() as u16).min(area.width);
        let rect = Rect::new(x, area.y, w, 1);
        frame.render_widget(Paragraph::new(Span::styled(label, Style::default().fg(accent))), rect);
        hits.push(rect, HitTarget::OpenFilters);
        x += w;
    }

    // View switcher on the right.
    let grid_label = " Grid ";
    let list_label = " List ";
    let switcher_w = (grid_label.width() + list_label.width() + 1) as u16;
    let switcher_x = area.right().saturating_sub(switcher_w).max(x);
    let mode_style = |mode: ViewMode| {
        if vm.view_mode == mode {
            Style::default()
                .fg(Color::Black)
                .bg(accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    };
    let switcher = Rect::new(switcher_x, area.y, area.right().saturating_sub(switcher_x), 1);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(grid_label, mode_style(ViewMode::Grid)),
            Span::raw(" "),
            Span::styled(list_label, mode_style(ViewMode::List)),
        ])),
        switcher,
    );
    let grid_w = grid_label.width() as u16;
    hits.push(
        Rect::new(switcher_x, area.y, grid_w, 1).intersection(area),
        HitTarget::ViewMode(ViewMode::Grid),
    );
    hits.push(
        Rect::new(switcher_x + grid_w + 1, area.y, list_label.width() as u16, 1).intersection(area),
        HitTarget::ViewMode(ViewMode::List),
    );
    hits.anchor(TourTarget::ViewSwitcher, switcher);

    // Search bar fills the rest.
    let search_w = switcher_x.saturating_sub(x + 1);
    let search = Rect::new(x, area.y, search_w, 1);
    let mut spans = vec![Span::styled("/ ", Style::default().fg(accent))];
    if vm.filters.search.is_empty() && !vm.search_focused {
        spans.push(Span::styled("Search projects...", dim()));
    } else {
        let room = (search_w as usize).saturating_sub(3);
        spans.push(Span::styled(
            truncate(&vm.filters.search, room),
            Style::default().fg(Color::White),
        ));
        if vm.search_focused {
            spans.push(Span::styled(
                "_",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::SLOW_BLINK),
            ));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), search);
    hits.push(search, HitTarget::SearchBar);
    hits.anchor(TourTarget::SearchBar, search);
}

/// First row to draw so that `selected_row` is on screen.
fn scroll_offset(selected_row: usize, rows_visible: usize) -> usize {
    if rows_visible == 0 {
        return 0;
    }
    selected_row.saturating_sub(rows_visible - 1)
}

fn selected_index(vm: &ViewModel) -> usize {
    vm.selected_id
        .and_then(|id| vm.visible.iter().position(|p| p.id == id))
        .unwrap_or(0)
}

fn render_grid(frame: &mut Frame, area: Rect, vm: &ViewModel, accent: Color, hits: &mut Hitboxes) {
    let columns = (area.width / CARD_MIN_WIDTH).max(1);
    let card_w = area.width / columns;
    let rows_visible = (area.height / CARD_HEIGHT).max(1) as usize;
    let offset = scroll_offset(selected_index(vm) / columns as usize, rows_visible);

    for (i, project) in vm.visible.iter().enumerate() {
        let row = i / columns as usize;
        if row < offset || row >= offset + rows_visible {
            continue;
        }
        let col = (i % columns as usize) as u16;
        let rect = Rect::new(
            area.x + col * card_w,
            area.y + (row - offset) as u16 * CARD_HEIGHT,
            card_w,
            CARD_HEIGHT,
        )
        .intersection(area);
        render_card(frame, rect, project, vm.selected_id == Some(project.id), accent);
        hits.push(rect, HitTarget::Project(project.id));
    }
}

fn render_card(frame: &mut Frame, area: Rect, project: &Project, selected: bool, accent: Color) {
    let border = if selected {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        dim()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let width = inner.width as usize;

    let name_style = if selected {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    draw_line(
        frame,
        inner,
        0,
        Line::from(Span::styled(truncate(&project.name, width), name_style)),
    );

    let mut meta = vec![Span::styled(
        format!("{}  {}", project.category, project.date_started.format("%Y")),
        dim(),
    )];
    if project.is_in_progress() {
        meta.push(Span::styled("  ● In Progress", Style::default().fg(Color::Blue)));
    }
    draw_line(frame, inner, 1, Line::from(meta));

    let tags: Vec<&str> = project.tags.iter().map(|t| t.details().name).collect();
    draw_line(
        frame,
        inner,
        2,
        Line::from(Span::styled(truncate(&tags.join(", "), width), dim())),
    );
}

fn render_list(frame: &mut Frame, area: Rect, vm: &ViewModel, accent: Color, hits: &mut Hitboxes) {
    // Column widths: name takes what is left.
    let category_w = CATEGORY_WIDTH.min(area.width / 3);
    let started_w = STARTED_WIDTH.min(area.width / 3);
    let name_w = area.width.saturating_sub(category_w + started_w);

    // ----- Sortable headers -----
    let header_style = dim().add_modifier(Modifier::UNDERLINED);
    let mut x = area.x;
    for (key, w) in SortKey::ALL.into_iter().zip([name_w, category_w, started_w]) {
        let mut label = key.label().to_string();
        let mut style = header_style;
        if vm.filters.sort_key == key {
            label = format!("{} {}", label, vm.filters.sort_direction.arrow());
            style = style.fg(accent).add_modifier(Modifier::BOLD);
        }
        let rect = Rect::new(x, area.y, w, 1).intersection(area);
        frame.render_widget(
            Paragraph::new(Span::styled(truncate(&label, w as usize), style)),
            rect,
        );
        hits.push(rect, HitTarget::SortHeader(key));
        x += w;
    }

    // ----- Rows -----
    let body = Rect::new(area.x, area.y + 1, area.width, area.height.saturating_sub(1));
    let rows_visible = body.height as usize;
    let offset = scroll_offset(selected_index(vm), rows_visible);

    for (i, project) in vm.visible.iter().enumerate().skip(offset).take(rows_visible) {
        let row = (i - offset) as u16;
        let selected = vm.selected_id == Some(project.id);
        let style = if selected {
            Style::default().fg(Color::Black).bg(accent)
        } else {
            Style::default().fg(Color::White)
        };
        let line = Line::from(vec![
            Span::styled(
                format!(
                    "{:<width$}",
                    truncate(&project.name, name_w.saturating_sub(1) as usize),
                    width = name_w as usize
                ),
                style.add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{:<width$}", project.category.as_str(), width = category_w as usize),
                style,
            ),
            Span::styled(
                format!(
                    "{:<width$}",
                    format_date(project.date_started),
                    width = started_w as usize
                ),
                style,
            ),
        ]);
        draw_line(frame, body, row, line);
        if let Some(rect) = row_rect(body, row) {
            hits.push(rect, HitTarget::Project(project.id));
        }
    }
}

fn render_footer(frame: &mut Frame, area: Rect, vm: &ViewModel) {
    let mut hints = String::from(" / search  v view  [ ] resize  ? tour  q quit");
    if vm.filters.has_active_filters() {
        hints.push_str("  x reset");
    }
    let count = item_count_label(vm.visible.len());
    let room = (area.width as usize).saturating_sub(count.width() + 1);
    frame.render_widget(Paragraph::new(Span::styled(truncate(&hints, room), dim())), area);
    frame.render_widget(
        Paragraph::new(Span::styled(count, Style::default().fg(Color::White)))
            .alignment(Alignment::Right),
        area,
    );
}

// ---------------------------------------------------------------------------
// Resize handle
// ---------------------------------------------------------------------------

fn render_handle(
    frame: &mut Frame,
    area: Rect,
    vm: &ViewModel,
    accent: Color,
    hits: &mut Hitboxes,
) {
    let (glyph, style) = match vm.cursor {
        CursorStyle::ColumnResize => (
            "┃",
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ),
        CursorStyle::Default => ("│", dim()),
    };
    let lines: Vec<Line> = (0..area.height)
        .map(|_| Line::from(Span::styled(glyph, style)))
        .collect();
    frame.render_widget(Paragraph::new(Text::from(lines)), area);
    hits.push(area, HitTarget::ResizeHandle);
}

// ---------------------------------------------------------------------------
// Detail pane
// ---------------------------------------------------------------------------

fn render_detail(
    frame: &mut Frame,
    area: Rect,
    vm: &ViewModel,
    accent: Color,
    hits: &mut Hitboxes,
    overlay: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(dim())
        .title(Span::styled(
            if overlay { " ‹ Back " } else { " Details " },
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    hits.anchor(TourTarget::ProjectDetail, area);
    if overlay {
        hits.push(
            Rect::new(area.x + 1, area.y, 8, 1).intersection(area),
            HitTarget::CloseDetail,
        );
    }

    let Some(detail) = &vm.detail else {
        let text = Text::from(vec![
            Line::from(Span::styled(
                "Select a project",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Choose a project from the list to see more details.",
                dim(),
            )),
        ]);
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center),
            centered(inner, inner.width, 2),
        );
        return;
    };

    render_detail_body(frame, inner, detail, accent, hits);
}

fn render_detail_body(
    frame: &mut Frame,
    area: Rect,
    detail: &DetailModel,
    accent: Color,
    hits: &mut Hitboxes,
) {
    let project = detail.project;
    let width = area.width as usize;
    // Links are pinned to the last row.
    let limit = area.height.saturating_sub(1);
    let mut row: u16 = 0;

    // ----- Gallery -----
    let images = &project.image_urls;
    if let Some(url) = images.get(detail.active_image) {
        let label = format!("▣ {}/{} ", detail.active_image + 1, images.len());
        let line = Line::from(vec![
            Span::styled(label.clone(), Style::default().fg(accent)),
            Span::styled(truncate(url, width.saturating_sub(label.width())), dim()),
        ]);
        draw_line(frame, area, row, line);
        if let Some(rect) = row_rect(area, row) {
            hits.push(rect, HitTarget::MainImage);
        }
        row += 1;
    }
    if images.len() > 1 && row < limit {
        let mut spans = Vec::new();
        let mut x = area.x;
        for index in 0..images.len() {
            let text = format!("[{}]", index + 1);
            let w = text.width() as u16;
            let style = if index == detail.active_image {
                Style::default().fg(Color::Black).bg(accent)
            } else {
                dim()
            };
            hits.push(
                Rect::new(x, area.y + row, w, 1).intersection(area),
                HitTarget::Thumbnail(index),
            );
            spans.push(Span::styled(text, style));
            spans.push(Span::raw(" "));
            x = x.saturating_add(w + 1);
        }
        draw_line(frame, area, row, Line::from(spans));
        row += 1;
    }
    row += 1;

    // ----- Heading and facts -----
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            truncate(&project.name, width),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Status    ", dim()),
            Span::styled(
                detail.status.label(),
                Style::default()
                    .fg(color_from_name(detail.status.color()))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Started   ", dim()),
            Span::styled(format_date(project.date_started), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("Finished  ", dim()),
            Span::styled(format_end_date(project.date_ended), Style::default().fg(Color::White)),
        ]),
        Line::default(),
    ];
    let description = if project.long_description.is_empty() {
        &project.description
    } else {
        &project.long_description
    };
    lines.extend(
        wrap_text(description, width)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::Gray)))),
    );
    lines.push(Line::default());
    for line in lines {
        if row >= limit {
            break;
        }
        draw_line(frame, area, row, line);
        row += 1;
    }

    // ----- Tags and technologies -----
    if row < limit && !project.tags.is_empty() {
        let heading = Span::styled("Tags", dim().add_modifier(Modifier::BOLD));
        draw_line(frame, area, row, Line::from(heading));
        row += 1;
        let chips: Vec<Chip> = project.tags.iter().map(|t| Chip::tag(*t, false, false)).collect();
        row = render_chips(frame, area, row, limit, &chips, None, hits) + 1;
    }
    if row < limit && !project.technologies.is_empty() {
        draw_line(
            frame,
            area,
            row,
            Line::from(Span::styled("Technologies Used", dim().add_modifier(Modifier::BOLD))),
        );
        row += 1;
        let chips: Vec<Chip> = project
            .technologies
            .iter()
            .map(|t| Chip::technology(t, accent, false, false))
            .collect();
        render_chips(frame, area, row, limit, &chips, None, hits);
    }

    // ----- Links -----
    if let Some(rect) = row_rect(area, limit) {
        let mut spans = Vec::new();
        let mut x = rect.x;
        for link in &detail.links {
            let text = button(link.label());
            let w = text.width() as u16;
            let style = if link.is_enabled() {
                Style::default().fg(Color::Black).bg(accent).add_modifier(Modifier::BOLD)
            } else {
                dim().add_modifier(Modifier::CROSSED_OUT)
            };
            if link.is_enabled() {
                hits.push(
                    Rect::new(x, rect.y, w, 1).intersection(rect),
                    HitTarget::Link(link.kind),
                );
            }
            spans.push(Span::styled(text, style));
            spans.push(Span::raw("  "));
            x = x.saturating_add(w + 2);
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rect);
    }
}

// ---------------------------------------------------------------------------
// Floating layers
// ---------------------------------------------------------------------------

fn render_preview(frame: &mut Frame, bounds: Rect, preview: &PreviewModel, accent: Color) {
    let area = to_rect(preview.region, bounds);
    if area.width < 4 || area.height < 3 {
        return;
    }
    let project = preview.project;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            truncate(&project.name, area.width.saturating_sub(4) as usize),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    let width = inner.width as usize;

    let mut lines = Vec::new();
    if let Some(cover) = project.cover_image() {
        lines.push(Line::from(Span::styled(truncate(&format!("▣ {}", cover), width), dim())));
    }
    let room = (inner.height as usize).saturating_sub(lines.len() + 1);
    lines.extend(
        wrap_text(&project.description, width)
            .into_iter()
            .take(room)
            .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::Gray)))),
    );
    let mut chips = Vec::new();
    for tag in project.tags.iter().take(3) {
        let details = tag.details();
        chips.push(Span::styled(
            format!(" {} ", details.name),
            Style::default().fg(color_from_name(details.color)),
        ));
    }
    lines.push(Line::from(chips));
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn render_lightbox(
    frame: &mut Frame,
    area: Rect,
    url: &str,
    vm: &ViewModel,
    accent: Color,
    hits: &mut Hitboxes,
) {
    dim_outside(frame, area, None);
    hits.push(area, HitTarget::LightboxBackdrop);

    let count = vm.detail.as_ref().map(|d| d.project.image_urls.len()).unwrap_or(0);
    let index = vm.detail.as_ref().map(|d| d.active_image + 1).unwrap_or(1);
    let width = (area.width * 4 / 5).max(20);
    let rect = centered(area, width, 7);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            format!(" Image {}/{} ", index, count),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(rect);
    frame.render_widget(Clear, rect);
    frame.render_widget(block, rect);

    let mut lines: Vec<Line> = wrap_text(url, inner.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::White))))
        .collect();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("←/→ browse  o open  Esc close", dim())));
    frame.render_widget(Paragraph::new(Text::from(lines)).alignment(Alignment::Center), inner);
}

fn render_welcome(frame: &mut Frame, area: Rect, accent: Color, hits: &mut Hitboxes) {
    dim_outside(frame, area, None);
    hits.push(area, HitTarget::Backdrop);

    let rect = centered(area, WELCOME_WIDTH, WELCOME_HEIGHT);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent));
    let inner = block.inner(rect);
    frame.render_widget(Clear, rect);
    frame.render_widget(block, rect);

    let mut lines = vec![
        Line::from(Span::styled(
            "Welcome to My Portfolio!",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    lines.extend(
        wrap_text(
            "Would you like a quick tour to see how everything works?",
            inner.width as usize,
        )
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::Gray)))),
    );
    frame.render_widget(Paragraph::new(Text::from(lines)).alignment(Alignment::Center), inner);

    let start = button("Start Tour");
    let skip = button("No, thanks");
    let total = (start.width() + 2 + skip.width()) as u16;
    if let Some(row) = row_rect(inner, inner.height.saturating_sub(1)) {
        let x = row.x + row.width.saturating_sub(total) / 2;
        let start_w = start.width() as u16;
        let start_rect = Rect::new(x, row.y, start_w, 1).intersection(row);
        let skip_rect = Rect::new(x + start_w + 2, row.y, skip.width() as u16, 1).intersection(row);
        frame.render_widget(
            Paragraph::new(Span::styled(
                start,
                Style::default().fg(Color::Black).bg(accent).add_modifier(Modifier::BOLD),
            )),
            start_rect,
        );
        let skip = Span::styled(skip, Style::default().fg(Color::White));
        frame.render_widget(Paragraph::new(skip), skip_rect);
        hits.push(start_rect, HitTarget::WelcomeStart);
        hits.push(skip_rect, HitTarget::WelcomeSkip);
    }
}

fn render_tour(
    frame: &mut Frame,
    area: Rect,
    overlay: &TourOverlay,
    accent: Color,
    hits: &mut Hitboxes,
) {
    let hole = to_rect(overlay.cutout, area);
    dim_outside(frame, area, Some(hole));

    // Backdrop around the cutout; clicks inside the cutout reach the target.
    let top = Rect::new(area.x, area.y, area.width, hole.y.saturating_sub(area.y));
    let below = area.bottom().saturating_sub(hole.bottom());
    let bottom = Rect::new(area.x, hole.bottom(), area.width, below);
    let left = Rect::new(area.x, hole.y, hole.x.saturating_sub(area.x), hole.height);
    let beside = area.right().saturating_sub(hole.right());
    let right = Rect::new(hole.right(), hole.y, beside, hole.height);
    for rect in [top, bottom, left, right] {
        hits.push(rect, HitTarget::TourBackdrop);
    }

    let rect = to_rect(overlay.tooltip, area);
    if rect.width < 10 || rect.height < 4 {
        return;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            format!(" {} ", overlay.step.title),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(rect);
    frame.render_widget(Clear, rect);
    frame.render_widget(block, rect);

    let close = Rect::new(rect.right() - 4, rect.y, 3, 1);
    let label = Span::styled("[✕]", Style::default().fg(Color::White));
    frame.render_widget(Paragraph::new(label), close);
    hits.push(close, HitTarget::TourClose);

    let body_rows = inner.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = wrap_text(overlay.step.body, inner.width as usize)
        .into_iter()
        .take(body_rows)
        .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::Gray))))
        .collect();
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);

    let Some(row) = row_rect(inner, inner.height.saturating_sub(1)) else {
        return;
    };
    frame.render_widget(Paragraph::new(Span::styled(overlay.progress(), dim())), row);

    let next = button(if overlay.is_last() { "Finish" } else { "Next" });
    let next_w = next.width() as u16;
    let next_rect =
        Rect::new(row.right().saturating_sub(next_w), row.y, next_w, 1).intersection(row);
    frame.render_widget(
        Paragraph::new(Span::styled(
            next,
            Style::default().fg(Color::Black).bg(accent).add_modifier(Modifier::BOLD),
        )),
        next_rect,
    );
    hits.push(next_rect, HitTarget::TourNext);

    if overlay.has_previous() {
        let prev = button("Previous");
        let prev_w = prev.width() as u16;
        let prev_x = next_rect.x.saturating_sub(prev_w + 1);
        let prev_rect = Rect::new(prev_x, row.y, prev_w, 1).intersection(row);
        let prev = Span::styled(prev, Style::default().fg(Color::White));
        frame.render_widget(Paragraph::new(prev), prev_rect);
        hits.push(prev_rect, HitTarget::TourPrevious);
    }
}

// ---------------------------------------------------------------------------
// Main render entry point
// ---------------------------------------------------------------------------

/// Draw one frame of the browser and return where everything ended up.
pub fn render_browser(frame: &mut Frame, vm: &ViewModel) -> Hitboxes {
    let area = frame.area();
    let mut hits = Hitboxes::default();
    let accent = color_from_name(vm.theme.accent());
    let g = vm.geometry;

    if vm.compact {
        let main = to_rect(g.main, area);
        if vm.filters_open {
            render_sidebar(frame, main, vm, accent, &mut hits, true);
        } else if vm.detail_open {
            render_detail(frame, main, vm, accent, &mut hits, true);
        } else {
            render_main(frame, main, vm, accent, &mut hits);
        }
    } else {
        if let Some(title_bar) = g.title_bar {
            render_title_bar(frame, to_rect(title_bar, area), vm, accent, &mut hits);
        }
        if let Some(sidebar) = g.sidebar {
            render_sidebar(frame, to_rect(sidebar, area), vm, accent, &mut hits, false);
        }
        render_main(frame, to_rect(g.main, area), vm, accent, &mut hits);
        if let Some(handle) = g.handle {
            render_handle(frame, to_rect(handle, area), vm, accent, &mut hits);
        }
        if let Some(detail) = g.detail {
            render_detail(frame, to_rect(detail, area), vm, accent, &mut hits, false);
        }
    }

    if let Some(preview) = &vm.preview {
        render_preview(frame, area, preview, accent);
    }

    if let Some(url) = vm.lightbox {
        render_lightbox(frame, area, url, vm, accent, &mut hits);
    }

    if vm.welcome_visible {
        render_welcome(frame, area, accent, &mut hits);
    } else if let Some(overlay) = vm.tour.overlay(&hits, vm.viewport, &vm.metrics) {
        render_tour(frame, area, &overlay, accent, &mut hits);
    }

    hits
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
