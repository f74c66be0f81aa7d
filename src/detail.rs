use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::Project;

// ---------------------------------------------------------------------------
// Status, dates and links
// ---------------------------------------------------------------------------

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectStatus {
    Completed,
    InProgress,
}

impl ProjectStatus {
    pub fn of(project: &Project) -> Self {
        if project.is_in_progress() {
            ProjectStatus::InProgress
        } else {
            ProjectStatus::Completed
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Completed => "Completed",
            ProjectStatus::InProgress => "In Progress",
        }
    }

    /// Colour name for the renderer.
    pub fn color(&self) -> &'static str {
        match self {
            ProjectStatus::Completed => "green",
            ProjectStatus::InProgress => "blue",
        }
    }
}

/// `Mar 4, 2023`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Finished date, or a dash while the project is running.
pub fn format_end_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "\u{2014}".to_string())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    LiveDemo,
    /// Shown instead of the source link for private projects; not clickable.
    Private,
    SourceCode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailLink {
    pub kind: LinkKind,
    pub url: Option<String>,
}

impl DetailLink {
    pub fn label(&self) -> &'static str {
        match self.kind {
            LinkKind::LiveDemo => "Live Demo",
            LinkKind::Private => "Private",
            LinkKind::SourceCode => "Source Code",
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }
}

/// Link buttons for the bottom of the detail pane.
pub fn detail_links(project: &Project) -> Vec<DetailLink> {
    let mut links = Vec::new();
    if let Some(url) = &project.live_url {
        links.push(DetailLink {
            kind: LinkKind::LiveDemo,
            url: Some(url.clone()),
        });
    }
    if project.is_private() {
        links.push(DetailLink {
            kind: LinkKind::Private,
            url: None,
        });
    } else if let Some(url) = &project.repo_url {
        links.push(DetailLink {
            kind: LinkKind::SourceCode,
            url: Some(url.clone()),
        });
    }
    links
}

/// "1 item", "4 items".
pub fn item_count_label(count: usize) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{} items", count)
    }
}

// ---------------------------------------------------------------------------
// Gallery state
// ---------------------------------------------------------------------------

/// Active image and lightbox for the project shown in the detail pane.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailState {
    project: Option<u32>,
    active_image: usize,
    lightbox: Option<usize>,
}

impl DetailState {
    /// Follow the selection. A different project starts at its first image
    /// with the lightbox closed.
    pub fn sync(&mut self, selected: Option<u32>) {
        if self.project != selected {
            self.project = selected;
            self.active_image = 0;
            self.lightbox = None;
        }
    }

    pub fn active_image(&self) -> usize {
        self.active_image
    }

    pub fn lightbox(&self) -> Option<usize> {
        self.lightbox
    }

    /// Thumbnail click: make it the main image and enlarge it.
    pub fn select_image(&mut self, index: usize, image_count: usize) {
        if index < image_count {
            self.active_image = index;
            self.lightbox = Some(index);
        }
    }

    /// Cycle the main image, wrapping at either end.
    pub fn cycle_image(&mut self, forward: bool, image_count: usize) {
        if image_count == 0 {
            return;
        }
        self.active_image = if forward {
            (self.active_image + 1) % image_count
        } else {
            (self.active_image + image_count - 1) % image_count
        };
        if self.lightbox.is_some() {
            self.lightbox = Some(self.active_image);
        }
    }

    pub fn open_lightbox(&mut self, image_count: usize) {
        if self.active_image < image_count {
            self.lightbox = Some(self.active_image);
        }
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::project;
    use crate::catalog::{Catalog, ProjectTag};

    #[test]
    fn test_status_and_dates() {
        let mut p = project(1, "Alpha", "2023-03-04");
        assert_eq!(ProjectStatus::of(&p), ProjectStatus::Completed);
        assert_eq!(format_date(p.date_started), "Mar 4, 2023");
        assert_eq!(format_end_date(p.date_ended), "Jan 1, 2024");

        p.date_ended = None;
        assert_eq!(ProjectStatus::of(&p).label(), "In Progress");
        assert_eq!(format_end_date(p.date_ended), "\u{2014}");
    }

    #[test]
    fn test_links_for_public_project() {
        let mut p = project(1, "Alpha", "2023-01-01");
        p.live_url = Some("https://alpha.dev".into());
        p.repo_url = Some("https://github.com/x/alpha".into());
        let labels: Vec<_> = detail_links(&p).iter().map(|l| l.label()).collect();
        assert_eq!(labels, vec!["Live Demo", "Source Code"]);
    }

    #[test]
    fn test_private_project_hides_repo() {
        let mut p = project(1, "Alpha", "2023-01-01");
        p.tags = vec![ProjectTag::Private];
        p.repo_url = Some("https://github.com/x/alpha".into());
        let links = detail_links(&p);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].kind, LinkKind::Private);
        assert!(!links[0].is_enabled());
    }

    #[test]
    fn test_builtin_private_project() {
        let catalog = Catalog::builtin().unwrap();
        let links = detail_links(catalog.get(5).unwrap());
        assert!(links.iter().any(|l| l.kind == LinkKind::Private));
        assert!(!links.iter().any(|l| l.kind == LinkKind::SourceCode));
    }

    #[test]
    fn test_item_count_label() {
        assert_eq!(item_count_label(0), "0 items");
        assert_eq!(item_count_label(1), "1 item");
        assert_eq!(item_count_label(9), "9 items");
    }

    #[test]
    fn test_gallery_resets_on_project_change() {
        let mut state = DetailState::default();
        state.sync(Some(1));
        state.select_image(2, 3);
        assert_eq!(state.active_image(), 2);
        assert_eq!(state.lightbox(), Some(2));

        state.sync(Some(1));
        assert_eq!(state.active_image(), 2);

        state.sync(Some(4));
        assert_eq!(state.active_image(), 0);
        assert_eq!(state.lightbox(), None);
    }

    #[test]
    fn test_cycle_and_lightbox() {
        let mut state = DetailState::default();
        state.cycle_image(false, 3);
        assert_eq!(state.active_image(), 2);
        state.cycle_image(true, 3);
        assert_eq!(state.active_image(), 0);

        state.select_image(7, 3);
        assert_eq!(state.lightbox(), None);

        state.open_lightbox(3);
        assert_eq!(state.lightbox(), Some(0));
        state.cycle_image(true, 3);
        assert_eq!(state.lightbox(), Some(1));
        state.close_lightbox();
        assert_eq!(state.lightbox(), None);
        state.cycle_image(true, 0);
        assert_eq!(state.active_image(), 1);
    }
}
