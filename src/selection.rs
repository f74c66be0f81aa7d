use crate::catalog::Catalog;
use crate::filter::{FilterSelection, SidebarCategory};

/// How a highlight request was resolved. Passed to the requester's
/// completion callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightOutcome {
    /// Filters were reset and the project is now selected.
    Selected(u32),
    /// No such project; nothing changed.
    NotFound(u32),
}

// ---------------------------------------------------------------------------
// SelectionController
// ---------------------------------------------------------------------------

/// Keeps the selected project pointing at a member of the visible set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionController {
    selected: Option<u32>,
}

impl SelectionController {
    /// Start with the first catalog project selected.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            selected: catalog.first().map(|p| p.id),
        }
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// Explicit user selection of a visible item.
    pub fn select(&mut self, id: u32) {
        if self.selected != Some(id) {
            tracing::debug!(id, "project selected");
        }
        self.selected = Some(id);
    }

    /// Bring the selection back in line with a new visible set: an absent or
    /// missing selection falls back to the first visible project, or to
    /// nothing when the set is empty. Returns whether the selection changed.
    pub fn reconcile(&mut self, visible: &[u32]) -> bool {
        let keep = self.selected.filter(|id| visible.contains(id));
        let next = keep.or_else(|| visible.first().copied());
        let changed = next != self.selected;
        if changed {
            tracing::debug!(from = ?self.selected, to = ?next, "selection reconciled");
        }
        self.selected = next;
        changed
    }

    pub fn select_next(&mut self, visible: &[u32]) {
        self.step(visible, 1);
    }

    pub fn select_previous(&mut self, visible: &[u32]) {
        self.step(visible, -1);
    }

    pub fn select_first(&mut self, visible: &[u32]) {
        if let Some(&id) = visible.first() {
            self.select(id);
        }
    }

    pub fn select_last(&mut self, visible: &[u32]) {
        if let Some(&id) = visible.last() {
            self.select(id);
        }
    }

    /// Move within the visible set, stopping at either end.
    fn step(&mut self, visible: &[u32], delta: isize) {
        if visible.is_empty() {
            return;
        }
        let current = self
            .selected
            .and_then(|id| visible.iter().position(|v| *v == id));
        let index = match current {
            Some(i) => (i as isize + delta).clamp(0, visible.len() as isize - 1) as usize,
            None => 0,
        };
        self.select(visible[index]);
    }

    /// Make project `id` visible and select it.
    ///
    /// Filters are reset so nothing hides the project. Hobby projects only
    /// ever appear under Hobbies, so they switch to that category instead of
    /// All Projects. `on_complete` runs exactly once, also when the id is
    /// unknown, in which case neither filters nor selection change.
    pub fn highlight<F>(
        &mut self,
        id: u32,
        catalog: &Catalog,
        filters: &mut FilterSelection,
        on_complete: F,
    ) where
        F: FnOnce(HighlightOutcome),
    {
        let Some(project) = catalog.get(id) else {
            tracing::warn!(id, "highlight requested for unknown project");
            on_complete(HighlightOutcome::NotFound(id));
            return;
        };

        filters.reset();
        if project.is_hobby() {
            filters.select_category(SidebarCategory::Hobbies);
        }
        self.selected = Some(id);
        tracing::info!(id, name = %project.name, "project highlighted");
        on_complete(HighlightOutcome::Selected(id));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
