//! Category, search, tag and technology filtering plus sorting of the catalog.
//!
//! Everything here is pure: `compute_visible` maps a project slice and a
//! `FilterSelection` to the ordered visible subset and never mutates anything.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Category, Project, ProjectTag};
use crate::error::CatalogError;

// ---------------------------------------------------------------------------
// SidebarCategory
// ---------------------------------------------------------------------------

/// A sidebar entry. Besides the catalog's own categories this includes the
/// synthetic "All Projects", "In Progress" and "Hobbies" views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SidebarCategory {
    AllProjects,
    InProgress,
    WebApps,
    MobileApps,
    AiMl,
    Personal,
    Hobbies,
}

impl SidebarCategory {
    /// Entries listed under "Favorites". Hobbies has its own toggle.
    pub const FAVORITES: [SidebarCategory; 6] = [
        SidebarCategory::AllProjects,
        SidebarCategory::InProgress,
        SidebarCategory::WebApps,
        SidebarCategory::MobileApps,
        SidebarCategory::AiMl,
        SidebarCategory::Personal,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SidebarCategory::AllProjects => "All Projects",
            SidebarCategory::InProgress => "In Progress",
            SidebarCategory::WebApps => "Web Apps",
            SidebarCategory::MobileApps => "Mobile Apps",
            SidebarCategory::AiMl => "AI/ML",
            SidebarCategory::Personal => "Personal",
            SidebarCategory::Hobbies => "Hobbies",
        }
    }

    /// The catalog category a named sidebar entry stands for.
    pub fn mapped_category(&self) -> Option<Category> {
        match self {
            SidebarCategory::WebApps => Some(Category::Web),
            SidebarCategory::MobileApps => Some(Category::Mobile),
            SidebarCategory::AiMl => Some(Category::AiMl),
            SidebarCategory::Personal => Some(Category::Personal),
            _ => None,
        }
    }

    pub fn is_hobbies(&self) -> bool {
        *self == SidebarCategory::Hobbies
    }

    /// Category rule. Hobby projects only ever show up under Hobbies, and
    /// Hobbies shows nothing else.
    pub fn matches(&self, project: &Project) -> bool {
        let is_hobby = project.is_hobby();
        match self {
            SidebarCategory::Hobbies => is_hobby,
            SidebarCategory::InProgress => !is_hobby && project.is_in_progress(),
            SidebarCategory::Personal => !is_hobby && project.has_tag(ProjectTag::Personal),
            SidebarCategory::AllProjects => !is_hobby,
            named => !is_hobby && named.mapped_category() == Some(project.category),
        }
    }
}

impl fmt::Display for SidebarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SidebarCategory {
    type Err = CatalogError;

    /// Accepts a sidebar label ("Web Apps") or the catalog category it maps
    /// to ("web"), case-insensitively. "all" is shorthand for All Projects.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if needle.eq_ignore_ascii_case("all") {
            return Ok(SidebarCategory::AllProjects);
        }
        SidebarCategory::FAVORITES
            .into_iter()
            .chain([SidebarCategory::Hobbies])
            .find(|cat| {
                cat.label().eq_ignore_ascii_case(needle)
                    || cat
                        .mapped_category()
                        .is_some_and(|c| c.as_str().eq_ignore_ascii_case(needle))
            })
            .ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Category,
    DateStarted,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Name, SortKey::Category, SortKey::DateStarted];

    /// Column header text in list view.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Category => "Category",
            SortKey::DateStarted => "Date Started",
        }
    }

    pub fn next(&self) -> SortKey {
        match self {
            SortKey::Name => SortKey::Category,
            SortKey::Category => SortKey::DateStarted,
            SortKey::DateStarted => SortKey::Name,
        }
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "category" => Ok(SortKey::Category),
            "date" | "started" | "date-started" | "date_started" => Ok(SortKey::DateStarted),
            _ => Err(CatalogError::UnknownSortKey(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(&self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// Three-way comparison on a single key, ascending.
pub fn compare_by(key: SortKey, a: &Project, b: &Project) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Category => a.category.as_str().cmp(b.category.as_str()),
        SortKey::DateStarted => a.date_started.cmp(&b.date_started),
    }
}

// ---------------------------------------------------------------------------
// FilterSelection
// ---------------------------------------------------------------------------

/// The user's current filter and sort choices. Tags and technologies are
/// kept in selection order and never hold duplicates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterSelection {
    pub category: SidebarCategory,
    pub search: String,
    pub tags: Vec<ProjectTag>,
    pub technologies: Vec<String>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            category: SidebarCategory::AllProjects,
            search: String::new(),
            tags: Vec::new(),
            technologies: Vec::new(),
            sort_key: SortKey::Name,
            sort_direction: SortDirection::Asc,
        }
    }
}

impl FilterSelection {
    pub fn is_hobbies_mode(&self) -> bool {
        self.category.is_hobbies()
    }

    /// Switch category. Tag and technology selections belong to a category
    /// and are dropped whenever it changes. Returns whether anything changed.
    pub fn select_category(&mut self, category: SidebarCategory) -> bool {
        if self.category == category {
            return false;
        }
        self.category = category;
        self.tags.clear();
        self.technologies.clear();
        true
    }

    pub fn toggle_tag(&mut self, tag: ProjectTag) {
        if let Some(pos) = self.tags.iter().position(|t| *t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag);
        }
    }

    pub fn toggle_technology(&mut self, tech: &str) {
        if let Some(pos) = self.technologies.iter().position(|t| t == tech) {
            self.technologies.remove(pos);
        } else {
            self.technologies.push(tech.to_string());
        }
    }

    /// Clicking the active column flips direction; another column becomes
    /// active in ascending order.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Asc;
        }
    }

    /// Back to "All Projects" with no search, tags or technologies. Sorting
    /// is a view preference and survives.
    pub fn reset(&mut self) {
        self.category = SidebarCategory::AllProjects;
        self.search.clear();
        self.tags.clear();
        self.technologies.clear();
    }

    pub fn has_active_filters(&self) -> bool {
        self.category != SidebarCategory::AllProjects
            || !self.search.is_empty()
            || !self.tags.is_empty()
            || !self.technologies.is_empty()
    }

    pub fn matches_search(&self, project: &Project) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        project.name.to_lowercase().contains(&needle)
            || project.description.to_lowercase().contains(&needle)
    }

    /// AND semantics: every selected tag and technology must be present.
    pub fn matches_facets(&self, project: &Project) -> bool {
        self.tags.iter().all(|tag| project.has_tag(*tag))
            && self
                .technologies
                .iter()
                .all(|tech| project.uses_technology(tech))
    }

    pub fn matches(&self, project: &Project) -> bool {
        self.category.matches(project)
            && self.matches_search(project)
            && self.matches_facets(project)
    }

    pub fn compare(&self, a: &Project, b: &Project) -> Ordering {
        let ord = compare_by(self.sort_key, a, b);
        match self.sort_direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// The ordered visible subset of `projects` under `filters`.
///
/// `sort_by` is stable, so projects with equal keys keep catalog order in
/// both directions.
pub fn compute_visible<'a>(projects: &'a [Project], filters: &FilterSelection) -> Vec<&'a Project> {
    let mut visible: Vec<&Project> = projects.iter().filter(|p| filters.matches(p)).collect();
    visible.sort_by(|a, b| filters.compare(a, b));
    visible
}

// ---------------------------------------------------------------------------
// Facets
// ---------------------------------------------------------------------------

/// Tags and technologies the sidebar offers for the current mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Facets {
    pub tags: Vec<ProjectTag>,
    pub technologies: Vec<String>,
}

/// Distinct tags and technologies of the hobby projects (in hobbies mode) or
/// of all other projects, in first-seen catalog order.
pub fn available_facets(projects: &[Project], hobbies_mode: bool) -> Facets {
    let mut facets = Facets::default();
    for project in projects.iter().filter(|p| p.is_hobby() == hobbies_mode) {
        for tag in &project.tags {
            if !facets.tags.contains(tag) {
                facets.tags.push(*tag);
            }
        }
        for tech in &project.technologies {
            if !facets.technologies.contains(tech) {
                facets.technologies.push(tech.clone());
            }
        }
    }
    facets
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::project;
    use crate::catalog::Catalog;
    use proptest::prelude::*;

    fn names(list: &[&Project]) -> Vec<String> {
        list.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_hobby_project_only_in_hobbies() {
        let mut hobby = project(1, "Side Quest", "2022-01-01");
        hobby.tags = vec![ProjectTag::Hobby, ProjectTag::React];
        let work = project(2, "Work", "2022-01-01");
        let projects = vec![hobby, work];

        let mut filters = FilterSelection::default();
        filters.select_category(SidebarCategory::Hobbies);
        assert_eq!(names(&compute_visible(&projects, &filters)), vec!["Side Quest"]);

        filters.select_category(SidebarCategory::AllProjects);
        assert_eq!(names(&compute_visible(&projects, &filters)), vec!["Work"]);
    }

    #[test]
    fn test_sort_by_date_toggles() {
        let alpha = project(1, "Alpha", "2022-01-01");
        let beta = project(2, "Beta", "2023-01-01");
        let projects = vec![beta, alpha];

        let mut filters = FilterSelection::default();
        filters.toggle_sort(SortKey::DateStarted);
        assert_eq!(filters.sort_direction, SortDirection::Asc);
        assert_eq!(names(&compute_visible(&projects, &filters)), vec!["Alpha", "Beta"]);

        filters.toggle_sort(SortKey::DateStarted);
        assert_eq!(filters.sort_direction, SortDirection::Desc);
        assert_eq!(names(&compute_visible(&projects, &filters)), vec!["Beta", "Alpha"]);
    }

    #[test]
    fn test_toggle_sort_new_key_resets_direction() {
        let mut filters = FilterSelection::default();
        filters.toggle_sort(SortKey::Name);
        assert_eq!(filters.sort_direction, SortDirection::Desc);
        filters.toggle_sort(SortKey::Category);
        assert_eq!(filters.sort_key, SortKey::Category);
        assert_eq!(filters.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = Catalog::builtin().unwrap();
        let filters = FilterSelection {
            search: "WEATHER".to_string(),
            ..FilterSelection::default()
        };
        let visible = compute_visible(catalog.projects(), &filters);
        assert_eq!(names(&visible), vec!["Weather App"]);

        let filters = FilterSelection {
            search: "weather".to_string(),
            ..FilterSelection::default()
        };
        assert_eq!(compute_visible(catalog.projects(), &filters).len(), 1);
    }

    #[test]
    fn test_search_matches_description() {
        let catalog = Catalog::builtin().unwrap();
        let filters = FilterSelection {
            search: "sdlc".to_string(),
            ..FilterSelection::default()
        };
        let visible = compute_visible(catalog.projects(), &filters);
        assert_eq!(names(&visible), vec!["Software Project Fundamentals"]);
    }

    #[test]
    fn test_tags_narrow_to_intersection() {
        let catalog = Catalog::builtin().unwrap();
        let mut filters = FilterSelection::default();

        filters.toggle_tag(ProjectTag::WebApp);
        let web: Vec<u32> = compute_visible(catalog.projects(), &filters)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(web.len(), 2); // Portfolio Site, Secure Messaging Website

        filters.toggle_tag(ProjectTag::UxUi);
        let both = compute_visible(catalog.projects(), &filters);
        assert_eq!(names(&both), vec!["Portfolio Site"]);
        assert!(both.iter().all(|p| web.contains(&p.id)));

        filters.toggle_tag(ProjectTag::WebApp);
        assert_eq!(filters.tags, vec![ProjectTag::UxUi]);
    }

    #[test]
    fn test_technologies_use_and_semantics() {
        let catalog = Catalog::builtin().unwrap();
        let mut filters = FilterSelection::default();
        filters.toggle_technology("Python");
        assert_eq!(compute_visible(catalog.projects(), &filters).len(), 2);
        filters.toggle_technology("Flask");
        assert_eq!(
            names(&compute_visible(catalog.projects(), &filters)),
            vec!["Secure Messaging Website"]
        );
    }

    #[test]
    fn test_category_rules_on_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let ids = |cat: SidebarCategory| -> Vec<u32> {
            let mut filters = FilterSelection::default();
            filters.select_category(cat);
            let mut ids: Vec<u32> = compute_visible(catalog.projects(), &filters)
                .iter()
                .map(|p| p.id)
                .collect();
            ids.sort_unstable();
            ids
        };
        assert_eq!(ids(SidebarCategory::AllProjects), vec![1, 2, 3, 5, 6, 7, 8]);
        assert_eq!(ids(SidebarCategory::InProgress), vec![7]);
        assert_eq!(ids(SidebarCategory::WebApps), vec![1, 7]);
        assert_eq!(ids(SidebarCategory::MobileApps), vec![8]);
        assert_eq!(ids(SidebarCategory::AiMl), vec![5]);
        // Personal follows the tag, not the category field.
        assert_eq!(ids(SidebarCategory::Personal), vec![1, 2, 3, 6, 7, 8]);
        assert_eq!(ids(SidebarCategory::Hobbies), vec![4, 9]);
    }

    #[test]
    fn test_category_change_clears_facets() {
        let mut filters = FilterSelection::default();
        filters.toggle_tag(ProjectTag::React);
        filters.toggle_technology("Vite");
        assert!(!filters.select_category(SidebarCategory::AllProjects));
        assert_eq!(filters.tags.len(), 1);
        assert!(filters.select_category(SidebarCategory::WebApps));
        assert!(filters.tags.is_empty());
        assert!(filters.technologies.is_empty());
    }

    #[test]
    fn test_reset_keeps_sort() {
        let mut filters = FilterSelection {
            category: SidebarCategory::Hobbies,
            search: "x".to_string(),
            tags: vec![ProjectTag::Ai],
            technologies: vec!["Rust".to_string()],
            sort_key: SortKey::Category,
            sort_direction: SortDirection::Desc,
        };
        assert!(filters.has_active_filters());
        filters.reset();
        assert!(!filters.has_active_filters());
        assert_eq!(filters.sort_key, SortKey::Category);
        assert_eq!(filters.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_available_facets_by_mode() {
        let catalog = Catalog::builtin().unwrap();
        let hobby = available_facets(catalog.projects(), true);
        assert_eq!(
            hobby.tags,
            vec![
                ProjectTag::React,
                ProjectTag::WebApp,
                ProjectTag::UxUi,
                ProjectTag::Hobby,
                ProjectTag::ECommerce
            ]
        );
        assert!(hobby.technologies.contains(&"Stripe API".to_string()));

        let work = available_facets(catalog.projects(), false);
        assert!(!work.tags.contains(&ProjectTag::Hobby));
        assert_eq!(work.technologies.first().map(String::as_str), Some("Python"));
        // No duplicates even though Python appears twice.
        let pythons = work.technologies.iter().filter(|t| *t == "Python").count();
        assert_eq!(pythons, 1);
    }

    #[test]
    fn test_sidebar_category_from_str() {
        assert_eq!("web apps".parse::<SidebarCategory>().unwrap(), SidebarCategory::WebApps);
        assert_eq!("Web".parse::<SidebarCategory>().unwrap(), SidebarCategory::WebApps);
        assert_eq!("all".parse::<SidebarCategory>().unwrap(), SidebarCategory::AllProjects);
        assert_eq!("hobbies".parse::<SidebarCategory>().unwrap(), SidebarCategory::Hobbies);
        assert_eq!("ai/ml".parse::<SidebarCategory>().unwrap(), SidebarCategory::AiMl);
        assert!("games".parse::<SidebarCategory>().is_err());
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("date".parse::<SortKey>().unwrap(), SortKey::DateStarted);
        assert_eq!("Name".parse::<SortKey>().unwrap(), SortKey::Name);
        assert!("size".parse::<SortKey>().is_err());
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    const TECHS: [&str; 4] = ["Rust", "React", "Python", "Go"];
    const CATEGORIES: [Category; 4] = [
        Category::Web,
        Category::Mobile,
        Category::AiMl,
        Category::Personal,
    ];
    const SIDEBAR: [SidebarCategory; 7] = [
        SidebarCategory::AllProjects,
        SidebarCategory::InProgress,
        SidebarCategory::WebApps,
        SidebarCategory::MobileApps,
        SidebarCategory::AiMl,
        SidebarCategory::Personal,
        SidebarCategory::Hobbies,
    ];

    fn arb_project() -> impl Strategy<Value = Project> {
        (
            "[A-Ca-c]{1,3}",
            0usize..4,
            prop::collection::vec(0usize..11, 0..4),
            prop::collection::vec(0usize..4, 0..3),
            0u32..4,
            any::<bool>(),
        )
            .prop_map(|(name, cat, tags, techs, year, ended)| {
                let mut p = project(0, &name, &format!("202{}-01-01", year));
                p.category = CATEGORIES[cat];
                p.tags = Vec::new();
                for t in tags {
                    let tag = ProjectTag::ALL[t];
                    if !p.tags.contains(&tag) {
                        p.tags.push(tag);
                    }
                }
                p.technologies = techs.into_iter().map(|t| TECHS[t].to_string()).collect();
                if !ended {
                    p.date_ended = None;
                }
                p
            })
    }

    fn arb_catalog() -> impl Strategy<Value = Vec<Project>> {
        prop::collection::vec(arb_project(), 0..12).prop_map(|mut list| {
            for (i, p) in list.iter_mut().enumerate() {
                p.id = i as u32 + 1;
            }
            list
        })
    }

    fn arb_filters() -> impl Strategy<Value = FilterSelection> {
        (
            0usize..7,
            "[a-c]{0,2}",
            prop::collection::vec(0usize..11, 0..2),
            prop::collection::vec(0usize..4, 0..2),
            0usize..3,
            any::<bool>(),
        )
            .prop_map(|(cat, search, tags, techs, key, desc)| {
                let mut f = FilterSelection {
                    category: SIDEBAR[cat],
                    search,
                    sort_key: SortKey::ALL[key],
                    sort_direction: if desc { SortDirection::Desc } else { SortDirection::Asc },
                    ..FilterSelection::default()
                };
                for t in tags {
                    if !f.tags.contains(&ProjectTag::ALL[t]) {
                        f.toggle_tag(ProjectTag::ALL[t]);
                    }
                }
                for t in techs {
                    if !f.technologies.iter().any(|x| x == TECHS[t]) {
                        f.toggle_technology(TECHS[t]);
                    }
                }
                f
            })
    }

    /// Independent restatement of the filtering rules.
    fn oracle(p: &Project, f: &FilterSelection) -> bool {
        let hobby = p.tags.contains(&ProjectTag::Hobby);
        let category = match f.category {
            SidebarCategory::Hobbies => hobby,
            SidebarCategory::InProgress => !hobby && p.date_ended.is_none(),
            SidebarCategory::Personal => !hobby && p.tags.contains(&ProjectTag::Personal),
            SidebarCategory::AllProjects => !hobby,
            SidebarCategory::WebApps => !hobby && p.category == Category::Web,
            SidebarCategory::MobileApps => !hobby && p.category == Category::Mobile,
            SidebarCategory::AiMl => !hobby && p.category == Category::AiMl,
        };
        let q = f.search.to_lowercase();
        let search =
            p.name.to_lowercase().contains(&q) || p.description.to_lowercase().contains(&q);
        let tags = f.tags.iter().all(|t| p.tags.contains(t));
        let techs = f.technologies.iter().all(|t| p.technologies.contains(t));
        category && search && tags && techs
    }

    proptest! {
        #[test]
        fn prop_visible_set_is_exactly_the_matching_projects(
            projects in arb_catalog(),
            filters in arb_filters(),
        ) {
            let visible = compute_visible(&projects, &filters);
            for p in &projects {
                let shown = visible.iter().any(|v| v.id == p.id);
                prop_assert_eq!(shown, oracle(p, &filters));
            }
        }

        #[test]
        fn prop_sort_is_ordered_and_stable(
            projects in arb_catalog(),
            filters in arb_filters(),
        ) {
            let visible = compute_visible(&projects, &filters);
            for pair in visible.windows(2) {
                let ord = filters.compare(pair[0], pair[1]);
                prop_assert_ne!(ord, Ordering::Greater);
                if ord == Ordering::Equal {
                    // Ids follow input order, so equal keys keep ascending ids.
                    prop_assert!(pair[0].id < pair[1].id);
                }
            }
        }

        #[test]
        fn prop_ties_keep_catalog_order_after_shuffle(
            projects in arb_catalog().prop_shuffle(),
            filters in arb_filters(),
        ) {
            let position = |id: u32| projects.iter().position(|p| p.id == id);
            let visible = compute_visible(&projects, &filters);
            for pair in visible.windows(2) {
                if filters.compare(pair[0], pair[1]) == Ordering::Equal {
                    prop_assert!(position(pair[0].id) < position(pair[1].id));
                }
            }
        }
    }
}
