use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// The default project catalog, embedded into the binary at compile time.
const DEFAULT_CATALOG: &str = include_str!("../data/projects.json");

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Web,
    Mobile,
    #[serde(rename = "AI/ML")]
    AiMl,
    Personal,
}

impl Category {
    /// Return the string representation matching the serde serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Web => "Web",
            Category::Mobile => "Mobile",
            Category::AiMl => "AI/ML",
            Category::Personal => "Personal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProjectTag
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectTag {
    Private,
    Ai,
    Flutter,
    React,
    WebApp,
    Mobile,
    DataScience,
    #[serde(rename = "ux/ui")]
    UxUi,
    Personal,
    Hobby,
    ECommerce,
}

/// Display name and chip colour for a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagDetails {
    pub name: &'static str,
    /// Colour name understood by the renderer (see `renderer::color_from_name`).
    pub color: &'static str,
}

impl ProjectTag {
    pub const ALL: [ProjectTag; 11] = [
        ProjectTag::Private,
        ProjectTag::Ai,
        ProjectTag::Flutter,
        ProjectTag::React,
        ProjectTag::WebApp,
        ProjectTag::Mobile,
        ProjectTag::DataScience,
        ProjectTag::UxUi,
        ProjectTag::Personal,
        ProjectTag::Hobby,
        ProjectTag::ECommerce,
    ];

    /// Return the string representation matching the serde serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectTag::Private => "private",
            ProjectTag::Ai => "ai",
            ProjectTag::Flutter => "flutter",
            ProjectTag::React => "react",
            ProjectTag::WebApp => "web-app",
            ProjectTag::Mobile => "mobile",
            ProjectTag::DataScience => "data-science",
            ProjectTag::UxUi => "ux/ui",
            ProjectTag::Personal => "personal",
            ProjectTag::Hobby => "hobby",
            ProjectTag::ECommerce => "e-commerce",
        }
    }

    pub fn details(&self) -> TagDetails {
        let (name, color) = match self {
            ProjectTag::Ai => ("AI", "blue"),
            ProjectTag::React => ("React", "cyan"),
            ProjectTag::Flutter => ("Flutter", "lightcyan"),
            ProjectTag::Private => ("Private", "red"),
            ProjectTag::WebApp => ("Web App", "magenta"),
            ProjectTag::Mobile => ("Mobile", "green"),
            ProjectTag::DataScience => ("Data Science", "yellow"),
            ProjectTag::UxUi => ("UX/UI", "lightmagenta"),
            ProjectTag::Personal => ("Personal", "gray"),
            ProjectTag::Hobby => ("Hobby", "lightblue"),
            ProjectTag::ECommerce => ("E-Commerce", "lightgreen"),
        };
        TagDetails { name, color }
    }
}

impl FromStr for ProjectTag {
    type Err = CatalogError;

    /// Accepts either the serialized value (`web-app`) or the display name
    /// (`Web App`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ProjectTag::ALL
            .into_iter()
            .find(|tag| {
                tag.as_str().eq_ignore_ascii_case(needle)
                    || tag.details().name.eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| CatalogError::UnknownTag(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u32,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<ProjectTag>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    pub date_started: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_ended: Option<NaiveDate>,
}

impl Project {
    pub fn has_tag(&self, tag: ProjectTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn uses_technology(&self, tech: &str) -> bool {
        self.technologies.iter().any(|t| t == tech)
    }

    pub fn is_hobby(&self) -> bool {
        self.has_tag(ProjectTag::Hobby)
    }

    /// A project without an end date is still in progress.
    pub fn is_in_progress(&self) -> bool {
        self.date_ended.is_none()
    }

    pub fn is_private(&self) -> bool {
        self.has_tag(ProjectTag::Private)
    }

    /// The first image doubles as the cover shown in the grid and preview.
    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable, validated list of projects. Loaded once at start-up.
#[derive(Clone, Debug)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_CATALOG)
    }

    /// Load a catalog from a JSON file holding an array of projects.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            projects = catalog.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let projects: Vec<Project> = serde_json::from_str(raw)?;
        Self::from_projects(projects)
    }

    /// Validate and wrap a list of projects, preserving their order.
    pub fn from_projects(projects: Vec<Project>) -> Result<Self, CatalogError> {
        let mut seen_ids = HashSet::new();
        for project in &projects {
            if !seen_ids.insert(project.id) {
                return Err(CatalogError::DuplicateId(project.id));
            }
            if project.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(project.id));
            }
            let mut seen_tags = HashSet::new();
            for tag in &project.tags {
                if !seen_tags.insert(*tag) {
                    return Err(CatalogError::DuplicateTag {
                        id: project.id,
                        tag: tag.as_str(),
                    });
                }
            }
            if project.image_urls.is_empty() {
                tracing::warn!(id = project.id, "project has no images");
            }
        }
        Ok(Self { projects })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: u32) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    pub fn first(&self) -> Option<&Project> {
        self.projects.first()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
