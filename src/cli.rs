use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::catalog::ProjectTag;
use crate::error::CatalogError;
use crate::filter::{FilterSelection, SidebarCategory, SortDirection, SortKey};
use crate::layout::ViewMode;

/// Browse a portfolio project catalog in an interactive terminal window
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Browse a portfolio project catalog in an interactive terminal window")]
pub struct Cli {
    /// Load projects from a JSON file instead of the built-in catalog
    #[arg(long = "catalog")]
    pub catalog: Option<PathBuf>,

    /// Where the "tour seen" flag is stored (default: <data dir>/folio/state.json)
    #[arg(long = "state-file")]
    pub state_file: Option<PathBuf>,

    /// Forget that the guided tour was seen, so the welcome prompt shows again
    #[arg(long = "reset-tour")]
    pub reset_tour: bool,

    /// Never offer the guided tour on start-up
    #[arg(long = "no-tour", conflicts_with = "reset_tour")]
    pub no_tour: bool,

    /// Initial view mode
    #[arg(long = "view", value_enum, default_value_t = ViewArg::Grid)]
    pub view: ViewArg,

    /// Initial sidebar category, e.g. "Web Apps", "web", "hobbies"
    #[arg(short = 'C', long = "category")]
    pub category: Option<String>,

    /// Initial search text
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,

    /// Require a tag (repeatable), e.g. --tag react --tag web-app
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,

    /// Require a technology (repeatable)
    #[arg(short = 'T', long = "tech")]
    pub technologies: Vec<String>,

    /// Sort key: name, category or date
    #[arg(long = "sort", default_value = "name")]
    pub sort: String,

    /// Sort in descending order
    #[arg(long = "desc")]
    pub desc: bool,

    /// Select and reveal a project by id once the browser is up
    #[arg(long = "highlight")]
    pub highlight: Option<u32>,

    /// Print the matching projects and exit instead of starting the browser
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// With --list, print JSON
    #[arg(long = "json", requires = "list")]
    pub json: bool,

    /// Write logs to this file while the browser is running
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewArg {
    Grid,
    List,
}

impl From<ViewArg> for ViewMode {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Grid => ViewMode::Grid,
            ViewArg::List => ViewMode::List,
        }
    }
}

impl Cli {
    /// Build the initial filter selection from the command-line flags.
    pub fn filters(&self) -> Result<FilterSelection, CatalogError> {
        let mut filters = FilterSelection::default();
        if let Some(category) = &self.category {
            filters.select_category(category.parse::<SidebarCategory>()?);
        }
        if let Some(search) = &self.search {
            filters.search = search.clone();
        }
        for tag in &self.tags {
            let tag: ProjectTag = tag.parse()?;
            if !filters.tags.contains(&tag) {
                filters.toggle_tag(tag);
            }
        }
        for tech in &self.technologies {
            if !filters.technologies.contains(tech) {
                filters.toggle_technology(tech);
            }
        }
        filters.sort_key = self.sort.parse::<SortKey>()?;
        filters.sort_direction = if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Ok(filters)
    }
}
