mod app;
mod browser;
mod catalog;
mod cli;
mod detail;
mod error;
mod filter;
mod geometry;
mod layout;
mod preview;
mod renderer;
mod selection;
mod store;
mod timers;
mod tour;
mod viewport;

use std::sync::Mutex;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::browser::{Msg, ProjectBrowser};
use crate::catalog::{Catalog, Project};
use crate::detail::{format_date, ProjectStatus};
use crate::filter::{compute_visible, FilterSelection};
use crate::geometry::{Metrics, Size};
use crate::store::{FlagStore, JsonFileStore, MemoryStore};
use crate::tour::TOUR_SEEN_KEY;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(&cli)?;

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => Catalog::builtin().context("Built-in catalog is invalid")?,
    };
    tracing::info!(projects = catalog.len(), "catalog loaded");

    let filters = cli.filters()?;

    // Handle --list mode
    if cli.list {
        return handle_list(&catalog, &filters, cli.json);
    }

    if let Some(id) = cli.highlight {
        if !catalog.contains(id) {
            anyhow::bail!("No project with id {}", id);
        }
    }

    let store = open_store(&cli)?;
    let (width, height) = crossterm::terminal::size()?;
    let browser = ProjectBrowser::new(
        catalog,
        Metrics::TERMINAL,
        Size::new(width as i32, height as i32),
        store,
    )
    .with_filters(filters)
    .with_view_mode(cli.view.into());

    let mut app = app::App::new(browser);
    if let Some(id) = cli.highlight {
        app.dispatch(Msg::RequestHighlight(id), Instant::now());
    }
    app.run()?;

    tracing::debug!(tour = ?app.browser.tour().phase(), "session ended");
    if let Some(outcome) = app.browser.last_highlight() {
        tracing::info!(?outcome, "highlight finished");
    }

    Ok(())
}

/// Logging goes to stderr in `--list` mode. The TUI owns the terminal, so
/// interactive sessions only log when `--log-file` is given.
fn init_tracing(cli: &cli::Cli) -> anyhow::Result<()> {
    let filter = match cli.verbose {
        0 => "warn,folio=info",
        1 => "info,folio=debug",
        2 => "debug,folio=trace",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if let Some(path) = &cli.log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .init();
    } else if cli.list {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

fn open_store(cli: &cli::Cli) -> anyhow::Result<Box<dyn FlagStore>> {
    if cli.no_tour {
        let mut store = MemoryStore::default();
        store.set(TOUR_SEEN_KEY, true)?;
        return Ok(Box::new(store));
    }

    let path = cli
        .state_file
        .clone()
        .unwrap_or_else(store::default_state_path);
    let mut store = JsonFileStore::open(&path);
    if cli.reset_tour {
        store.remove(TOUR_SEEN_KEY)?;
        tracing::info!(path = %store.path().display(), "tour flag reset");
    }
    Ok(Box::new(store))
}

// ---------------------------------------------------------------------------
// Headless listing
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ListedProject<'a> {
    #[serde(flatten)]
    project: &'a Project,
    status: ProjectStatus,
}

fn handle_list(catalog: &Catalog, filters: &FilterSelection, json: bool) -> anyhow::Result<()> {
    let visible = compute_visible(catalog.projects(), filters);
    tracing::debug!(count = visible.len(), "listing projects");

    if json {
        let listed: Vec<ListedProject> = visible
            .iter()
            .map(|&project| ListedProject {
                project,
                status: ProjectStatus::of(project),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    let name_width = visible.iter().map(|p| p.name.len()).max().unwrap_or(0);
    for project in &visible {
        println!(
            "{:>3}  {:<name_width$}  {:<8}  {:<12}  {}",
            project.id,
            project.name,
            project.category.as_str(),
            format_date(project.date_started),
            ProjectStatus::of(project).label(),
            name_width = name_width
        );
    }
    eprintln!("{}", detail::item_count_label(visible.len()));
    Ok(())
}
