use thiserror::Error;

/// Errors raised while loading a catalog or interpreting filter arguments.
///
/// Interactive paths never produce these; they only surface before the UI
/// starts (catalog loading) or in headless `--list` mode.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate project id: {0}")]
    DuplicateId(u32),

    #[error("Project {id} lists tag '{tag}' more than once")]
    DuplicateTag { id: u32, tag: &'static str },

    #[error("Project {0} has an empty name")]
    EmptyName(u32),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    #[error("Unknown sort key: {0} (expected name, category or date)")]
    UnknownSortKey(String),
}
