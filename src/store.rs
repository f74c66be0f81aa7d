//! Small persisted key/flag storage (the "tour seen" flag lives here).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub trait FlagStore {
    /// Unset keys read as `false`.
    fn get(&self, key: &str) -> bool;
    fn set(&mut self, key: &str, value: bool) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Default location of the state file: `<data dir>/folio/state.json`.
pub fn default_state_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
        .join("state.json")
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// Flags kept as a flat JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    flags: BTreeMap<String, bool>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable or corrupt one is reported and treated as empty.
    pub fn open(path: &Path) -> Self {
        let flags = match Self::read(path) {
            Ok(flags) => flags,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring state file");
                BTreeMap::new()
            }
        };
        Self {
            path: path.to_path_buf(),
            flags,
        }
    }

    fn read(path: &Path) -> Result<BTreeMap<String, bool>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| "parsing state JSON")
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.flags)?;
        fs::write(&self.path, json).with_context(|| format!("writing {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "state saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FlagStore for JsonFileStore {
    fn get(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    fn set(&mut self, key: &str, value: bool) -> Result<()> {
        self.flags.insert(key.to_string(), value);
        self.write()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.flags.remove(key).is_some() {
            self.write()?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Session-only store, used with `--no-tour` and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    flags: BTreeMap<String, bool>,
}

impl FlagStore for MemoryStore {
    fn get(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    fn set(&mut self, key: &str, value: bool) -> Result<()> {
        self.flags.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.flags.remove(key);
        Ok(())
    }
}
