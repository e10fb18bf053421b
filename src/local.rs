use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::types::{Portfolio, PortfolioRequest};

/// Offline portfolio storage in a JSON key-value file.
///
/// The file is a JSON object; portfolios are kept as one array under a fixed
/// key and every other key is written back untouched. Ids are wall-clock
/// milliseconds, bumped past the largest existing id when the clock has not
/// moved forward.
pub struct LocalPortfolioStore {
    path: PathBuf,
    key: String,
    /// Entries under keys other than `key`.
    other_entries: Map<String, Value>,
    portfolios: Vec<Portfolio>,
}

impl LocalPortfolioStore {
    /// Load the store at `path`. A missing or empty file is an empty store.
    pub fn open(path: impl Into<PathBuf>, key: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let key = key.into();

        let mut entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            if contents.trim().is_empty() {
                Map::new()
            } else {
                serde_json::from_str::<Map<String, Value>>(&contents)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
        } else {
            Map::new()
        };

        let portfolios: Vec<Portfolio> = match entries.remove(&key) {
            Some(value) => serde_json::from_value(value).with_context(|| {
                format!("malformed portfolio list under \"{key}\" in {}", path.display())
            })?,
            None => Vec::new(),
        };
        debug!(
            "Opened local store {} ({} portfolio(s))",
            path.display(),
            portfolios.len()
        );

        Ok(Self {
            path,
            key,
            other_entries: entries,
            portfolios,
        })
    }

    /// Create a portfolio, lay out its widgets and persist it immediately.
    pub fn create(&mut self, request: PortfolioRequest) -> Result<Portfolio> {
        let now = Utc::now();
        let id = self.next_id(now.timestamp_millis());
        let portfolio = Portfolio::assemble(id, request, now);
        self.portfolios.push(portfolio.clone());
        self.save()?;
        info!(
            "Saved local portfolio {id} \"{}\" to {}",
            portfolio.name,
            self.path.display()
        );
        Ok(portfolio)
    }

    pub fn list(&self) -> &[Portfolio] {
        &self.portfolios
    }

    pub fn get(&self, id: u64) -> Option<&Portfolio> {
        self.portfolios.iter().find(|p| p.id == id)
    }

    /// Remove a portfolio and persist. Returns `false` (and writes nothing)
    /// if it did not exist.
    pub fn delete(&mut self, id: u64) -> Result<bool> {
        let Some(idx) = self.portfolios.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        self.portfolios.remove(idx);
        self.save()?;
        info!("Deleted local portfolio {id}");
        Ok(true)
    }

    /// Write all entries back to the file.
    pub fn save(&self) -> Result<()> {
        let mut entries = self.other_entries.clone();
        entries.insert(
            self.key.clone(),
            serde_json::to_value(&self.portfolios).context("failed to serialize portfolios")?,
        );
        let contents =
            serde_json::to_string_pretty(&entries).context("failed to serialize local store")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn next_id(&self, timestamp_ms: i64) -> u64 {
        let stamp = u64::try_from(timestamp_ms).unwrap_or(0);
        match self.portfolios.iter().map(|p| p.id).max() {
            Some(max) if stamp <= max => max + 1,
            _ => stamp,
        }
    }
}
