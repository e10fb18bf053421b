use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, info};

use crate::types::{Portfolio, PortfolioRequest};

/// In-memory portfolio storage for the request handler.
///
/// Contents live only as long as the process. Ids come from an atomic
/// sequence starting at 1, so concurrent creations never collide.
pub struct PortfolioStore {
    next_id: AtomicU64,
    portfolios: RwLock<BTreeMap<u64, Portfolio>>,
}

impl Default for PortfolioStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PortfolioStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            portfolios: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a portfolio from `request`, laying out its widgets once.
    pub fn create(&self, request: PortfolioRequest) -> Portfolio {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let portfolio = Portfolio::assemble(id, request, Utc::now());
        info!(
            "Created portfolio {id} \"{}\" with {} widget(s), {} person(s)",
            portfolio.name,
            portfolio.widgets.len(),
            portfolio.people.len()
        );
        self.write().insert(id, portfolio.clone());
        portfolio
    }

    /// All portfolios in id order.
    pub fn list(&self) -> Vec<Portfolio> {
        self.read().values().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Option<Portfolio> {
        self.read().get(&id).cloned()
    }

    /// Replace metadata and people of an existing portfolio. The widget
    /// layout is kept as created.
    pub fn update(&self, id: u64, request: PortfolioRequest) -> Option<Portfolio> {
        let mut portfolios = self.write();
        let portfolio = portfolios.get_mut(&id)?;
        portfolio.apply_update(request, Utc::now());
        debug!("Updated portfolio {id}");
        Some(portfolio.clone())
    }

    /// Remove a portfolio. Returns `false` if it did not exist.
    pub fn delete(&self, id: u64) -> bool {
        let removed = self.write().remove(&id).is_some();
        if removed {
            info!("Deleted portfolio {id}");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Writers only insert or remove whole entries, so the map is consistent
    // even when the lock is poisoned.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<u64, Portfolio>> {
        self.portfolios.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<u64, Portfolio>> {
        self.portfolios.write().unwrap_or_else(PoisonError::into_inner)
    }
}
