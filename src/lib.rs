pub mod api;
pub mod config;
pub mod layout;
pub mod local;
pub mod reporter;
pub mod store;
pub mod types;

/// Number of columns on the dashboard grid.
pub const GRID_COLUMNS: u32 = 12;

/// Name given to portfolios created without one.
pub const DEFAULT_PORTFOLIO_NAME: &str = "Untitled";

/// Key under which the local store keeps its portfolio list.
pub const LOCAL_STORAGE_KEY: &str = "portfolio-tracker:portfolios";

/// Default path of the local key-value file.
pub const LOCAL_STORE_PATH: &str = "portfolios.local.json";
