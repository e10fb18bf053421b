use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_PORTFOLIO_NAME;
use crate::layout;

/// Dashboard panel kind. Drives the size lookup in [`layout`].
///
/// Any string is accepted: names outside the registered set are kept verbatim
/// in [`WidgetType::Other`] and laid out with the default size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetType {
    Sentiment,
    Holdings,
    News,
    Reddit,
    Chart,
    Trades,
    Sectors,
    Watchlist,
    Other(String),
}

impl WidgetType {
    pub fn as_str(&self) -> &str {
        match self {
            WidgetType::Sentiment => "sentiment",
            WidgetType::Holdings => "holdings",
            WidgetType::News => "news",
            WidgetType::Reddit => "reddit",
            WidgetType::Chart => "chart",
            WidgetType::Trades => "trades",
            WidgetType::Sectors => "sectors",
            WidgetType::Watchlist => "watchlist",
            WidgetType::Other(name) => name,
        }
    }

    pub fn is_registered(&self) -> bool {
        !matches!(self, WidgetType::Other(_))
    }
}

impl From<&str> for WidgetType {
    fn from(s: &str) -> Self {
        match s {
            "sentiment" => WidgetType::Sentiment,
            "holdings" => WidgetType::Holdings,
            "news" => WidgetType::News,
            "reddit" => WidgetType::Reddit,
            "chart" => WidgetType::Chart,
            "trades" => WidgetType::Trades,
            "sectors" => WidgetType::Sectors,
            "watchlist" => WidgetType::Watchlist,
            other => WidgetType::Other(other.to_string()),
        }
    }
}

impl From<String> for WidgetType {
    fn from(s: String) -> Self {
        match WidgetType::from(s.as_str()) {
            WidgetType::Other(_) => WidgetType::Other(s),
            known => known,
        }
    }
}

impl From<WidgetType> for String {
    fn from(t: WidgetType) -> Self {
        match t {
            WidgetType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for WidgetType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(WidgetType::from(s))
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Width and height in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSize {
    pub w: u32,
    pub h: u32,
}

/// A widget with its position on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedWidget {
    /// `<type>-<index>`; unique within one layout, not stable across edits.
    pub id: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Smallest width the dashboard allows a resize to.
    #[serde(rename = "minW", default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(rename = "minH", default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
}

/// A politician or fund manager followed by a portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPerson {
    pub id: usize,
    pub portfolio_id: u64,
    pub name: String,
    /// `politician` or `hedge_fund` in practice; not validated.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub identifier: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub identifier: Option<String>,
    pub image_url: Option<String>,
}

/// Payload for creating or updating a portfolio. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub people: Vec<PersonRequest>,
    pub data_sources: Vec<String>,
    /// Widget types in the order the user picked them.
    pub widgets: Vec<WidgetType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub data_sources: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub people: Vec<TrackedPerson>,
    pub widgets: Vec<PlacedWidget>,
}

impl Portfolio {
    /// Build a portfolio from a request, laying out its widgets.
    ///
    /// Both the in-memory and the local store go through here; they differ
    /// only in how `id` is chosen and where the result is kept.
    pub fn assemble(id: u64, request: PortfolioRequest, created_at: DateTime<Utc>) -> Self {
        let widgets = layout::pack(&request.widgets);
        let people = tracked_people(id, request.people);
        Self {
            id,
            name: request
                .name
                .unwrap_or_else(|| DEFAULT_PORTFOLIO_NAME.to_string()),
            description: request.description.unwrap_or_default(),
            data_sources: request.data_sources,
            created_at,
            updated_at: None,
            people,
            widgets,
        }
    }

    /// Replace name, description, data sources and people.
    ///
    /// The widget layout is left as it was created; `request.widgets` is ignored.
    pub fn apply_update(&mut self, request: PortfolioRequest, updated_at: DateTime<Utc>) {
        self.name = request
            .name
            .unwrap_or_else(|| DEFAULT_PORTFOLIO_NAME.to_string());
        self.description = request.description.unwrap_or_default();
        self.data_sources = request.data_sources;
        self.people = tracked_people(self.id, request.people);
        self.updated_at = Some(updated_at);
    }
}

fn tracked_people(portfolio_id: u64, people: Vec<PersonRequest>) -> Vec<TrackedPerson> {
    people
        .into_iter()
        .enumerate()
        .map(|(i, p)| TrackedPerson {
            id: i,
            portfolio_id,
            name: p.name,
            kind: p.kind,
            identifier: p.identifier,
            image_url: p.image_url,
        })
        .collect()
}
