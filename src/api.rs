use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::store::PortfolioStore;
use crate::types::PortfolioRequest;

/// Prefix of every portfolio route.
pub const PORTFOLIOS_PATH: &str = "/api/portfolios";

pub const HEALTH_PATH: &str = "/api/health";

/// A request as received from the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self { status, body },
            Err(e) => Self::error(500, &format!("failed to serialize response: {e}")),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }

    fn message(message: &str) -> Self {
        Self {
            status: 200,
            body: json!({ "message": message }),
        }
    }
}

/// What a portfolio path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Collection,
    Portfolio(u64),
    /// An id segment that is not a number; never matches a stored portfolio.
    UnknownPortfolio,
}

/// Resolve `path` to a portfolio target, ignoring query string and trailing
/// slashes. `None` when the path is not a portfolio route.
fn portfolio_target(path: &str) -> Option<Target> {
    let rest = path.strip_prefix(PORTFOLIOS_PATH)?;
    if rest.is_empty() {
        return Some(Target::Collection);
    }
    let segment = rest.strip_prefix('/')?;
    if segment.contains('/') {
        return None;
    }
    Some(match segment.parse::<u64>() {
        Ok(id) => Target::Portfolio(id),
        Err(_) => Target::UnknownPortfolio,
    })
}

fn request_body(body: &Option<Value>) -> Result<PortfolioRequest, ApiResponse> {
    match body {
        None | Some(Value::Null) => Ok(PortfolioRequest::default()),
        Some(value) => PortfolioRequest::deserialize(value)
            .map_err(|e| ApiResponse::error(400, &format!("Invalid portfolio request: {e}"))),
    }
}

/// Route one request against the store.
pub fn handle(store: &PortfolioStore, request: &ApiRequest) -> ApiResponse {
    let path = request
        .path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    let method = request.method.to_ascii_uppercase();

    let response = if path == HEALTH_PATH {
        match method.as_str() {
            "GET" => ApiResponse::json(200, &json!({ "status": "healthy" })),
            _ => ApiResponse::error(405, "Method not allowed"),
        }
    } else {
        match portfolio_target(path) {
            Some(target) => route(store, &method, target, &request.body),
            None => ApiResponse::error(404, "Not found"),
        }
    };

    debug!("{method} {} -> {}", request.path, response.status);
    response
}

fn route(store: &PortfolioStore, method: &str, target: Target, body: &Option<Value>) -> ApiResponse {
    match (method, target) {
        ("OPTIONS", _) => ApiResponse {
            status: 200,
            body: Value::Null,
        },

        ("GET", Target::Collection) => ApiResponse::json(200, &store.list()),
        ("GET", Target::Portfolio(id)) => match store.get(id) {
            Some(portfolio) => ApiResponse::json(200, &portfolio),
            None => ApiResponse::error(404, "Portfolio not found"),
        },
        ("GET", Target::UnknownPortfolio) => ApiResponse::error(404, "Portfolio not found"),

        ("POST", Target::Collection) => match request_body(body) {
            Ok(req) => ApiResponse::json(201, &store.create(req)),
            Err(resp) => resp,
        },

        ("PUT", Target::Portfolio(id)) => match request_body(body) {
            Ok(req) => match store.update(id, req) {
                Some(portfolio) => ApiResponse::json(200, &portfolio),
                None => ApiResponse::error(404, "Portfolio not found"),
            },
            Err(resp) => resp,
        },
        ("PUT", Target::UnknownPortfolio) => ApiResponse::error(404, "Portfolio not found"),

        ("DELETE", Target::Collection) => ApiResponse::error(400, "Missing portfolio id"),
        ("DELETE", Target::Portfolio(id)) => {
            if store.delete(id) {
                ApiResponse::message("Deleted")
            } else {
                ApiResponse::error(404, "Not found")
            }
        }
        ("DELETE", Target::UnknownPortfolio) => ApiResponse::error(404, "Not found"),

        _ => ApiResponse::error(405, "Method not allowed"),
    }
}

/// Parse one JSON-encoded [`ApiRequest`] and handle it. A line that is not a
/// request yields a 400 response.
pub fn handle_line(store: &PortfolioStore, line: &str) -> ApiResponse {
    match serde_json::from_str::<ApiRequest>(line) {
        Ok(request) => handle(store, &request),
        Err(e) => {
            warn!("Rejected malformed request line: {e}");
            ApiResponse::error(400, &format!("Invalid request: {e}"))
        }
    }
}
