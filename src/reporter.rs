use crate::GRID_COLUMNS;
use crate::api::ApiResponse;
use crate::layout::layout_height;
use crate::types::{PlacedWidget, Portfolio};

/// Emit a portfolio as pretty-printed JSON to stdout.
pub fn report_portfolio(portfolio: &Portfolio) {
    if let Ok(json) = serde_json::to_string_pretty(portfolio) {
        println!("{json}");
    }
}

/// Emit one line per portfolio: id, name, widget and person counts.
pub fn report_portfolio_list(portfolios: &[Portfolio]) {
    for p in portfolios {
        println!(
            "{}\t{}\t{} widget(s)\t{} person(s)",
            p.id,
            p.name,
            p.widgets.len(),
            p.people.len()
        );
    }
}

/// Emit each placed widget as a single JSON line to stdout.
pub fn report_layout(widgets: &[PlacedWidget]) {
    for widget in widgets {
        if let Ok(json) = serde_json::to_string(widget) {
            println!("{json}");
        }
    }
}

/// Emit a handler response as a single JSON line to stdout.
pub fn report_response(response: &ApiResponse) {
    if let Ok(json) = serde_json::to_string(response) {
        println!("{json}");
    }
}

/// Draw a layout as text, one character per grid cell.
///
/// Widget `i` is drawn with the `i`-th letter (wrapping after `z`), empty
/// cells with `.`. The drawing is as wide as the grid, or wider when a
/// widget overflows it.
pub fn render_grid(widgets: &[PlacedWidget]) -> String {
    let width = widgets
        .iter()
        .map(|w| w.x + w.w)
        .max()
        .unwrap_or(0)
        .max(GRID_COLUMNS) as usize;
    let height = layout_height(widgets) as usize;
    let mut cells = vec![vec!['.'; width]; height];

    for (i, widget) in widgets.iter().enumerate() {
        let mark = char::from(b'a' + (i % 26) as u8);
        for row in &mut cells[widget.y as usize..(widget.y + widget.h) as usize] {
            for cell in &mut row[widget.x as usize..(widget.x + widget.w) as usize] {
                *cell = mark;
            }
        }
    }

    let mut out = String::with_capacity(height * (width + 1));
    for row in cells {
        out.extend(row);
        out.push('\n');
    }
    out
}
