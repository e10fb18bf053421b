use tracing::debug;

use crate::GRID_COLUMNS;
use crate::types::{PlacedWidget, WidgetSize, WidgetType};

/// Size given to widget types with no registered entry.
pub const DEFAULT_SIZE: WidgetSize = WidgetSize { w: 4, h: 3 };

/// Initial size of a widget type, in grid cells.
pub fn widget_size(widget_type: &WidgetType) -> WidgetSize {
    let (w, h) = match widget_type {
        WidgetType::Sentiment => (3, 3),
        WidgetType::Holdings => (6, 4),
        WidgetType::News => (4, 4),
        WidgetType::Reddit => (4, 4),
        WidgetType::Chart => (6, 4),
        WidgetType::Trades => (5, 4),
        WidgetType::Sectors => (3, 3),
        WidgetType::Watchlist => (3, 4),
        WidgetType::Other(_) => return DEFAULT_SIZE,
    };
    WidgetSize { w, h }
}

/// Smallest size the dashboard lets a widget be resized to.
/// Unregistered types have no bound.
pub fn min_size(widget_type: &WidgetType) -> Option<WidgetSize> {
    let (w, h) = match widget_type {
        WidgetType::Sentiment => (2, 2),
        WidgetType::Holdings => (4, 3),
        WidgetType::News => (3, 3),
        WidgetType::Reddit => (3, 3),
        WidgetType::Chart => (4, 3),
        WidgetType::Trades => (4, 3),
        WidgetType::Sectors => (2, 2),
        WidgetType::Watchlist => (2, 3),
        WidgetType::Other(_) => return None,
    };
    Some(WidgetSize { w, h })
}

/// Lay widgets out on the grid with a single shelf-packing pass.
///
/// Widgets are placed left to right in input order. When the next widget
/// would cross the right edge, a new row starts below the tallest widget of
/// the current row. Nothing is reordered or moved once placed, so rows can
/// end with a horizontal gap and short widgets leave space under them.
///
/// A widget wider than the grid is placed at `x = 0` on its own row without
/// clamping.
pub fn pack(types: &[WidgetType]) -> Vec<PlacedWidget> {
    let mut x = 0;
    let mut y = 0;
    let mut row_height = 0;

    let placed: Vec<PlacedWidget> = types
        .iter()
        .enumerate()
        .map(|(i, widget_type)| {
            let size = widget_size(widget_type);
            if x + size.w > GRID_COLUMNS {
                x = 0;
                y += row_height;
                row_height = 0;
            }

            let min = min_size(widget_type);
            let widget = PlacedWidget {
                id: format!("{widget_type}-{i}"),
                widget_type: widget_type.clone(),
                x,
                y,
                w: size.w,
                h: size.h,
                min_w: min.map(|m| m.w),
                min_h: min.map(|m| m.h),
            };

            x += size.w;
            row_height = row_height.max(size.h);
            widget
        })
        .collect();

    debug!(
        "Packed {} widget(s), layout height {}",
        placed.len(),
        layout_height(&placed)
    );
    placed
}

/// Number of grid rows a layout occupies.
pub fn layout_height(widgets: &[PlacedWidget]) -> u32 {
    widgets.iter().map(|w| w.y + w.h).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(names: &[&str]) -> Vec<WidgetType> {
        names.iter().map(|n| WidgetType::from(*n)).collect()
    }

    fn rect(w: &PlacedWidget) -> (u32, u32, u32, u32) {
        (w.x, w.y, w.w, w.h)
    }

    const ALL: [&str; 9] = [
        "sentiment",
        "holdings",
        "news",
        "reddit",
        "chart",
        "trades",
        "sectors",
        "watchlist",
        "custom",
    ];

    /// Every sequence of up to three types drawn from `ALL`.
    fn small_sequences() -> Vec<Vec<WidgetType>> {
        let mut out = vec![Vec::new()];
        let mut frontier = vec![Vec::new()];
        for _ in 0..3 {
            let mut next = Vec::new();
            for seq in &frontier {
                for name in ALL {
                    let mut s: Vec<WidgetType> = seq.clone();
                    s.push(WidgetType::from(name));
                    next.push(s);
                }
            }
            out.extend(next.iter().cloned());
            frontier = next;
        }
        out
    }

    // ── widget_size ────────────────────────────────────────────────

    #[test]
    fn sizes_registered() {
        assert_eq!(widget_size(&WidgetType::Sentiment), WidgetSize { w: 3, h: 3 });
        assert_eq!(widget_size(&WidgetType::Holdings), WidgetSize { w: 6, h: 4 });
        assert_eq!(widget_size(&WidgetType::News), WidgetSize { w: 4, h: 4 });
        assert_eq!(widget_size(&WidgetType::Reddit), WidgetSize { w: 4, h: 4 });
        assert_eq!(widget_size(&WidgetType::Chart), WidgetSize { w: 6, h: 4 });
        assert_eq!(widget_size(&WidgetType::Trades), WidgetSize { w: 5, h: 4 });
        assert_eq!(widget_size(&WidgetType::Sectors), WidgetSize { w: 3, h: 3 });
        assert_eq!(widget_size(&WidgetType::Watchlist), WidgetSize { w: 3, h: 4 });
    }

    #[test]
    fn sizes_default_for_unregistered() {
        assert_eq!(widget_size(&WidgetType::from("foo")), DEFAULT_SIZE);
        assert_eq!(min_size(&WidgetType::from("foo")), None);
    }

    #[test]
    fn min_never_exceeds_initial() {
        for name in ALL {
            let t = WidgetType::from(name);
            if let Some(min) = min_size(&t) {
                let size = widget_size(&t);
                assert!(min.w <= size.w && min.h <= size.h, "{name}");
            }
        }
    }

    // ── pack ───────────────────────────────────────────────────────

    #[test]
    fn pack_empty() {
        assert!(pack(&[]).is_empty());
    }

    #[test]
    fn pack_unregistered_gets_default() {
        let placed = pack(&types(&["foo"]));
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].id, "foo-0");
        assert_eq!(placed[0].widget_type, WidgetType::Other("foo".to_string()));
        assert_eq!(rect(&placed[0]), (0, 0, 4, 3));
    }

    #[test]
    fn pack_two_holdings_fill_row() {
        let placed = pack(&types(&["holdings", "holdings"]));
        assert_eq!(rect(&placed[0]), (0, 0, 6, 4));
        assert_eq!(rect(&placed[1]), (6, 0, 6, 4));
    }

    #[test]
    fn pack_third_holdings_wraps() {
        let placed = pack(&types(&["holdings", "holdings", "holdings"]));
        assert_eq!(rect(&placed[2]), (0, 4, 6, 4));
    }

    #[test]
    fn pack_four_sentiment_one_row() {
        let placed = pack(&types(&["sentiment"; 4]));
        let xs: Vec<u32> = placed.iter().map(|w| w.x).collect();
        assert_eq!(xs, vec![0, 3, 6, 9]);
        assert!(placed.iter().all(|w| w.y == 0));
    }

    #[test]
    fn pack_fifth_sentiment_wraps() {
        let placed = pack(&types(&["sentiment"; 5]));
        assert_eq!((placed[4].x, placed[4].y), (0, 3));
    }

    #[test]
    fn pack_row_height_is_tallest() {
        // sentiment (h=3) then news (h=4) share a row; the next row starts at 4
        let placed = pack(&types(&["sentiment", "news", "holdings"]));
        assert_eq!(rect(&placed[2]), (0, 4, 6, 4));
    }

    #[test]
    fn pack_leaves_gap_without_backfilling() {
        // chart does not fit the 2 columns left after two trades; the gap stays empty
        let placed = pack(&types(&["trades", "trades", "chart", "sectors"]));
        assert_eq!(rect(&placed[1]), (5, 0, 5, 4));
        assert_eq!(rect(&placed[2]), (0, 4, 6, 4));
        assert_eq!(rect(&placed[3]), (6, 4, 3, 3));
    }

    #[test]
    fn pack_ids_use_input_index() {
        let placed = pack(&types(&["news", "news", "foo"]));
        let ids: Vec<&str> = placed.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["news-0", "news-1", "foo-2"]);
    }

    #[test]
    fn pack_carries_min_size() {
        let placed = pack(&types(&["watchlist", "foo"]));
        assert_eq!((placed[0].min_w, placed[0].min_h), (Some(2), Some(3)));
        assert_eq!((placed[1].min_w, placed[1].min_h), (None, None));
    }

    #[test]
    fn pack_preserves_length_and_order() {
        for seq in small_sequences() {
            let placed = pack(&seq);
            assert_eq!(placed.len(), seq.len());
            for (w, t) in placed.iter().zip(&seq) {
                assert_eq!(&w.widget_type, t);
            }
        }
    }

    #[test]
    fn pack_stays_inside_grid() {
        for seq in small_sequences() {
            for w in pack(&seq) {
                assert!(w.x + w.w <= GRID_COLUMNS, "{seq:?} -> {w:?}");
            }
        }
    }

    #[test]
    fn pack_rows_never_go_up() {
        for seq in small_sequences() {
            let placed = pack(&seq);
            for pair in placed.windows(2) {
                assert!(pair[1].y >= pair[0].y, "{seq:?}");
            }
        }
    }

    #[test]
    fn pack_is_deterministic() {
        let seq = types(&["chart", "trades", "foo", "sentiment", "reddit", "watchlist"]);
        assert_eq!(pack(&seq), pack(&seq));
    }

    // ── layout_height ──────────────────────────────────────────────

    #[test]
    fn height_of_layouts() {
        assert_eq!(layout_height(&[]), 0);
        assert_eq!(layout_height(&pack(&types(&["sentiment"; 5]))), 6);
        assert_eq!(layout_height(&pack(&types(&["holdings"; 3]))), 8);
    }
}
