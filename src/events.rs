use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::orderbook::OrderBook;
use crate::orders::Side;
use crate::trade::Trade;

/// How many price levels per side are visible on the market data feed.
pub const DEPTH_LEVELS: usize = 10;

/// One frame on the outbound feeds, tagged by its `type` field.
///
/// Trade frames carry every execution; `l2update` frames carry the visible
/// top of the book and are only emitted when that view actually changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedEvent {
    #[serde(rename = "trade")]
    Trade(Trade),
    #[serde(rename = "l2update")]
    L2Update(L2Update),
}

/// Visible book state for one symbol: per-side best price and the top
/// [`DEPTH_LEVELS`] levels as `[price, quantity]` string pairs, bids in
/// descending and asks in ascending price order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L2Update {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub best_bid: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub best_ask: Option<Decimal>,
    pub bids: Vec<(String, String)>,
    pub asks: Vec<(String, String)>,
}

impl L2Update {
    /// Snapshot of a book's visible state.
    pub fn from_book(symbol: &str, book: &OrderBook) -> Self {
        Self {
            symbol: symbol.to_string(),
            best_bid: book.best_bid(),
            best_ask: book.best_ask(),
            bids: render_levels(&book.depth(DEPTH_LEVELS, Side::Buy)),
            asks: render_levels(&book.depth(DEPTH_LEVELS, Side::Sell)),
        }
    }

    /// The payload for a symbol with no book yet.
    pub fn empty(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            best_bid: None,
            best_ask: None,
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }
}

/// Renders depth levels as decimal strings with six fractional digits.
fn render_levels(levels: &[(Decimal, Decimal)]) -> Vec<(String, String)> {
    levels
        .iter()
        .map(|(price, quantity)| (format!("{price:.6}"), format!("{quantity:.6}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn levels_render_with_six_fractional_digits() {
        let rendered = render_levels(&[(dec!(100), dec!(5)), (dec!(99.5), dec!(0.25))]);
        assert_eq!(
            rendered,
            vec![
                ("100.000000".to_string(), "5.000000".to_string()),
                ("99.500000".to_string(), "0.250000".to_string()),
            ]
        );
    }

    #[test]
    fn trade_frames_are_tagged() {
        let trade = Trade::new(1, 2, dec!(100), dec!(1), Side::Sell, "X");
        let v = serde_json::to_value(FeedEvent::Trade(trade)).unwrap();
        assert_eq!(v["type"], "trade");
        assert_eq!(v["aggressor_side"], "sell");
    }

    #[test]
    fn l2update_frames_serialize_nulls_per_side() {
        let mut update = L2Update::empty("X");
        update.best_bid = Some(dec!(100));
        update.bids = render_levels(&[(dec!(100), dec!(5))]);

        let v = serde_json::to_value(FeedEvent::L2Update(update)).unwrap();
        assert_eq!(v["type"], "l2update");
        assert_eq!(v["best_bid"].as_f64(), Some(100.0));
        assert!(v["best_ask"].is_null());
        assert_eq!(v["bids"][0][0], "100.000000");
        assert_eq!(v["asks"].as_array().map(Vec::len), Some(0));
    }
}
