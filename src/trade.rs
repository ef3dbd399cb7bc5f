use std::sync::atomic::{AtomicU64, Ordering};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::orders::Side;

/// Process-wide trade id counter; unique and increasing across all symbols.
static NEXT_TRADE_ID: AtomicU64 = AtomicU64::new(1);

/// A single trade execution between a resting maker and an incoming taker.
///
/// The price is always the maker's resting limit price. A trade is immutable
/// once created. Field order matches the wire layout of the trade feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: u64,
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub aggressor_side: Side,
    pub maker_order_id: u64,
    pub taker_order_id: u64,
}

impl Trade {
    /// Records an execution and assigns it the next trade id.
    pub fn new(
        maker_order_id: u64,
        taker_order_id: u64,
        price: Decimal,
        quantity: Decimal,
        aggressor_side: Side,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            trade_id: NEXT_TRADE_ID.fetch_add(1, Ordering::Relaxed),
            symbol: symbol.into(),
            price,
            quantity,
            aggressor_side,
            maker_order_id,
            taker_order_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn trade_ids_increase() {
        let a = Trade::new(1, 2, dec!(100), dec!(1), Side::Buy, "X");
        let b = Trade::new(3, 4, dec!(100), dec!(1), Side::Sell, "X");
        assert!(b.trade_id > a.trade_id);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let t = Trade::new(7, 8, dec!(101.5), dec!(2), Side::Buy, "BTC-USDT");
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["maker_order_id"], 7);
        assert_eq!(v["taker_order_id"], 8);
        assert_eq!(v["aggressor_side"], "buy");
        assert_eq!(v["price"].as_f64(), Some(101.5));
        assert_eq!(v["quantity"].as_f64(), Some(2.0));
    }
}
