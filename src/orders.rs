use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::OrderRejection;

/// Process-wide order id counter, shared across every symbol so that ids stay
/// unique for downstream correlation.
static NEXT_ORDER_ID: AtomicU64 = AtomicU64::new(1);

/// Which side of the market the order is on.
///
/// - `Buy` (bid): matched against the asks, lowest price first.
/// - `Sell` (ask): matched against the bids, highest price first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

/// Execution policy of an order.
///
/// - `Market`: execute immediately at the best available prices.
/// - `Limit`: execute at the limit price or better, rest the remainder.
/// - `Ioc`: immediate-or-cancel, execute what crosses now and drop the rest.
/// - `Fok`: fill-or-kill, execute the whole order atomically or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
    Ioc,
    Fok,
}

impl FromStr for Side {
    type Err = OrderRejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(OrderRejection::InvalidSide(other.to_string())),
        }
    }
}

impl FromStr for OrderType {
    type Err = OrderRejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "market" => Ok(OrderType::Market),
            "limit" => Ok(OrderType::Limit),
            "ioc" => Ok(OrderType::Ioc),
            "fok" => Ok(OrderType::Fok),
            other => Err(OrderRejection::InvalidOrderType(other.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => f.write_str("market"),
            OrderType::Limit => f.write_str("limit"),
            OrderType::Ioc => f.write_str("ioc"),
            OrderType::Fok => f.write_str("fok"),
        }
    }
}

/// A single trading order.
///
/// `quantity` is the remaining (unfilled) quantity; it only ever shrinks, via
/// [`Order::reduce`], and an order with zero remaining quantity is no longer a
/// book participant. The id is assigned at construction from a process-wide
/// counter and never reused.
#[derive(Debug, Clone)]
pub struct Order {
    id: u64,
    order_type: OrderType,
    side: Side,
    price: Decimal,
    quantity: Decimal,
    symbol: String,
}

impl Order {
    /// Builds a new order and assigns it the next order id.
    ///
    /// Market orders carry no limit; any price supplied for them is ignored.
    /// Callers are expected to hand in a positive quantity, and a positive
    /// price for non-market types; that contract is enforced at the
    /// submission layer, not here.
    pub fn new(
        order_type: OrderType,
        side: Side,
        quantity: Decimal,
        symbol: impl Into<String>,
        price: Decimal,
    ) -> Self {
        let price = match order_type {
            OrderType::Market => Decimal::ZERO,
            _ => price,
        };
        Self {
            id: NEXT_ORDER_ID.fetch_add(1, Ordering::Relaxed),
            order_type,
            side,
            price,
            quantity,
            symbol: symbol.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Decrements the remaining quantity after a fill.
    ///
    /// A reduction larger than the remaining quantity is skipped entirely;
    /// the matcher always computes fills as `min(taker, maker)` first, so the
    /// guard only matters for misbehaving callers.
    pub fn reduce(&mut self, amount: Decimal) {
        if amount <= self.quantity {
            self.quantity -= amount;
        }
    }

    /// Whether this order may trade at `level_price` on the opposite side.
    ///
    /// Market orders are marketable at every level. Priced orders cross when
    /// a buy meets or exceeds the ask, or a sell meets or undercuts the bid.
    pub fn is_marketable_at(&self, level_price: Decimal) -> bool {
        match self.order_type {
            OrderType::Market => true,
            _ => match self.side {
                Side::Buy => self.price >= level_price,
                Side::Sell => self.price <= level_price,
            },
        }
    }
}
