use std::collections::{BTreeMap, VecDeque};

use rust_decimal::Decimal;
use tracing::debug;

use crate::orders::{Order, OrderType, Side};
use crate::trade::Trade;

/// An [`OrderBook`] holds the resting orders for a single symbol in two
/// price ladders:
/// - `bids` (buy orders), best price = highest key
/// - `asks` (sell orders), best price = lowest key
///
/// Each ladder maps a price level to a FIFO queue of orders, giving
/// **price-time** priority: the matcher always consumes the best level first
/// and, within a level, the oldest order first. Prices are [`Decimal`] so
/// that two values parsed from the same external text always land on the
/// same level key.
#[derive(Debug, Default)]
pub struct OrderBook {
    bids: BTreeMap<Decimal, VecDeque<Order>>,
    asks: BTreeMap<Decimal, VecDeque<Order>>,
}

/// Total remaining quantity resting at one price level.
fn level_quantity(queue: &VecDeque<Order>) -> Decimal {
    queue.iter().map(Order::quantity).sum()
}

/// Matches an incoming order against one ladder, consuming liquidity
/// best-level-first and head-of-queue-first.
///
/// `descending` selects the walk direction: `true` for the bid ladder
/// (highest price is best), `false` for the ask ladder. Fully filled makers
/// are popped from their queue and emptied levels are removed before the
/// function returns, so the ladder never retains zero-quantity residents.
///
/// Trades are pushed in execution order and always at the maker's resting
/// price. Priced orders (limit, IOC, FOK) stop at the first level their
/// limit does not cross; market orders walk the whole ladder.
fn match_incoming(
    taker: &mut Order,
    opposite: &mut BTreeMap<Decimal, VecDeque<Order>>,
    descending: bool,
) -> Vec<Trade> {
    let mut trades = Vec::new();

    while taker.quantity() > Decimal::ZERO {
        let best = if descending {
            opposite.iter_mut().next_back()
        } else {
            opposite.iter_mut().next()
        };
        let Some((&level_price, queue)) = best else {
            break;
        };
        if !taker.is_marketable_at(level_price) {
            break;
        }

        while let Some(maker) = queue.front_mut() {
            let fill = taker.quantity().min(maker.quantity());
            trades.push(Trade::new(
                maker.id(),
                taker.id(),
                level_price,
                fill,
                taker.side(),
                taker.symbol(),
            ));
            maker.reduce(fill);
            taker.reduce(fill);

            if maker.quantity() == Decimal::ZERO {
                queue.pop_front();
            }
            if taker.quantity() == Decimal::ZERO {
                break;
            }
        }

        if queue.is_empty() {
            opposite.remove(&level_price);
        }
    }

    trades
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one incoming order against this book and returns the trades
    /// it produced, in execution order.
    ///
    /// The sequence is:
    /// 1. FOK pre-check: if the order cannot be filled in full from the
    ///    liquidity within its limit, nothing happens and no trades return.
    /// 2. Match loop against the opposite ladder (see [`match_incoming`]).
    /// 3. Residual handling: a limit order with remaining quantity rests at
    ///    its price level; market and IOC residuals are discarded.
    ///
    /// The order is passed mutably because matching decrements its remaining
    /// quantity. A non-positive-quantity order produces no trades and never
    /// rests.
    pub fn process(&mut self, order: &mut Order) -> Vec<Trade> {
        if order.order_type() == OrderType::Fok && !self.fok_fillable(order) {
            debug!(order_id = order.id(), "fok order killed, insufficient liquidity");
            return Vec::new();
        }

        let trades = match order.side() {
            Side::Buy => match_incoming(order, &mut self.asks, false),
            Side::Sell => match_incoming(order, &mut self.bids, true),
        };

        if order.order_type() == OrderType::Limit && order.quantity() > Decimal::ZERO {
            debug!(
                order_id = order.id(),
                price = %order.price(),
                quantity = %order.quantity(),
                "resting limit residual"
            );
            let level = match order.side() {
                Side::Buy => self.bids.entry(order.price()).or_default(),
                Side::Sell => self.asks.entry(order.price()).or_default(),
            };
            level.push_back(order.clone());
        }

        trades
    }

    /// Whether a fill-or-kill order can be satisfied in full right now.
    ///
    /// Walks the opposite ladder best-first, accumulating resting quantity
    /// and stopping at the first level beyond the order's limit.
    fn fok_fillable(&self, order: &Order) -> bool {
        let needed = order.quantity();
        let mut available = Decimal::ZERO;

        let levels: Box<dyn Iterator<Item = (&Decimal, &VecDeque<Order>)>> = match order.side() {
            Side::Buy => Box::new(self.asks.iter()),
            Side::Sell => Box::new(self.bids.iter().rev()),
        };
        for (&price, queue) in levels {
            if !order.is_marketable_at(price) {
                break;
            }
            available += level_quantity(queue);
            if available >= needed {
                return true;
            }
        }
        available >= needed
    }

    /// Best bid price, if any buy orders are resting.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.keys().next_back().copied()
    }

    /// Best ask price, if any sell orders are resting.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.keys().next().copied()
    }

    /// Best bid and offer; `None` unless both sides have resting orders.
    pub fn bbo(&self) -> Option<(Decimal, Decimal)> {
        Some((self.best_bid()?, self.best_ask()?))
    }

    /// Top `n` levels of one side as `(price, aggregated quantity)` pairs in
    /// book order: bids descending, asks ascending.
    pub fn depth(&self, n: usize, side: Side) -> Vec<(Decimal, Decimal)> {
        match side {
            Side::Buy => self
                .bids
                .iter()
                .rev()
                .take(n)
                .map(|(&price, queue)| (price, level_quantity(queue)))
                .collect(),
            Side::Sell => self
                .asks
                .iter()
                .take(n)
                .map(|(&price, queue)| (price, level_quantity(queue)))
                .collect(),
        }
    }
}
